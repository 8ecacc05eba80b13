// Symmetric distance matrix and its condensed upper triangle

use ndarray::{Array2, ArrayView1};

use super::SimilarityError;

/// N x N symmetric distance matrix with a zero diagonal.
///
/// The condensed form holds distance(i, j) for every i < j in lexicographic
/// order, the order in which pairs of `0..N` are enumerated two at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    square: Array2<f64>,
    condensed: Vec<f64>,
}

impl DistanceMatrix {
    /// Expand a condensed upper triangle into the full symmetric matrix.
    pub fn from_condensed(n: usize, condensed: Vec<f64>) -> Result<Self, SimilarityError> {
        if condensed.len() != condensed_len(n) {
            return Err(SimilarityError::InconsistentSchema(format!(
                "{} condensed distances do not describe {} records",
                condensed.len(),
                n
            )));
        }

        let mut square = Array2::zeros((n, n));
        let mut k = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                square[[i, j]] = condensed[k];
                square[[j, i]] = condensed[k];
                k += 1;
            }
        }

        Ok(Self { square, condensed })
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.square.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.square[[i, j]]
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.square.row(i)
    }

    pub fn square(&self) -> &Array2<f64> {
        &self.square
    }

    pub fn condensed(&self) -> &[f64] {
        &self.condensed
    }

    pub fn into_parts(self) -> (Array2<f64>, Vec<f64>) {
        (self.square, self.condensed)
    }
}

/// Number of unordered pairs among `n` records
pub fn condensed_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Position of pair (i, j), i < j, in the condensed list for `n` records
pub fn condensed_index(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i < j && j < n);
    i * n - i * (i + 1) / 2 + (j - i - 1)
}

/// Evaluate `pair_distance` for every i < j and return the condensed list.
///
/// Row i owns the disjoint slice holding (i, i+1..n). With `parallel` set and
/// the `parallel` feature enabled, rows run on the rayon pool; either way the
/// result is identical.
pub(crate) fn fill_upper_triangle<F>(n: usize, parallel: bool, pair_distance: F) -> Vec<f64>
where
    F: Fn(usize, usize) -> f64 + Sync,
{
    let mut condensed = vec![0.0; condensed_len(n)];

    let mut rows: Vec<(usize, &mut [f64])> = Vec::with_capacity(n);
    let mut rest = condensed.as_mut_slice();
    for i in 0..n {
        let (row, tail) = std::mem::take(&mut rest).split_at_mut(n - i - 1);
        rows.push((i, row));
        rest = tail;
    }

    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            rows.into_par_iter()
                .for_each(|(i, row)| fill_row(i, row, &pair_distance));
            return condensed;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for (i, row) in rows {
        fill_row(i, row, &pair_distance);
    }
    condensed
}

fn fill_row<F>(i: usize, row: &mut [f64], pair_distance: &F)
where
    F: Fn(usize, usize) -> f64,
{
    for (offset, cell) in row.iter_mut().enumerate() {
        *cell = pair_distance(i, i + 1 + offset);
    }
}
