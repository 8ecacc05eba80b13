// Cosine distance for numeric track descriptors

use ndarray::ArrayView1;

use super::matrix::{fill_upper_triangle, DistanceMatrix};
use super::SimilarityError;
use crate::dataset::NumericDataset;

/// Cosine similarity in [-1, 1]. Zero-length or mismatched vectors score 0.
pub fn cosine_similarity(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom > 0.0 {
        (dot / denom).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Pairwise cosine distances 1 − cos(u, v), each in [0, 2].
pub fn cosine_distances(
    dataset: &NumericDataset,
    parallel_min_records: usize,
) -> Result<DistanceMatrix, SimilarityError> {
    let n = dataset.n_records();
    if n == 0 || dataset.n_features() == 0 {
        return Err(SimilarityError::EmptyInput);
    }
    if n < 2 {
        return Err(SimilarityError::InsufficientSamples { n });
    }

    let zero_rows = (0..n)
        .filter(|&i| dataset.row(i).iter().all(|&v| v == 0.0))
        .count();
    if zero_rows > 0 {
        log::warn!("{} of {} records have an all-zero descriptor vector", zero_rows, n);
    }

    let condensed = fill_upper_triangle(n, n >= parallel_min_records, |i, j| {
        1.0 - cosine_similarity(dataset.row(i), dataset.row(j))
    });

    log::debug!(
        "Cosine distances for {} records over {} features",
        n,
        dataset.n_features()
    );

    DistanceMatrix::from_condensed(n, condensed)
}
