// Splitting a distance matrix into groups of records

use std::collections::BTreeMap;

use serde::Serialize;

use super::AnalysisError;
use crate::similarity::DistanceMatrix;

/// Distances among the members of one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceGroup {
    pub label: String,
    pub members: Vec<usize>,
    /// Positive strict-upper-triangle entries among `members`, row-major
    pub distances: Vec<f64>,
}

impl DistanceGroup {
    pub fn from_members(matrix: &DistanceMatrix, label: String, members: Vec<usize>) -> Self {
        let distances = positive_upper_triangle(matrix, &members);
        Self {
            label,
            members,
            distances,
        }
    }
}

/// Consecutive blocks `[c, c + group_size)` starting at record 0.
///
/// Without `group_count` every full block is taken. With it, at most that many
/// blocks are taken and the last one may be cut short by the end of the matrix.
pub fn group_blocks(
    matrix: &DistanceMatrix,
    group_size: usize,
    group_count: Option<usize>,
) -> Result<Vec<DistanceGroup>, AnalysisError> {
    if group_size == 0 {
        return Err(AnalysisError::InvalidGroupSize);
    }

    let n = matrix.len();
    let count = match group_count {
        Some(count) => count.min(n.div_ceil(group_size)),
        None => n / group_size,
    };

    let groups = (0..count)
        .map(|k| {
            let start = k * group_size;
            let end = (start + group_size).min(n);
            DistanceGroup::from_members(matrix, format!("List {}", k + 1), (start..end).collect())
        })
        .collect();

    Ok(groups)
}

/// One group per cluster label, in label order. Unlabelled records are skipped.
pub fn group_by_labels(
    matrix: &DistanceMatrix,
    labels: &[Option<usize>],
) -> Result<Vec<DistanceGroup>, AnalysisError> {
    if labels.len() != matrix.len() {
        return Err(AnalysisError::LabelCountMismatch {
            labels: labels.len(),
            records: matrix.len(),
        });
    }

    let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (record, label) in labels.iter().enumerate() {
        if let Some(label) = label {
            members.entry(*label).or_default().push(record);
        }
    }

    Ok(members
        .into_iter()
        .map(|(label, members)| {
            DistanceGroup::from_members(matrix, format!("Cluster {}", label + 1), members)
        })
        .collect())
}

/// Strict upper triangle of the sub-matrix over `members`, keeping only
/// positive distances.
pub fn positive_upper_triangle(matrix: &DistanceMatrix, members: &[usize]) -> Vec<f64> {
    let mut out = Vec::new();
    for (a, &i) in members.iter().enumerate() {
        for &j in &members[a + 1..] {
            let d = matrix.get(i, j);
            if d > 0.0 {
                out.push(d);
            }
        }
    }
    out
}
