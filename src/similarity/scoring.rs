// Nearest-record ranking over a distance matrix

use super::matrix::DistanceMatrix;
use super::SimilarityError;

/// Which feature set a distance matrix was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSet {
    /// Categorical artist metadata, Goodall distance
    Categorical,
    /// Numeric track descriptors, cosine distance
    Numeric,
}

impl FeatureSet {
    /// Largest distance the matching measure can produce
    pub fn max_distance(self) -> f64 {
        match self {
            FeatureSet::Categorical => 1.0,
            FeatureSet::Numeric => 2.0,
        }
    }
}

/// Find the records closest to `target`, sorted by distance ascending.
///
/// Records further than `max_distance` are dropped; ties keep index order.
pub fn most_similar(
    matrix: &DistanceMatrix,
    target: usize,
    max_results: usize,
    max_distance: f64,
) -> Result<Vec<(usize, f64)>, SimilarityError> {
    if target >= matrix.len() {
        return Err(SimilarityError::IndexOutOfBounds {
            index: target,
            len: matrix.len(),
        });
    }

    let mut scores: Vec<(usize, f64)> = matrix
        .row(target)
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != target)
        .map(|(i, &d)| (i, d))
        .filter(|&(_, d)| d <= max_distance)
        .collect();

    scores.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    scores.truncate(max_results);
    Ok(scores)
}

/// Similarity score in [0, 1] for a distance under the given feature set
pub fn similarity_score(distance: f64, features: FeatureSet) -> f64 {
    (1.0 - distance / features.max_distance()).clamp(0.0, 1.0)
}
