// Descriptive statistics for groups of distances

use serde::Serialize;

use super::AnalysisError;

/// Summary of one group's distances
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupSummary {
    pub count: usize,
    pub min: f64,
    pub mean: f64,
    /// exp(mean(ln d)); 0 when any distance is 0
    pub geometric_mean: f64,
    pub median: f64,
}

impl GroupSummary {
    pub fn from_distances(distances: &[f64]) -> Result<Self, AnalysisError> {
        if distances.is_empty() {
            return Err(AnalysisError::EmptyGroup);
        }

        let count = distances.len();
        let min = distances.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = distances.iter().sum::<f64>() / count as f64;

        Ok(Self {
            count,
            min,
            mean,
            geometric_mean: geometric_mean(distances),
            median: median(distances),
        })
    }
}

/// Median of a sample; the mean of the two middle values for even sizes
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Geometric mean of non-negative values
pub fn geometric_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    if values.iter().any(|&v| v <= 0.0) {
        return 0.0;
    }

    let log_mean = values.iter().map(|v| v.ln()).sum::<f64>() / values.len() as f64;
    log_mean.exp()
}
