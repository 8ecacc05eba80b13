// Density clustering over precomputed distances

use super::matrix::DistanceMatrix;

/// Cluster assignment result
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterResult {
    /// Cluster per record; `None` marks noise
    pub labels: Vec<Option<usize>>,
    pub n_clusters: usize,
}

/// Smallest neighbourhood size used when `min_samples` is not configured
pub const MIN_CLUSTER_SAMPLES: usize = 3;

impl ClusterResult {
    pub fn unlabelled(n: usize) -> Self {
        Self {
            labels: vec![None; n],
            n_clusters: 0,
        }
    }
}

/// Simplified DBSCAN on a distance matrix.
///
/// A record is a core point when at least `min_samples` records (itself
/// included) lie within `eps`. Clusters grow from core points; border points
/// join the first cluster that reaches them but do not expand it.
pub fn cluster_points(matrix: &DistanceMatrix, eps: f64, min_samples: usize) -> ClusterResult {
    let n = matrix.len();

    if n == 0 || n < min_samples {
        return ClusterResult::unlabelled(n);
    }

    let core_points: Vec<bool> = (0..n)
        .map(|i| matrix.row(i).iter().filter(|&&d| d <= eps).count() >= min_samples)
        .collect();

    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut current_cluster = 0;

    for i in 0..n {
        if labels[i].is_some() || !core_points[i] {
            continue;
        }

        let mut stack = vec![i];

        while let Some(current) = stack.pop() {
            if labels[current].is_some() {
                continue;
            }

            labels[current] = Some(current_cluster);

            for (j, &dist) in matrix.row(current).iter().enumerate() {
                if dist <= eps && labels[j].is_none() {
                    if core_points[j] {
                        stack.push(j);
                    } else {
                        // Border point
                        labels[j] = Some(current_cluster);
                    }
                }
            }
        }

        current_cluster += 1;
    }

    log::debug!("Found {} clusters among {} records", current_cluster, n);

    ClusterResult {
        labels,
        n_clusters: current_cluster,
    }
}

/// Pick clustering parameters from the data itself.
///
/// `eps` is twice the mean nearest-neighbour distance; `min_samples` scales
/// with the record count, between 3 and 10.
pub fn auto_cluster(matrix: &DistanceMatrix) -> ClusterResult {
    match auto_parameters(matrix) {
        Some((eps, min_samples)) => cluster_points(matrix, eps, min_samples),
        None => ClusterResult::unlabelled(matrix.len()),
    }
}

/// `(eps, min_samples)` chosen by [`auto_cluster`], `None` below 5 records
pub fn auto_parameters(matrix: &DistanceMatrix) -> Option<(f64, usize)> {
    let n = matrix.len();
    if n < 5 {
        return None;
    }

    let total_nn: f64 = (0..n)
        .map(|i| {
            matrix
                .row(i)
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &d)| d)
                .fold(f64::MAX, f64::min)
        })
        .sum();
    let eps = total_nn / n as f64 * 2.0;

    let min_samples = (n / 20).clamp(MIN_CLUSTER_SAMPLES, 10);

    Some((eps, min_samples))
}
