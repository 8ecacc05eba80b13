// Group-level analysis of a distance matrix

pub mod grouping;
pub mod stats;
pub mod comparison;

pub use grouping::*;
pub use stats::*;
pub use comparison::*;

use serde::Serialize;

use crate::config::{AnalysisConfig, GroupingStrategy};
use crate::similarity::{self, DistanceMatrix, SimilarityError};

/// Error type for group analysis
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Group has no distances to summarise or compare")]
    EmptyGroup,

    #[error("Group size must be at least 1")]
    InvalidGroupSize,

    #[error("{labels} labels for {records} records")]
    LabelCountMismatch { labels: usize, records: usize },

    #[error("Rank test failed: {0}")]
    RankTest(String),

    #[error("Similarity error: {0}")]
    Similarity(#[from] SimilarityError),
}

/// One group with its summary statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReport {
    pub label: String,
    pub members: Vec<usize>,
    pub summary: GroupSummary,
}

/// Everything [`analyze`] derives from one distance matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub groups: Vec<GroupReport>,
    pub comparisons: Vec<GroupComparison>,
}

/// Group the records, summarise every group and compare adjacent groups with
/// the supplied rank test.
pub fn analyze(
    matrix: &DistanceMatrix,
    config: &AnalysisConfig,
    test: &dyn RankTest,
) -> Result<AnalysisReport, AnalysisError> {
    let groups = build_groups(matrix, config)?;
    log::info!("Analyzing {} groups over {} records", groups.len(), matrix.len());

    let mut reports = Vec::with_capacity(groups.len());
    for group in &groups {
        let summary = GroupSummary::from_distances(&group.distances)?;
        log::debug!(
            "{}: min {:.2} mean {:.2} gmean {:.2}",
            group.label,
            summary.min,
            summary.mean,
            summary.geometric_mean
        );
        reports.push(GroupReport {
            label: group.label.clone(),
            members: group.members.clone(),
            summary,
        });
    }

    let comparisons = compare_adjacent(&groups, test)?;
    for comparison in &comparisons {
        log::info!("{}", comparison);
    }

    Ok(AnalysisReport {
        groups: reports,
        comparisons,
    })
}

/// Groups for the configured strategy
pub fn build_groups(
    matrix: &DistanceMatrix,
    config: &AnalysisConfig,
) -> Result<Vec<DistanceGroup>, AnalysisError> {
    match config.grouping {
        GroupingStrategy::Blocks => group_blocks(matrix, config.group_size, config.group_count),
        GroupingStrategy::Clusters => {
            let clusters = match (config.cluster_eps, config.cluster_min_samples) {
                (Some(eps), Some(min_samples)) => similarity::cluster_points(matrix, eps, min_samples),
                (eps, min_samples) => match (similarity::auto_parameters(matrix), eps) {
                    (Some((auto_eps, auto_min)), _) => similarity::cluster_points(
                        matrix,
                        eps.unwrap_or(auto_eps),
                        min_samples.unwrap_or(auto_min),
                    ),
                    // Too few records to derive parameters; keep what was configured.
                    (None, Some(eps)) => similarity::cluster_points(
                        matrix,
                        eps,
                        min_samples.unwrap_or(similarity::MIN_CLUSTER_SAMPLES),
                    ),
                    (None, None) => {
                        log::warn!(
                            "No cluster_eps configured and {} records are too few to derive one",
                            matrix.len()
                        );
                        similarity::ClusterResult::unlabelled(matrix.len())
                    }
                },
            };
            group_by_labels(matrix, &clusters.labels)
        }
    }
}
