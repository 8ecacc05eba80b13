// Rank-test comparison of adjacent groups

use std::fmt;

use serde::Serialize;

use super::grouping::DistanceGroup;
use super::stats::median;
use super::AnalysisError;

/// Verdict reported by a rank test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Significant,
    NotSignificant,
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Significance::Significant => write!(f, "significant"),
            Significance::NotSignificant => write!(f, "not significant"),
        }
    }
}

/// What a two-sample rank test returns
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankTestOutcome {
    pub significance: Significance,
    pub u_statistic: f64,
    pub effect_size: f64,
}

/// Two-sample nonparametric rank test (e.g. Mann-Whitney U).
///
/// Implementations live outside this crate; closures with the same signature
/// implement the trait.
pub trait RankTest {
    fn test(&self, sample_a: &[f64], sample_b: &[f64]) -> Result<RankTestOutcome, AnalysisError>;
}

impl<F> RankTest for F
where
    F: Fn(&[f64], &[f64]) -> Result<RankTestOutcome, AnalysisError>,
{
    fn test(&self, sample_a: &[f64], sample_b: &[f64]) -> Result<RankTestOutcome, AnalysisError> {
        self(sample_a, sample_b)
    }
}

/// One pair of groups run through the rank test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupComparison {
    pub first: String,
    pub second: String,
    pub first_median: f64,
    pub second_median: f64,
    pub outcome: RankTestOutcome,
}

impl fmt::Display for GroupComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vs {}: medians {:.3} / {:.3}; {}; U = {}, effect size = {:.3}",
            self.first,
            self.second,
            self.first_median,
            self.second_median,
            self.outcome.significance,
            self.outcome.u_statistic,
            self.outcome.effect_size
        )
    }
}

/// Compare groups 0 and 1, 2 and 3, and so on. A trailing odd group is left out.
pub fn compare_adjacent(
    groups: &[DistanceGroup],
    test: &dyn RankTest,
) -> Result<Vec<GroupComparison>, AnalysisError> {
    if groups.len() % 2 == 1 {
        log::debug!(
            "Group '{}' has no partner and is not compared",
            groups[groups.len() - 1].label
        );
    }

    groups
        .chunks_exact(2)
        .map(|pair| compare_pair(&pair[0], &pair[1], test))
        .collect()
}

/// Run the rank test on two groups' distances.
pub fn compare_pair(
    first: &DistanceGroup,
    second: &DistanceGroup,
    test: &dyn RankTest,
) -> Result<GroupComparison, AnalysisError> {
    if first.distances.is_empty() || second.distances.is_empty() {
        return Err(AnalysisError::EmptyGroup);
    }

    let outcome = test.test(&first.distances, &second.distances)?;

    Ok(GroupComparison {
        first: first.label.clone(),
        second: second.label.clone(),
        first_median: median(&first.distances),
        second_median: median(&second.distances),
        outcome,
    })
}
