// Configuration management for Goodall analyses

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::similarity::DEFAULT_PARALLEL_MIN_RECORDS;

/// Analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// How records are split into groups before comparing distances
    #[serde(default)]
    pub grouping: GroupingStrategy,

    /// Records per block when grouping by blocks
    #[serde(default = "default_group_size")]
    pub group_size: usize,

    /// Number of blocks to take; all full blocks when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_count: Option<usize>,

    /// Record count from which the pairwise matrix is assembled in parallel
    #[serde(default = "default_parallel_min_records")]
    pub parallel_min_records: usize,

    /// Neighbourhood radius for cluster grouping; derived from the data when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_eps: Option<f64>,

    /// Minimum neighbourhood size for cluster grouping; derived when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_min_samples: Option<usize>,
}

/// Source of the groups handed to the rank test
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroupingStrategy {
    /// Consecutive blocks of `group_size` records (curated lists)
    #[default]
    Blocks,
    /// Density clusters found on the distance matrix
    Clusters,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            grouping: GroupingStrategy::default(),
            group_size: default_group_size(),
            group_count: None,
            parallel_min_records: default_parallel_min_records(),
            cluster_eps: None,
            cluster_min_samples: None,
        }
    }
}

impl AnalysisConfig {
    /// Load config from disk or return default
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match Self::load(path) {
                Ok(config) => return config,
                Err(e) => {
                    log::warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }

        Self::default()
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        if config.group_size == 0 {
            anyhow::bail!("group_size must be at least 1");
        }
        Ok(config)
    }

    /// Save config to disk
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }
}

/// Default block size (for serde)
fn default_group_size() -> usize {
    4
}

/// Default parallel threshold (for serde)
fn default_parallel_min_records() -> usize {
    DEFAULT_PARALLEL_MIN_RECORDS
}
