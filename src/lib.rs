// Goodall - categorical and numeric similarity analysis
// Main library entry point

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod similarity;

pub use analysis::{analyze, AnalysisError, AnalysisReport, RankTest, RankTestOutcome, Significance};
pub use config::{AnalysisConfig, GroupingStrategy};
pub use dataset::{CategoricalDataset, NumericDataset};
pub use similarity::{
    cosine_distances, goodall_distance, goodall_distance_with, DistanceMatrix, GoodallModel,
    SimilarityError,
};
