// Pairwise similarity analysis

pub mod frequency;
pub mod probability;
pub mod weights;
pub mod matrix;
pub mod goodall;
pub mod cosine;
pub mod scoring;
pub mod clustering;

pub use frequency::*;
pub use probability::*;
pub use weights::*;
pub use matrix::*;
pub use goodall::*;
pub use cosine::*;
pub use scoring::*;
pub use clustering::*;

/// Error type for similarity computations
#[derive(Debug, thiserror::Error)]
pub enum SimilarityError {
    #[error("Dataset has no records or no attributes")]
    EmptyInput,

    #[error("Pairwise distances need at least 2 records, got {n}")]
    InsufficientSamples { n: usize },

    #[error("Inconsistent schema: {0}")]
    InconsistentSchema(String),

    #[error("Non-finite value at record {row}, column {column}")]
    NonFiniteValue { row: usize, column: usize },

    #[error("Record index {index} out of bounds for {len} records")]
    IndexOutOfBounds { index: usize, len: usize },
}
