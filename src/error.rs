//! Error types shared by every stage of the k-NN pipeline.

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, KnnError>;

/// All failures are local precondition violations; none are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KnnError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl KnnError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        KnnError::InvalidArgument(msg.into())
    }
}
