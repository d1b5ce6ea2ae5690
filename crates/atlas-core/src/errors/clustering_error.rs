/// Concept clustering errors.
#[derive(Debug, thiserror::Error)]
pub enum ClusteringError {
    #[error("clustering backend failed: {reason}")]
    BackendFailed { reason: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding row {row} contains a non-finite value")]
    NonFinite { row: usize },

    #[error("backend returned {actual} labels for {expected} rows")]
    LabelCountMismatch { expected: usize, actual: usize },
}
