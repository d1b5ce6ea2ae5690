/// Errors raised by, or about, the graph model collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("forward pass failed: {reason}")]
    ForwardFailed { reason: String },

    #[error("model returned {actual} results for {expected} graphs")]
    BatchSizeMismatch { expected: usize, actual: usize },

    #[error("{dataset_type} fidelity needs {expected} channels, model has {actual}")]
    ChannelMismatch {
        dataset_type: String,
        expected: usize,
        actual: usize,
    },

    #[error("matrix data of length {len} does not fit shape ({rows}, {cols})")]
    InvalidShape { rows: usize, cols: usize, len: usize },

    #[error("matrix index ({row}, {col}) out of bounds for shape ({rows}, {cols})")]
    ShapeMismatch {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("graph {index} has not been annotated with {field}")]
    MissingAnnotation { index: usize, field: String },
}
