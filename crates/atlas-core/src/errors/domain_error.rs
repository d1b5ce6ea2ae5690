/// Errors from the graph domain processing layer.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("invalid domain value {value:?}: {reason}")]
    InvalidValue { value: String, reason: String },

    #[error("cannot encode graph: {reason}")]
    EncodeFailed { reason: String },

    #[error("rendering failed: {reason}")]
    RenderFailed { reason: String },
}
