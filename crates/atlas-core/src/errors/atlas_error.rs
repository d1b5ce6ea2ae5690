use super::{
    ClusteringError, ConfigError, DomainError, HypothesisError, ModelError, PrototypeError,
};

/// Top-level error type. Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("clustering error: {0}")]
    Clustering(#[from] ClusteringError),

    #[error("prototype error: {0}")]
    Prototype(#[from] PrototypeError),

    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("hypothesis error: {0}")]
    Hypothesis(#[from] HypothesisError),

    #[error("I/O error at {path}: {reason}")]
    Io { path: String, reason: String },
}

impl AtlasError {
    /// True for errors that abort the whole run: bad configuration, a model
    /// that did not annotate the dataset, and I/O. Clustering, prototype,
    /// domain, and hypothesis errors are scoped to one channel or one concept.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Model(_) | Self::Io { .. })
    }
}

pub type AtlasResult<T> = Result<T, AtlasError>;
