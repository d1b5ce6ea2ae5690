//! Error handling for Atlas.
//! One error enum per subsystem, `thiserror` only, aggregated by [`AtlasError`].

pub mod atlas_error;
pub mod clustering_error;
pub mod config_error;
pub mod domain_error;
pub mod hypothesis_error;
pub mod model_error;
pub mod prototype_error;

pub use atlas_error::{AtlasError, AtlasResult};
pub use clustering_error::ClusteringError;
pub use config_error::ConfigError;
pub use domain_error::DomainError;
pub use hypothesis_error::HypothesisError;
pub use model_error::ModelError;
pub use prototype_error::PrototypeError;
