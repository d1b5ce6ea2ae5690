//! # atlas-core
//!
//! Foundation crate for the Atlas concept explanation system.
//! Defines graph records, concepts, prototypes, the collaborator traits
//! (model, domain processing, language model), errors, config, and distance metrics.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod distance;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::AtlasConfig;
pub use errors::{AtlasError, AtlasResult};
pub use models::{
    ChannelInfo, Concept, Dataset, DatasetElement, DatasetType, GraphRecord, Matrix, Prediction,
    Prototype,
};
