//! Collaborator capabilities consumed by the pipeline.

pub mod domain;
pub mod language_model;
pub mod model;

pub use domain::{DomainProcessing, RenderedGraph};
pub use language_model::{ChatMessage, LanguageModel, LlmResponse};
pub use model::{ForwardOutput, GraphModel};
