//! # atlas-hypothesis
//!
//! Natural-language hypotheses for concepts. Prompts are rendered from
//! Handlebars templates with the concept's prototypes and contribution, then
//! dispatched to a [`LanguageModel`](atlas_core::traits::LanguageModel).

pub mod client;
pub mod generator;
pub mod templates;

pub use client::{OpenAiClient, OpenAiClientConfig};
pub use generator::{default_contribution, HypothesisGenerator, HypothesisOutcome};
pub use templates::{PromptTemplates, PrototypeEvidence, UserPrompt};
