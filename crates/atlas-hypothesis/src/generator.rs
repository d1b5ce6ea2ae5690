//! HypothesisGenerator: one language model query per concept with prototypes.

use std::sync::Arc;

use atlas_core::config::HypothesisConfig;
use atlas_core::errors::HypothesisError;
use atlas_core::models::Concept;
use atlas_core::traits::LanguageModel;
use atlas_observability::events;
use serde::Serialize;
use tracing::info;

use crate::templates::{PromptTemplates, PrototypeEvidence, UserPrompt};

/// Turns `(channel_index, contribution)` into the text shown in the prompt.
pub type ContributionFormatter = Box<dyn Fn(usize, f64) -> String + Send + Sync>;

/// Contribution with two decimals.
pub fn default_contribution(_channel_index: usize, contribution: f64) -> String {
    format!("{contribution:.2}")
}

/// What happened to one concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HypothesisOutcome {
    Generated { concept_index: usize, chars: usize },
    Skipped { concept_index: usize, reason: String },
    Failed { concept_index: usize, reason: String },
}

impl HypothesisOutcome {
    pub fn concept_index(&self) -> usize {
        match self {
            Self::Generated { concept_index, .. }
            | Self::Skipped { concept_index, .. }
            | Self::Failed { concept_index, .. } => *concept_index,
        }
    }
}

/// Hypothesis generator.
pub struct HypothesisGenerator {
    templates: PromptTemplates,
    language_model: Arc<dyn LanguageModel>,
    task_name: String,
    task_description: String,
    contribution: ContributionFormatter,
}

impl HypothesisGenerator {
    pub fn new(
        templates: PromptTemplates,
        language_model: Arc<dyn LanguageModel>,
        task_name: impl Into<String>,
        task_description: impl Into<String>,
    ) -> Self {
        Self {
            templates,
            language_model,
            task_name: task_name.into(),
            task_description: task_description.into(),
            contribution: Box::new(default_contribution),
        }
    }

    /// Generator with the configured task and template overrides.
    pub fn from_config(
        config: &HypothesisConfig,
        language_model: Arc<dyn LanguageModel>,
    ) -> Result<Self, HypothesisError> {
        let templates = PromptTemplates::with_overrides(
            config.system_template.as_deref(),
            config.user_template.as_deref(),
        )?;
        Ok(Self::new(
            templates,
            language_model,
            config.task_name.clone(),
            config.task_description.clone(),
        ))
    }

    pub fn with_contribution_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(usize, f64) -> String + Send + Sync + 'static,
    {
        self.contribution = Box::new(formatter);
        self
    }

    /// Attach hypotheses to every concept that has prototypes.
    ///
    /// Only a failing system template aborts; per-concept failures are
    /// recorded in the returned outcomes.
    pub fn generate(&self, concepts: &mut [Concept]) -> Result<Vec<HypothesisOutcome>, HypothesisError> {
        let system_message = self.templates.render_system(&self.task_description)?;
        info!(
            concepts = concepts.len(),
            backend = self.language_model.name(),
            "generating concept hypotheses"
        );
        Ok(concepts
            .iter_mut()
            .map(|concept| self.generate_one(&system_message, concept))
            .collect())
    }

    fn generate_one(&self, system_message: &str, concept: &mut Concept) -> HypothesisOutcome {
        let concept_index = concept.index;
        if !concept.has_prototypes() {
            let reason = "concept has no prototypes";
            events::hypothesis_skipped(concept_index, reason);
            return HypothesisOutcome::Skipped {
                concept_index,
                reason: reason.to_string(),
            };
        }

        let prompt = UserPrompt {
            prototypes: concept.prototypes().iter().map(PrototypeEvidence::from).collect(),
            name: self.task_name.clone(),
            contribution: (self.contribution)(concept.channel_index(), concept.contribution),
        };
        let result = self
            .templates
            .render_user(&prompt)
            .and_then(|user_message| self.language_model.query(system_message, &user_message));

        match result {
            Ok(response) => {
                let chars = response.text.chars().count();
                events::hypothesis_generated(concept_index, chars);
                concept.hypothesis = Some(response.text);
                HypothesisOutcome::Generated {
                    concept_index,
                    chars,
                }
            }
            Err(e) => {
                events::hypothesis_failed(concept_index, &e.to_string());
                HypothesisOutcome::Failed {
                    concept_index,
                    reason: e.to_string(),
                }
            }
        }
    }
}
