//! Prompt templates (Handlebars).

use std::path::Path;

use atlas_core::errors::HypothesisError;
use atlas_core::models::Prototype;
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

const SYSTEM: &str = "system";
const USER: &str = "user";

/// Embedded default templates.
pub const DEFAULT_SYSTEM_TEMPLATE: &str = include_str!("../templates/system_message.hbs");
pub const DEFAULT_USER_TEMPLATE: &str = include_str!("../templates/user_message.hbs");

/// One prototype as shown to the language model.
#[derive(Debug, Clone, Serialize)]
pub struct PrototypeEvidence {
    pub repr: String,
    pub image_path: String,
    pub node_count: usize,
}

impl From<&Prototype> for PrototypeEvidence {
    fn from(prototype: &Prototype) -> Self {
        Self {
            repr: prototype.repr().to_string(),
            image_path: prototype.image_path.display().to_string(),
            node_count: prototype.graph().num_nodes(),
        }
    }
}

/// Variables of the user template.
#[derive(Debug, Clone, Serialize)]
pub struct UserPrompt {
    pub prototypes: Vec<PrototypeEvidence>,
    pub name: String,
    pub contribution: String,
}

/// Registered system and user templates.
pub struct PromptTemplates {
    registry: Handlebars<'static>,
}

impl PromptTemplates {
    /// The embedded defaults.
    pub fn new() -> Result<Self, HypothesisError> {
        Self::from_sources(DEFAULT_SYSTEM_TEMPLATE, DEFAULT_USER_TEMPLATE)
    }

    pub fn from_sources(system: &str, user: &str) -> Result<Self, HypothesisError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(SYSTEM, system)
            .map_err(|e| template_error(SYSTEM, e))?;
        registry
            .register_template_string(USER, user)
            .map_err(|e| template_error(USER, e))?;
        Ok(Self { registry })
    }

    /// Defaults, replaced by the given files where present.
    pub fn with_overrides(
        system_path: Option<&Path>,
        user_path: Option<&Path>,
    ) -> Result<Self, HypothesisError> {
        let system = match system_path {
            Some(path) => read_template(SYSTEM, path)?,
            None => DEFAULT_SYSTEM_TEMPLATE.to_string(),
        };
        let user = match user_path {
            Some(path) => read_template(USER, path)?,
            None => DEFAULT_USER_TEMPLATE.to_string(),
        };
        Self::from_sources(&system, &user)
    }

    pub fn render_system(&self, description: &str) -> Result<String, HypothesisError> {
        self.registry
            .render(SYSTEM, &json!({ "description": description }))
            .map_err(|e| template_error(SYSTEM, e))
    }

    pub fn render_user(&self, prompt: &UserPrompt) -> Result<String, HypothesisError> {
        self.registry
            .render(USER, prompt)
            .map_err(|e| template_error(USER, e))
    }
}

fn read_template(name: &str, path: &Path) -> Result<String, HypothesisError> {
    std::fs::read_to_string(path).map_err(|e| HypothesisError::TemplateFailed {
        name: name.to_string(),
        reason: format!("{}: {e}", path.display()),
    })
}

fn template_error(name: &str, e: impl std::fmt::Display) -> HypothesisError {
    HypothesisError::TemplateFailed {
        name: name.to_string(),
        reason: e.to_string(),
    }
}
