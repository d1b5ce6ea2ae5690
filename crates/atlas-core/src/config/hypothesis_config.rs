use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Hypothesis generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HypothesisConfig {
    /// Short name of the predicted property, e.g. "water solubility".
    pub task_name: String,
    /// Longer task description for the system prompt.
    pub task_description: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Override for the embedded system template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_template: Option<PathBuf>,
    /// Override for the embedded user template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_template: Option<PathBuf>,
}

impl Default for HypothesisConfig {
    fn default() -> Self {
        Self {
            task_name: String::new(),
            task_description: String::new(),
            api_key: None,
            model: defaults::DEFAULT_CHAT_MODEL.to_string(),
            endpoint: defaults::DEFAULT_CHAT_ENDPOINT.to_string(),
            timeout_secs: defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            system_template: None,
            user_template: None,
        }
    }
}
