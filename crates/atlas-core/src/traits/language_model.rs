use serde::{Deserialize, Serialize};

use crate::errors::HypothesisError;

/// One chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Response text plus the full exchanged transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    pub text: String,
    pub transcript: Vec<ChatMessage>,
}

/// Language model query capability. Credentials belong to the implementation.
pub trait LanguageModel: Send + Sync {
    fn query(&self, system_message: &str, user_message: &str)
        -> Result<LlmResponse, HypothesisError>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}
