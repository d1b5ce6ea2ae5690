//! Language model double that replays scripted replies and records prompts.

use std::sync::Mutex;

use atlas_core::errors::HypothesisError;
use atlas_core::traits::{ChatMessage, LanguageModel, LlmResponse};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Fail(String),
}

/// Replays replies in order; the last one repeats once the script runs out.
pub struct ScriptedLanguageModel {
    replies: Vec<ScriptedReply>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedLanguageModel {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(text: &str) -> Self {
        Self::new(vec![ScriptedReply::Text(text.to_string())])
    }

    pub fn failing(reason: &str) -> Self {
        Self::new(vec![ScriptedReply::Fail(reason.to_string())])
    }

    /// `(system_message, user_message)` of every query so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl LanguageModel for ScriptedLanguageModel {
    fn query(
        &self,
        system_message: &str,
        user_message: &str,
    ) -> Result<LlmResponse, HypothesisError> {
        let position = {
            let mut calls = self
                .calls
                .lock()
                .map_err(|e| HypothesisError::RequestFailed {
                    reason: e.to_string(),
                })?;
            calls.push((system_message.to_string(), user_message.to_string()));
            calls.len() - 1
        };

        let reply = self
            .replies
            .get(position)
            .or_else(|| self.replies.last())
            .cloned()
            .ok_or(HypothesisError::EmptyResponse)?;

        match reply {
            ScriptedReply::Text(text) => Ok(LlmResponse {
                transcript: vec![
                    ChatMessage::new("system", system_message),
                    ChatMessage::new("user", user_message),
                    ChatMessage::new("assistant", text.clone()),
                ],
                text,
            }),
            ScriptedReply::Fail(reason) => Err(HypothesisError::RequestFailed { reason }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
