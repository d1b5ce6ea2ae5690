//! OpenAI-compatible chat-completions client with retry, exponential backoff,
//! timeout, and gzip compression.

use std::fmt;
use std::time::Duration;

use atlas_core::config::HypothesisConfig;
use atlas_core::errors::HypothesisError;
use atlas_core::traits::{ChatMessage, LanguageModel, LlmResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Transport settings of the chat client.
#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry).
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl Default for OpenAiClientConfig {
    fn default() -> Self {
        Self::from(&HypothesisConfig::default())
    }
}

impl From<&HypothesisConfig> for OpenAiClientConfig {
    fn from(config: &HypothesisConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

fn request_err(reason: String) -> HypothesisError {
    HypothesisError::RequestFailed { reason }
}

/// Chat-completions client. The API key is fixed at construction.
pub struct OpenAiClient {
    config: OpenAiClientConfig,
    api_key: String,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("config", &self.config)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(config: OpenAiClientConfig, api_key: impl Into<String>) -> Result<Self, HypothesisError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(HypothesisError::MissingApiKey);
        }
        Ok(Self { config, api_key })
    }

    /// Build from the hypothesis configuration; fails without an API key.
    pub fn from_config(config: &HypothesisConfig) -> Result<Self, HypothesisError> {
        let api_key = config.api_key.clone().ok_or(HypothesisError::MissingApiKey)?;
        Self::new(OpenAiClientConfig::from(config), api_key)
    }

    pub fn config(&self) -> &OpenAiClientConfig {
        &self.config
    }

    /// Unified retry loop. Client errors (4xx) are not retried.
    fn post_with_retry(&self, messages: &[ChatMessage]) -> Result<String, HypothesisError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .gzip(true)
            .build()
            .map_err(|e: reqwest::Error| request_err(e.to_string()))?;
        let body = ChatRequest {
            model: &self.config.model,
            messages,
        };

        let mut backoff = self.config.initial_backoff;
        let mut last_err = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                debug!(
                    attempt,
                    max_retries = self.config.max_retries,
                    backoff_ms = backoff.as_millis() as u64,
                    "retrying chat completion"
                );
                std::thread::sleep(backoff);
                backoff = (backoff * 2).min(self.config.max_backoff);
            }

            let request = client
                .post(&self.config.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body);

            match request.send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let text = resp
                            .text()
                            .map_err(|e: reqwest::Error| request_err(e.to_string()))?;
                        return parse_completion(&text);
                    }
                    if status.is_client_error() {
                        let body_text = resp.text().unwrap_or_default();
                        return Err(request_err(format!("HTTP {status}: {body_text}")));
                    }
                    last_err = format!("HTTP {status}");
                }
                Err(e) => {
                    last_err = e.to_string();
                }
            }
        }

        Err(request_err(format!(
            "all {} retries exhausted: {last_err}",
            self.config.max_retries
        )))
    }
}

/// Extract the first choice's content from a chat-completions response body.
pub fn parse_completion(body: &str) -> Result<String, HypothesisError> {
    let completion: ChatCompletion = serde_json::from_str(body)
        .map_err(|e| request_err(format!("deserialization failed: {e}")))?;
    completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(HypothesisError::EmptyResponse)
}

impl LanguageModel for OpenAiClient {
    fn query(
        &self,
        system_message: &str,
        user_message: &str,
    ) -> Result<LlmResponse, HypothesisError> {
        let mut transcript = vec![
            ChatMessage::new("system", system_message),
            ChatMessage::new("user", user_message),
        ];
        let text = self.post_with_retry(&transcript)?;
        transcript.push(ChatMessage::new("assistant", text.clone()));
        Ok(LlmResponse { text, transcript })
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_rejected() {
        let config = HypothesisConfig::default();
        assert!(matches!(
            OpenAiClient::from_config(&config),
            Err(HypothesisError::MissingApiKey)
        ));
        assert!(OpenAiClient::new(OpenAiClientConfig::default(), "  ").is_err());
    }

    #[test]
    fn client_config_follows_hypothesis_config() {
        let config = HypothesisConfig {
            api_key: Some("sk-test".to_string()),
            timeout_secs: 5,
            max_retries: 1,
            ..Default::default()
        };
        let client = OpenAiClient::from_config(&config).unwrap();
        assert_eq!(client.config().timeout, Duration::from_secs(5));
        assert_eq!(client.config().max_retries, 1);
        assert_eq!(client.name(), "gpt-4o");
    }

    #[test]
    fn request_body_has_model_and_messages() {
        let messages = vec![ChatMessage::new("system", "s"), ChatMessage::new("user", "u")];
        let body = serde_json::to_value(ChatRequest {
            model: "gpt-4o",
            messages: &messages,
        })
        .unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "u");
    }

    #[test]
    fn completion_content_is_extracted() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Halogens lower solubility."}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Halogens lower solubility.");
    }

    #[test]
    fn empty_or_malformed_completions_fail() {
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(HypothesisError::EmptyResponse)
        ));
        assert!(matches!(
            parse_completion("not json"),
            Err(HypothesisError::RequestFailed { .. })
        ));
    }

    #[test]
    fn unreachable_endpoint_exhausts_retries() {
        let config = OpenAiClientConfig {
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            timeout: Duration::from_millis(200),
            max_retries: 1,
            initial_backoff: Duration::from_millis(1),
            ..Default::default()
        };
        let client = OpenAiClient::new(config, "sk-test").unwrap();
        assert!(matches!(
            client.query("s", "u"),
            Err(HypothesisError::RequestFailed { .. })
        ));
    }
}
