/// Hypothesis generation errors.
#[derive(Debug, thiserror::Error)]
pub enum HypothesisError {
    #[error("template {name} failed: {reason}")]
    TemplateFailed { name: String, reason: String },

    #[error("language model request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("language model returned no content")]
    EmptyResponse,

    #[error("no API key configured")]
    MissingApiKey,
}
