/// Configuration errors. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("failed to read config {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("unsupported value for {field}: {value:?}")]
    UnsupportedValue { field: String, value: String },

    #[error("invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },
}
