//! Error types for Typesense

use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse session payload: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid session: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Session store error: {0}")]
    StoreError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request-shape problems found while turning a payload into a `SessionInput`.
///
/// Every variant names the offending field so the caller can surface it as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error(
        "Non-chronological keystroke at keystrokes[{index}]: {current} ms follows {previous} ms"
    )]
    NonChronological {
        index: usize,
        previous: i64,
        current: i64,
    },
}

impl ValidationError {
    /// Name of the field this error refers to
    pub fn field(&self) -> String {
        match self {
            ValidationError::MissingField(field) => field.clone(),
            ValidationError::InvalidField { field, .. } => field.clone(),
            ValidationError::NonChronological { index, .. } => {
                format!("keystrokes[{index}].timestampMillis")
            }
        }
    }
}
