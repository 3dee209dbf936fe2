//! Error types for the LLM layer

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when using LLM providers
#[derive(Debug, Error)]
pub enum LlmError {
    /// Rejected credentials
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// HTTP request failures
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// Response could not be understood (no choices, bad shape)
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded (retry after {retry_after:?})")]
    RateLimitExceeded { retry_after: Option<Duration> },

    /// Provider-specific errors
    #[error("Provider error ({code}): {message}")]
    ProviderError { code: String, message: String },
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return LlmError::SerializationError(err.to_string());
        }

        LlmError::HttpError {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}
