//! LLM error types

use thiserror::Error;

/// Message used whenever a provider reply lacks the expected content field
pub const INVALID_FORMAT: &str = "Invalid API response format";

/// Errors that can occur while calling an LLM provider
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    InvalidResponse(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported LLM provider: {0}")]
    UnsupportedProvider(String),
}

impl LlmError {
    pub(crate) fn invalid_format() -> Self {
        Self::InvalidResponse(INVALID_FORMAT.to_string())
    }

    /// HTTP status, if the provider answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Rejected credentials, usually a missing or wrong API key
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }
}
