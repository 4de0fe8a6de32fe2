//! Application error taxonomy
//!
//! Normalization problems never surface here: the normalizer always
//! recovers with a fallback task.

use thiserror::Error;

use crate::llm::LlmError;
use crate::state::StateError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected user input or a missing precondition
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
