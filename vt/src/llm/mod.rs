//! LLM provider adapters
//!
//! One `LlmClient` implementation per provider, selected by [`Provider`].
//! OpenAI gets a strict JSON schema; Anthropic gets formatting instructions
//! appended to the prompt.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod openai;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::{INVALID_FORMAT, LlmError};
pub use openai::OpenAIClient;
pub use types::{Provider, RawTasks};

use crate::config::LlmConfig;

/// Create an LLM client for the named provider
///
/// Fails with [`LlmError::UnsupportedProvider`] for anything other than
/// "openai" or "anthropic".
pub fn create_client(provider: &str, api_key: &str, config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(%provider, "create_client: called");
    let provider: Provider = provider.parse()?;
    let resolved = config.resolve(provider);

    match provider {
        Provider::OpenAi => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::new(api_key, &resolved)?))
        }
        Provider::Anthropic => {
            debug!("create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::new(api_key, &resolved)?))
        }
    }
}

/// Build an `ApiError` from a non-success response
///
/// Prefers `error.message`, then a top-level `message`, then "Unknown error"
/// when the body is JSON; falls back to the HTTP reason phrase when it is not.
async fn api_error(response: reqwest::Response) -> LlmError {
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("Unknown error").to_string();
    let text = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<Value>(&text) {
        Ok(body) => body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .or_else(|| body.get("message").and_then(Value::as_str).filter(|m| !m.is_empty()))
            .unwrap_or("Unknown error")
            .to_string(),
        Err(_) => reason,
    };

    debug!(status = status.as_u16(), %message, "api_error: provider rejected request");
    LlmError::ApiError {
        status: status.as_u16(),
        message,
    }
}

/// Parse model output text and pull out its `tasks` member
fn tasks_from_content(content: &str) -> Result<RawTasks, LlmError> {
    let parsed: Value = serde_json::from_str(content.trim())?;
    Ok(parsed.get("tasks").cloned().unwrap_or(Value::Null))
}
