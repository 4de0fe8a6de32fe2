//! Anthropic API client implementation
//!
//! The Messages API has no structured-output mode here, so the prompt is
//! extended with explicit JSON formatting instructions and an example.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{LlmClient, LlmError, Provider, RawTasks, api_error, tasks_from_content};
use crate::config::ResolvedLlmConfig;

/// Anthropic API version header value
const API_VERSION: &str = "2023-06-01";

/// Appended to every prompt sent to Anthropic
pub const FORMAT_INSTRUCTIONS: &str = "\n\nPlease respond with a valid JSON object containing a \"tasks\" array. \
Each task should have exactly these fields: title, description, category, priority, recurring, subtasks. \
Example format:\n{\"tasks\": [{\"title\": \"Example task\", \"description\": \"Task description\", \
\"category\": \"Action\", \"priority\": \"medium\", \"recurring\": \"none\", \"subtasks\": [\"First step\"]}]}";

/// Anthropic API client
pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Create a new client from resolved configuration
    pub fn new(api_key: impl Into<String>, config: &ResolvedLlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "new: called");
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the Anthropic API
    fn build_request_body(&self, prompt: &str) -> Value {
        debug!(%self.model, prompt_len = prompt.len(), "build_request_body: called");
        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{
                "role": "user",
                "content": format!("{}{}", prompt, FORMAT_INSTRUCTIONS),
            }],
        })
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn extract_tasks(&self, prompt: &str) -> Result<RawTasks, LlmError> {
        debug!(%self.model, "extract_tasks: called");
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_request_body(prompt);

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "extract_tasks: API error");
            return Err(api_error(response).await);
        }

        let text = response.text().await?;
        let api_response: AnthropicResponse = serde_json::from_str(&text)?;

        let content = api_response
            .content
            .into_iter()
            .find_map(|block| block.text.filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                debug!("extract_tasks: no text block in response");
                LlmError::invalid_format()
            })?;

        debug!(content_len = content.len(), "extract_tasks: success");
        tasks_from_content(&content)
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(default)]
    text: Option<String>,
}
