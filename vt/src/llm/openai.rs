//! OpenAI API client implementation
//!
//! Uses the Chat Completions API with a strict `json_schema` response format so
//! the provider enforces the task list shape.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{LlmClient, LlmError, Provider, RawTasks, api_error, tasks_from_content};
use crate::config::ResolvedLlmConfig;
use crate::domain::{Category, DESCRIPTION_MAX_CHARS, SUBTASK_MAX_CHARS, TITLE_MAX_CHARS};

/// Schema name sent with the structured-output request
const SCHEMA_NAME: &str = "task_list";

/// Most subtasks the schema allows per task
const MAX_SUBTASKS: usize = 10;

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAIClient {
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
            temperature: config.temperature,
        })
    }

    /// Build the request body for the OpenAI API
    fn build_request_body(&self, prompt: &str) -> Value {
        debug!(%self.model, prompt_len = prompt.len(), "build_request_body: called");

        let mut body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": prompt,
            }],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": task_list_schema(),
                },
            },
        });

        // GPT-5.x and o1/o3 models use max_completion_tokens and a fixed temperature
        let reasoning_model =
            self.model.starts_with("gpt-5") || self.model.starts_with("o1") || self.model.starts_with("o3");

        if reasoning_model {
            body["max_completion_tokens"] = json!(self.max_tokens);
        } else {
            body["max_tokens"] = json!(self.max_tokens);
            body["temperature"] = json!(self.temperature);
        }

        body
    }
}

/// JSON schema for the `task_list` structured output
pub fn task_list_schema() -> Value {
    let categories: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();

    json!({
        "type": "object",
        "properties": {
            "tasks": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "maxLength": TITLE_MAX_CHARS },
                        "description": { "type": "string", "maxLength": DESCRIPTION_MAX_CHARS },
                        "category": { "type": "string", "enum": categories },
                        "priority": { "type": "string", "enum": ["low", "medium", "high"] },
                        "recurring": { "type": "string", "enum": ["none", "daily", "weekly", "monthly"] },
                        "subtasks": {
                            "type": "array",
                            "items": { "type": "string", "maxLength": SUBTASK_MAX_CHARS },
                            "maxItems": MAX_SUBTASKS,
                        },
                    },
                    "required": ["title", "description", "category", "priority", "recurring", "subtasks"],
                    "additionalProperties": false,
                },
            },
        },
        "required": ["tasks"],
        "additionalProperties": false,
    })
}

#[async_trait]
impl LlmClient for OpenAIClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn extract_tasks(&self, prompt: &str) -> Result<RawTasks, LlmError> {
        debug!(%self.model, "extract_tasks: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(prompt);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "extract_tasks: API error");
            return Err(api_error(response).await);
        }

        let text = response.text().await?;
        let api_response: OpenAIResponse = serde_json::from_str(&text)?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| {
                debug!("extract_tasks: no message content in response");
                LlmError::invalid_format()
            })?;

        debug!(content_len = content.len(), "extract_tasks: success");
        tasks_from_content(&content)
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIMessage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}
