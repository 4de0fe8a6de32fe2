//! Extraction pipeline: prompt -> provider -> normalizer

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::normalizer::normalize_value;
use crate::config::LlmConfig;
use crate::domain::Task;
use crate::llm::{LlmClient, LlmError, create_client};
use crate::prompts::{self, TaskNote};

/// Runs one extraction against a provider client
///
/// Provider and network errors propagate untouched; only problems with the
/// shape of the reply are absorbed by the normalizer's fallback tasks.
pub struct Orchestrator {
    client: Arc<dyn LlmClient>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    pub async fn run(
        &self,
        vents: &[String],
        notes: &[TaskNote],
        template: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Task>, LlmError> {
        debug!(
            provider = %self.client.provider(),
            vent_count = vents.len(),
            note_count = notes.len(),
            "run: called"
        );
        let prompt = prompts::build(vents, notes, template);
        let raw = self.client.extract_tasks(&prompt).await?;
        let tasks = normalize_value(&raw, now);
        info!(task_count = tasks.len(), "Extracted tasks");
        Ok(tasks)
    }
}

/// One-shot extraction with a freshly built client
pub async fn extract(
    vents: &[String],
    notes: &[TaskNote],
    template: &str,
    provider: &str,
    api_key: &str,
    config: &LlmConfig,
    now: DateTime<Utc>,
) -> Result<Vec<Task>, LlmError> {
    let client = create_client(provider, api_key, config)?;
    Orchestrator::new(client).run(vents, notes, template, now).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use serde_json::{Value, json};

    fn vents() -> Vec<String> {
        vec!["the printer always jams".to_string(), "my meetings run over".to_string()]
    }

    #[tokio::test]
    async fn test_run_builds_prompt_and_normalizes() {
        let client = Arc::new(MockLlmClient::returning(json!([{
            "title": "Schedule printer maintenance",
            "description": "Book a technician",
            "category": "Action",
            "priority": "high",
            "recurring": "monthly",
            "subtasks": ["find the contract"],
        }])));
        let orchestrator = Orchestrator::new(client.clone());
        let notes = vec![TaskNote::new("Fix printer", "vendor called back")];

        let tasks = orchestrator
            .run(&vents(), &notes, "Frustrations:\n{text}", Utc::now())
            .await
            .unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Schedule printer maintenance");
        assert!(tasks[0].next_due.is_some());

        let prompt = &client.prompts()[0];
        let first = prompt.find("1. the printer always jams\n\n").unwrap();
        let second = prompt.find("2. my meetings run over\n\n").unwrap();
        assert!(first < second);
        assert!(prompt.starts_with("Frustrations:\n"));
        assert!(prompt.contains("- Fix printer: vendor called back\n"));
    }

    #[tokio::test]
    async fn test_provider_error_propagates_without_fallback() {
        let client = Arc::new(MockLlmClient::new(vec![Err(LlmError::ApiError {
            status: 401,
            message: "Invalid API key".to_string(),
        })]));
        let orchestrator = Orchestrator::new(client);

        let result = orchestrator.run(&vents(), &[], "{text}", Utc::now()).await;
        assert!(matches!(result, Err(LlmError::ApiError { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_missing_tasks_is_recovered() {
        let client = Arc::new(MockLlmClient::returning(Value::Null));
        let tasks = Orchestrator::new(client)
            .run(&vents(), &[], "{text}", Utc::now())
            .await
            .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Address current concerns");
    }

    #[tokio::test]
    async fn test_extract_rejects_unsupported_provider() {
        let result = extract(&vents(), &[], "{text}", "palm", "key", &LlmConfig::default(), Utc::now()).await;
        assert!(matches!(result, Err(LlmError::UnsupportedProvider(_))));
    }
}
