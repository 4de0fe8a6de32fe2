//! LlmClient trait definition

use async_trait::async_trait;

use super::{LlmError, Provider, RawTasks};

/// Stateless task-extraction client - each call is independent
///
/// Implementations send the prompt to their provider under that provider's
/// output contract and hand back the `tasks` member of the reply untouched.
/// Validation happens downstream in the normalizer. There are no retries: a
/// failed call surfaces to the caller as-is.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Which provider this client talks to
    fn provider(&self) -> Provider;

    /// Send one extraction request and return the raw `tasks` value
    async fn extract_tasks(&self, prompt: &str) -> Result<RawTasks, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tracing::debug;

    /// Mock LLM client for unit tests
    pub struct MockLlmClient {
        responses: Mutex<VecDeque<Result<RawTasks, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<Result<RawTasks, LlmError>>) -> Self {
            debug!(response_count = %responses.len(), "MockLlmClient::new: called");
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Shorthand for a client that answers once with `tasks`
        pub fn returning(tasks: RawTasks) -> Self {
            Self::new(vec![Ok(tasks)])
        }

        pub fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        fn provider(&self) -> Provider {
            Provider::OpenAi
        }

        async fn extract_tasks(&self, prompt: &str) -> Result<RawTasks, LlmError> {
            debug!("MockLlmClient::extract_tasks: called");
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::InvalidResponse("No more mock responses".to_string())))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let client = MockLlmClient::new(vec![Ok(json!([{"title": "one"}])), Ok(json!([]))]);

            let first = client.extract_tasks("prompt 1").await.unwrap();
            assert_eq!(first[0]["title"], "one");

            let second = client.extract_tasks("prompt 2").await.unwrap();
            assert_eq!(second, json!([]));

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.prompts(), vec!["prompt 1", "prompt 2"]);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            assert!(client.extract_tasks("prompt").await.is_err());
        }
    }
}
