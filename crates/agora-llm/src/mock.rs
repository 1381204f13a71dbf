//! Mock LLM provider for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

/// A mock LLM provider that returns predefined responses
///
/// Every request is recorded so tests can inspect prompts and history.
#[derive(Debug)]
pub struct MockProvider {
    /// Name of this mock
    pub name: String,
    /// Canned responses (cycles through them)
    responses: Vec<String>,
    /// Current response index
    index: AtomicUsize,
    /// Calls left that should fail before answering normally
    failures_remaining: AtomicUsize,
    /// Requests seen so far
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with given responses
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            name: "mock".to_string(),
            responses,
            index: AtomicUsize::new(0),
            failures_remaining: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same response
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Create a debate-aware mock that answers based on prompt content
    pub fn smart() -> Self {
        Self {
            name: "smart-mock".to_string(),
            ..Self::new(Vec::new())
        }
    }

    /// Create a mock whose every call fails
    pub fn failing() -> Self {
        Self::constant("unreachable").failing_next(usize::MAX)
    }

    /// Fail the next `n` calls with `RequestFailed`
    pub fn failing_next(self, n: usize) -> Self {
        self.failures_remaining.store(n, Ordering::SeqCst);
        self
    }

    /// Snapshot of the requests received so far
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn take_failure(&self) -> bool {
        self.failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn generate_smart_response(&self, request: &LlmRequest) -> String {
        let prompt_lower = request.prompt.to_lowercase();

        if prompt_lower.contains("as the opener") {
            return "Let me open with a clear claim: the evidence points firmly to my side, \
                 and I will show why over the coming rounds."
                .to_string();
        }

        if prompt_lower.contains("defend the position against") {
            return "I disagree. The costs outweigh the benefits, and the examples you gave \
                 do not generalize beyond a few cases."
                .to_string();
        }

        if prompt_lower.contains("defend the position in favor") {
            return "I maintain that the benefits are substantial, and the data collected so \
                 far supports a cautious adoption."
                .to_string();
        }

        if prompt_lower.contains("analyze both positions") {
            return "There are strong points on both sides; the answer depends on context and \
                 on how we weigh short-term against long-term effects."
                .to_string();
        }

        let preview: String = request.prompt.chars().take(50).collect();
        format!(
            "I understand you're asking about: \"{}\"\n\n\
             Here's my response based on the context provided.",
            preview
        )
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();

        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }

        if self.take_failure() {
            tracing::debug!(provider = %self.name, "Mock provider failing request");
            return Err(LlmError::RequestFailed("mock failure".to_string()));
        }

        let content = if self.responses.is_empty() {
            self.generate_smart_response(&request)
        } else {
            // Cycle through canned responses
            let idx = self.index.fetch_add(1, Ordering::Relaxed);
            self.responses[idx % self.responses.len()].clone()
        };

        Ok(LlmResponse {
            content,
            model: self.name.clone(),
            tokens_used: Some((request.prompt.len() / 4) as u32 + 100),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider() {
        let mock = MockProvider::constant("Hello, world!");
        let response = mock.ask("test").await.unwrap();
        assert_eq!(response, "Hello, world!");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cycles_responses() {
        let mock = MockProvider::new(vec!["one".into(), "two".into()]);
        assert_eq!(mock.ask("a").await.unwrap(), "one");
        assert_eq!(mock.ask("b").await.unwrap(), "two");
        assert_eq!(mock.ask("c").await.unwrap(), "one");
    }

    #[tokio::test]
    async fn test_failing_next_recovers() {
        let mock = MockProvider::constant("ok").failing_next(1);
        assert!(matches!(mock.ask("a").await, Err(LlmError::RequestFailed(_))));
        assert_eq!(mock.ask("b").await.unwrap(), "ok");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_smart_mock_follows_stance() {
        let mock = MockProvider::smart();
        let response = mock
            .ask("Defend the position AGAINST the topic")
            .await
            .unwrap();
        assert!(response.starts_with("I disagree"));
    }
}
