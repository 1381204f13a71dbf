//! LLM Provider trait and common types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GenerationConfig;

/// Errors from LLM providers
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Provider not available")]
    NotAvailable,
}

/// One prior message handed to the model as context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Message text
    pub text: String,
    /// Whether the human wrote it
    pub is_user: bool,
}

impl HistoryEntry {
    /// Create a history entry
    pub fn new(text: &str, is_user: bool) -> Self {
        Self {
            text: text.to_string(),
            is_user,
        }
    }
}

/// A request to an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// Full prompt for this turn
    pub prompt: String,
    /// Prior conversation, oldest first
    pub history: Vec<HistoryEntry>,
    /// Sampling knobs, passed through to the backend unmodified
    pub generation: GenerationConfig,
}

impl LlmRequest {
    /// Create a request with no history and default settings
    pub fn simple(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            history: Vec::new(),
            generation: GenerationConfig::default(),
        }
    }

    /// Create a request carrying conversation history
    ///
    /// Only the most recent `generation.history_limit` entries are kept.
    pub fn with_history(
        prompt: &str,
        history: Vec<HistoryEntry>,
        generation: GenerationConfig,
    ) -> Self {
        let keep_from = history.len().saturating_sub(generation.history_limit);
        let history = history.into_iter().skip(keep_from).collect();
        Self {
            prompt: prompt.to_string(),
            history,
            generation,
        }
    }
}

/// Response from an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,
    /// Model used
    pub model: String,
    /// Tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Time taken in milliseconds
    pub latency_ms: u64,
}

/// Trait for LLM providers
///
/// The debate engine only ever needs `complete(prompt, history) -> text`;
/// transport, auth and timeouts belong to the implementor.
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Generate a completion
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Generate with a simple prompt (convenience method)
    async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.complete(LlmRequest::simple(prompt)).await?;
        Ok(response.content)
    }
}
