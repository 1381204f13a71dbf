//! # Agora LLM
//!
//! The model-completion capability used by the debate engine.
//!
//! The engine treats "get a completion for a prompt plus history" as an
//! injected dependency. Implement [`LlmProvider`] for your backend of choice;
//! [`MockProvider`] covers tests and offline runs.
//!
//! ## Quick Start
//!
//! ```rust
//! use agora_llm::{GenerationConfig, HistoryEntry, LlmProvider, LlmRequest, MockProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let llm = MockProvider::constant("Counterpoint: costs rise.");
//!     let history = vec![HistoryEntry::new("Uniforms reduce bullying.", true)];
//!     let request = LlmRequest::with_history("Respond.", history, GenerationConfig::default());
//!
//!     let response = llm.complete(request).await.unwrap();
//!     assert_eq!(response.content, "Counterpoint: costs rise.");
//! }
//! ```

pub mod config;
pub mod mock;
pub mod provider;

pub use config::{ConfigError, GenerationConfig};
pub use mock::MockProvider;
pub use provider::{HistoryEntry, LlmError, LlmProvider, LlmRequest, LlmResponse};
