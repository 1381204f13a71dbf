//! # Agora Runtime
//!
//! Debate orchestration on top of an injected model provider.
//!
//! [`DebateEngine`] keeps chat sessions, runs the turn/set progression,
//! screens citations, plants and tracks deliberate errors, and scores the
//! finished debate with [`analyze_transcript`].
//!
//! ```rust
//! use std::sync::Arc;
//! use agora_core::{DebateConfig, Difficulty, Opener, Stance};
//! use agora_llm::MockProvider;
//! use agora_runtime::{DebateEngine, EngineConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let llm = Arc::new(MockProvider::constant("Costs outweigh benefits."));
//!     let mut engine = DebateEngine::new(llm, EngineConfig::default());
//!     engine.new_session();
//!
//!     let config = DebateConfig::new("Four-day week", Difficulty::Basic, Stance::For, Opener::User);
//!     engine.configure_debate(config).await.unwrap();
//!
//!     let report = engine.submit_user_turn("It boosts productivity.").await.unwrap();
//!     assert_eq!(report.reply, "Costs outweigh benefits.");
//!     assert!(engine.request_analysis().is_ok());
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod engine;
pub mod session;

pub use analysis::analyze_transcript;
pub use config::EngineConfig;
pub use engine::{DebateEngine, FlaggedSource, TurnReport, TurnWarning};
pub use session::{ActiveDebate, ChatSession, GREETING};
