//! # Agora Core
//!
//! Core types for structured human-vs-AI debates:
//! - [`DebateConfig`] - topic, difficulty, stances, opener, number of sets
//! - [`DebateState`] - Presentation → Rebuttal → Closing progression per set
//! - [`TurnLog`] - append-only message log
//! - [`InjectedError`] - errors deliberately planted in AI turns
//! - [`DebateScorer`] - deterministic post-debate assessment
//!
//! ## Quick Start
//!
//! ```rust
//! use agora_core::{AdvanceOutcome, Author, DebateConfig, DebateState, Difficulty, Opener, Stance};
//!
//! let config = DebateConfig::new("Four-day work week", Difficulty::Advanced, Stance::For, Opener::User)
//!     .with_sets(1);
//! let mut state = DebateState::new(&config);
//!
//! assert_eq!(state.whose_turn(), Author::User);
//! assert_eq!(state.advance(), AdvanceOutcome::Continuing);
//! assert_eq!(state.whose_turn(), Author::Ai);
//! ```

pub mod config;
pub mod error;
pub mod fallacy;
pub mod flaw;
pub mod scoring;
pub mod state;
pub mod transcript;
pub mod turn;

pub use config::{DebateConfig, Difficulty, Opener, Stance, DEFAULT_SETS, MAX_SETS, MIN_SETS};
pub use error::DebateError;
pub use fallacy::FallacyFinding;
pub use flaw::{ErrorKind, InjectedError};
pub use scoring::{DebateAnalysis, DebateScorer, ScoringInput};
pub use state::{AdvanceOutcome, DebateState, Phase};
pub use transcript::{preview, Transcript};
pub use turn::{Author, Turn, TurnLog};
