//! Error taxonomy for debate operations
//!
//! None of these are fatal: every failure is handed back to the caller as a
//! value and the session stays usable.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by debate operations
#[derive(Debug, Error)]
pub enum DebateError {
    /// The operation needs an active debate configuration
    #[error("No debate is configured for this session")]
    ConfigurationMissing,

    /// No session is selected
    #[error("No active session")]
    NoActiveSession,

    /// A session id did not match any known session
    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    /// Analysis was requested before the user said anything
    #[error("No user turns to analyze")]
    EmptyTurnLog,

    /// The debate configuration was rejected
    #[error("Invalid debate configuration: {0}")]
    InvalidConfig(String),

    /// Retry was requested but the last turn already has a reply
    #[error("No unanswered user turn to retry")]
    NothingToRetry,

    /// The external model failed; the user turn stays recorded and can be retried
    #[error("Model completion failed: {0}")]
    ModelCompletion(String),
}

impl DebateError {
    /// Whether the caller can retry the same operation without changing input
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ModelCompletion(_))
    }
}
