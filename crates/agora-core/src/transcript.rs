//! Snapshot of a debate, the input of every analysis

use serde::{Deserialize, Serialize};

use crate::config::DebateConfig;
use crate::flaw::InjectedError;
use crate::turn::TurnLog;

/// Everything needed to score a debate after the fact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Active config, absent for free chat
    pub config: Option<DebateConfig>,
    /// Full turn log
    pub turns: TurnLog,
    /// Errors planted in AI turns, in turn order
    #[serde(default)]
    pub injected_errors: Vec<InjectedError>,
}

impl Transcript {
    /// Texts of the human's turns, oldest first
    pub fn user_texts(&self) -> Vec<&str> {
        self.turns.user_turns().map(|t| t.text.as_str()).collect()
    }
}

/// Cut `text` to `max` characters, marking the cut with "..."
pub fn preview(text: &str, max: usize) -> String {
    let mut out: String = text.chars().take(max).collect();
    if text.chars().count() > max {
        out.push_str("...");
    }
    out
}
