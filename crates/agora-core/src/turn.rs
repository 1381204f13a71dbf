//! Turns and the append-only turn log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Ai,
}

impl Author {
    /// The other party
    pub fn other(&self) -> Author {
        match self {
            Author::User => Author::Ai,
            Author::Ai => Author::User,
        }
    }

    /// Whether this is the human
    pub fn is_user(&self) -> bool {
        matches!(self, Author::User)
    }
}

/// A single message in the debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Message text
    pub text: String,
    /// Who wrote it
    pub author: Author,
    /// When it was recorded
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// A turn authored by the human, stamped now
    pub fn user(text: &str) -> Self {
        Self::new(text, Author::User)
    }

    /// A turn authored by the AI, stamped now
    pub fn ai(text: &str) -> Self {
        Self::new(text, Author::Ai)
    }

    fn new(text: &str, author: Author) -> Self {
        Self {
            text: text.to_string(),
            author,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only log of turns for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnLog {
    turns: Vec<Turn>,
}

impl TurnLog {
    /// Empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return its index
    pub fn push(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    /// Drop every turn
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// All turns in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Last turn, if any
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Turns written by the human, oldest first
    pub fn user_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.author.is_user())
    }

    /// Number of turns written by the human
    pub fn user_turn_count(&self) -> usize {
        self.user_turns().count()
    }
}

impl From<Vec<Turn>> for TurnLog {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_returns_index() {
        let mut log = TurnLog::new();
        assert_eq!(log.push(Turn::ai("Hello")), 0);
        assert_eq!(log.push(Turn::user("Hi")), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.user_turn_count(), 1);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut log = TurnLog::new();
        log.push(Turn::user("Point"));
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["author"], "user");
    }
}
