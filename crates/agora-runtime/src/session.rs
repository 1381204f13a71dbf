//! Chat sessions and the debate attached to them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora_core::{
    preview, Author, DebateConfig, DebateState, InjectedError, Transcript, Turn, TurnLog,
};

/// First AI message of every fresh or cleared session
pub const GREETING: &str =
    "Hello! I'm Agora, your debate partner. What topic would you like to debate today?";

/// Characters of the first user turn kept in a derived title
const TITLE_CHARS: usize = 30;

/// A configured debate and its progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveDebate {
    pub config: DebateConfig,
    pub state: DebateState,
    /// Planted errors, in the order the AI turns were recorded
    pub injected_errors: Vec<InjectedError>,
}

impl ActiveDebate {
    pub fn new(config: DebateConfig) -> Self {
        let state = DebateState::new(&config);
        Self {
            config,
            state,
            injected_errors: Vec::new(),
        }
    }
}

/// One conversation, optionally running a structured debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub title: String,
    pub log: TurnLog,
    pub debate: Option<ActiveDebate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// New session seeded with the greeting
    pub fn new(title: &str) -> Self {
        let now = Utc::now();
        let mut log = TurnLog::new();
        log.push(Turn::ai(GREETING));
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            log,
            debate: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a debate is configured
    pub fn is_debate(&self) -> bool {
        self.debate.is_some()
    }

    /// Debate config, if any
    pub fn config(&self) -> Option<&DebateConfig> {
        self.debate.as_ref().map(|d| &d.config)
    }

    /// Who should speak next; free chat is always the user's turn
    pub fn whose_turn(&self) -> Author {
        self.debate
            .as_ref()
            .map(|d| d.state.whose_turn())
            .unwrap_or(Author::User)
    }

    /// Progress line of the running debate
    pub fn progress(&self) -> Option<String> {
        self.debate.as_ref().map(|d| d.state.progress())
    }

    /// Whether the last turn is a user turn still waiting for a reply
    pub fn has_pending_user_turn(&self) -> bool {
        self.log.last().is_some_and(|t| t.author.is_user())
    }

    /// Append a turn and return its index
    pub fn push(&mut self, turn: Turn) -> usize {
        self.updated_at = Utc::now();
        self.log.push(turn)
    }

    /// Use the first user turn as title when no debate names the session
    pub(crate) fn maybe_title_from(&mut self, text: &str) {
        if self.debate.is_none() && self.log.user_turn_count() == 1 {
            self.title = preview(text, TITLE_CHARS);
        }
    }

    /// Empty the log and drop any debate, then greet again
    pub fn clear(&mut self) {
        self.log.clear();
        self.debate = None;
        self.push(Turn::ai(GREETING));
    }

    /// Snapshot for analysis or export
    pub fn transcript(&self) -> Transcript {
        Transcript {
            config: self.config().cloned(),
            turns: self.log.clone(),
            injected_errors: self
                .debate
                .as_ref()
                .map(|d| d.injected_errors.clone())
                .unwrap_or_default(),
        }
    }
}
