//! Deliberately planted reasoning errors
//!
//! The AI opponent sometimes commits one of a fixed set of logical errors so
//! the human can practice spotting them. Each planted error is recorded as an
//! [`InjectedError`]; whether the human challenged it is only known once the
//! whole debate can be scanned.

use serde::{Deserialize, Serialize};

/// The fixed set of errors the AI can be asked to commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    HastyGeneralization,
    FalseDichotomy,
    AppealToAuthority,
    UnsourcedStatistic,
    Contradiction,
    CircularArgument,
    StrawMan,
    PostHoc,
}

impl ErrorKind {
    /// Every kind, in catalog order
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::HastyGeneralization,
        ErrorKind::FalseDichotomy,
        ErrorKind::AppealToAuthority,
        ErrorKind::UnsourcedStatistic,
        ErrorKind::Contradiction,
        ErrorKind::CircularArgument,
        ErrorKind::StrawMan,
        ErrorKind::PostHoc,
    ];

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::HastyGeneralization => "Hasty Generalization",
            ErrorKind::FalseDichotomy => "False Dichotomy",
            ErrorKind::AppealToAuthority => "Appeal to Authority without Evidence",
            ErrorKind::UnsourcedStatistic => "Unsourced Statistic",
            ErrorKind::Contradiction => "Contradiction",
            ErrorKind::CircularArgument => "Circular Argument",
            ErrorKind::StrawMan => "Straw Man",
            ErrorKind::PostHoc => "Post Hoc (False Causality)",
        }
    }

    /// Advice given when the human let this kind slip by
    pub fn missed_tip(&self) -> &'static str {
        match self {
            ErrorKind::HastyGeneralization => {
                "💡 Watch for generalizations built on words like 'always', 'never', 'everyone'"
            }
            ErrorKind::FalseDichotomy => "💡 Push back when only two extreme options are offered",
            ErrorKind::AppealToAuthority => "💡 Check the credentials of any authority being cited",
            ErrorKind::UnsourcedStatistic => "💡 Ask for the source of specific statistics",
            ErrorKind::Contradiction => "💡 Compare current arguments with what was said earlier",
            ErrorKind::CircularArgument => {
                "💡 Check whether the conclusion is already assumed in the premises"
            }
            ErrorKind::StrawMan => "💡 Check whether your argument was represented accurately",
            ErrorKind::PostHoc => "💡 Tell correlation apart from causation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An error the AI was instructed to commit in one of its turns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectedError {
    /// Which error was requested
    pub kind: ErrorKind,
    /// The AI text that should contain it
    pub text: String,
    /// Index of the AI turn in the session log
    pub turn_index: usize,
    /// `None` until analysis decides whether a later user turn challenged it
    #[serde(default)]
    pub challenged: Option<bool>,
}

impl InjectedError {
    /// Record a planted error with its challenge status still open
    pub fn new(kind: ErrorKind, text: &str, turn_index: usize) -> Self {
        Self {
            kind,
            text: text.to_string(),
            turn_index,
            challenged: None,
        }
    }

    /// Resolved as challenged
    pub fn was_challenged(&self) -> bool {
        self.challenged == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error_is_unresolved() {
        let err = InjectedError::new(ErrorKind::StrawMan, "You just want chaos.", 3);
        assert_eq!(err.challenged, None);
        assert!(!err.was_challenged());
    }

    #[test]
    fn test_labels_unique() {
        let mut labels: Vec<_> = ErrorKind::ALL.iter().map(|k| k.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 8);
    }
}
