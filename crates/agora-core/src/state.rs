//! Turn and set progression
//!
//! Each set cycles Presentation -> Rebuttal -> Closing. Leaving Closing either
//! starts the next set or finishes the debate. Once finished, the state is
//! frozen.

use serde::{Deserialize, Serialize};

use crate::config::{DebateConfig, Opener};
use crate::turn::Author;

/// The sub-turn role within a set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Presentation,
    Rebuttal,
    Closing,
}

impl Phase {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Presentation => "Presentation",
            Phase::Rebuttal => "Rebuttal",
            Phase::Closing => "Closing",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What an advance did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// Moved to the next phase within the same set
    Continuing,
    /// A set ended and the next one started
    SetCompleted,
    /// The final set ended (or had already ended)
    Finished,
}

/// Mutable progression state of one debate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateState {
    /// 1-based index of the current set
    pub current_set: u32,
    /// Phase within the current set
    pub phase: Phase,
    /// Set once the final Closing has been left
    pub finished: bool,
    number_of_sets: u32,
    opener: Opener,
}

impl DebateState {
    /// Fresh state at set 1, Presentation
    pub fn new(config: &DebateConfig) -> Self {
        Self {
            current_set: 1,
            phase: Phase::Presentation,
            finished: false,
            number_of_sets: config.number_of_sets.max(1),
            opener: config.opener,
        }
    }

    /// Total sets in this debate
    pub fn number_of_sets(&self) -> u32 {
        self.number_of_sets
    }

    /// Move one phase forward
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.finished {
            return AdvanceOutcome::Finished;
        }

        match self.phase {
            Phase::Presentation => {
                self.phase = Phase::Rebuttal;
                AdvanceOutcome::Continuing
            }
            Phase::Rebuttal => {
                self.phase = Phase::Closing;
                AdvanceOutcome::Continuing
            }
            Phase::Closing => {
                if self.current_set >= self.number_of_sets {
                    self.finished = true;
                    tracing::info!(sets = self.number_of_sets, "Debate finished");
                    AdvanceOutcome::Finished
                } else {
                    self.current_set += 1;
                    self.phase = Phase::Presentation;
                    tracing::debug!(set = self.current_set, "Set completed");
                    AdvanceOutcome::SetCompleted
                }
            }
        }
    }

    /// Who should speak in the current phase
    ///
    /// The opener owns Presentation and Closing, the other party owns Rebuttal.
    pub fn whose_turn(&self) -> Author {
        let opener = match self.opener {
            Opener::User => Author::User,
            Opener::Ai => Author::Ai,
        };
        match self.phase {
            Phase::Presentation | Phase::Closing => opener,
            Phase::Rebuttal => opener.other(),
        }
    }

    /// Human-readable progress line
    pub fn progress(&self) -> String {
        if self.finished {
            return "Finished".to_string();
        }
        let who = match self.whose_turn() {
            Author::User => "Your turn",
            Author::Ai => "AI's turn",
        };
        format!(
            "Set {}/{} - {} - {}",
            self.current_set, self.number_of_sets, self.phase, who
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Difficulty, Stance};
    use proptest::prelude::*;

    fn state(sets: u32, opener: Opener) -> DebateState {
        let config =
            DebateConfig::new("Topic", Difficulty::Basic, Stance::For, opener).with_sets(sets);
        DebateState::new(&config)
    }

    #[test]
    fn test_single_set_cycle() {
        let mut s = state(1, Opener::User);
        assert_eq!(s.phase, Phase::Presentation);
        assert_eq!(s.advance(), AdvanceOutcome::Continuing);
        assert_eq!(s.phase, Phase::Rebuttal);
        assert_eq!(s.advance(), AdvanceOutcome::Continuing);
        assert_eq!(s.phase, Phase::Closing);
        assert_eq!(s.advance(), AdvanceOutcome::Finished);
        assert!(s.finished);
    }

    #[test]
    fn test_set_completed_then_presentation() {
        let mut s = state(2, Opener::User);
        s.advance();
        s.advance();
        assert_eq!(s.advance(), AdvanceOutcome::SetCompleted);
        assert_eq!(s.current_set, 2);
        assert_eq!(s.phase, Phase::Presentation);
    }

    #[test]
    fn test_finished_is_frozen() {
        let mut s = state(1, Opener::Ai);
        for _ in 0..3 {
            s.advance();
        }
        let frozen = s.clone();
        assert_eq!(s.advance(), AdvanceOutcome::Finished);
        assert_eq!(s, frozen);
    }

    #[test]
    fn test_turn_ownership_user_opens() {
        let mut s = state(1, Opener::User);
        assert_eq!(s.whose_turn(), Author::User);
        s.advance();
        assert_eq!(s.whose_turn(), Author::Ai);
        s.advance();
        assert_eq!(s.whose_turn(), Author::User);
    }

    #[test]
    fn test_turn_ownership_ai_opens() {
        let mut s = state(1, Opener::Ai);
        assert_eq!(s.whose_turn(), Author::Ai);
        s.advance();
        assert_eq!(s.whose_turn(), Author::User);
        s.advance();
        assert_eq!(s.whose_turn(), Author::Ai);
    }

    #[test]
    fn test_progress_text() {
        let mut s = state(2, Opener::User);
        assert_eq!(s.progress(), "Set 1/2 - Presentation - Your turn");
        s.advance();
        assert_eq!(s.progress(), "Set 1/2 - Rebuttal - AI's turn");
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_sets(sets in 1u32..=10, steps in 0usize..60) {
            let mut s = state(sets, Opener::User);
            let mut finishes = 0;
            for _ in 0..steps {
                let was_finished = s.finished;
                if s.advance() == AdvanceOutcome::Finished && !was_finished {
                    finishes += 1;
                }
                prop_assert!(s.current_set <= sets);
            }
            prop_assert!(finishes <= 1);
            prop_assert_eq!(s.finished, steps >= (sets as usize) * 3);
        }

        #[test]
        fn prop_phase_follows_step_count(sets in 1u32..=10, steps in 0usize..30) {
            let mut s = state(sets, Opener::Ai);
            for _ in 0..steps {
                s.advance();
            }
            if !s.finished {
                let expected = match steps % 3 {
                    0 => Phase::Presentation,
                    1 => Phase::Rebuttal,
                    _ => Phase::Closing,
                };
                prop_assert_eq!(s.phase, expected);
                prop_assert_eq!(s.current_set as usize, steps / 3 + 1);
            }
        }
    }
}
