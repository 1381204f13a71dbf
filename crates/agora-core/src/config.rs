//! Debate configuration
//!
//! A [`DebateConfig`] is created once per debate and never mutated. Everything
//! the engine needs to know about difficulty and stance is derived from it.

use serde::{Deserialize, Serialize};

use crate::error::DebateError;

/// Smallest number of sets a debate can have
pub const MIN_SETS: u32 = 1;
/// Largest number of sets a debate can have
pub const MAX_SETS: u32 = 10;
/// Sets used when the caller does not choose
pub const DEFAULT_SETS: u32 = 2;

/// Difficulty level of the AI opponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// All levels, easiest first
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Basic,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Basic => "Basic",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        }
    }

    /// Percent chance (0-100) that an AI turn carries a planted error
    pub fn injection_probability(&self) -> u8 {
        match self {
            Difficulty::Basic => 30,
            Difficulty::Intermediate => 20,
            Difficulty::Advanced => 10,
            Difficulty::Expert => 5,
        }
    }

    /// Whether citations in turns are screened against the source policy
    pub fn requires_source_validation(&self) -> bool {
        matches!(self, Difficulty::Advanced | Difficulty::Expert)
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = DebateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Difficulty::Basic),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            other => Err(DebateError::InvalidConfig(format!(
                "unknown difficulty '{}'",
                other
            ))),
        }
    }
}

/// A side in the debate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    For,
    Against,
    Neutral,
}

impl Stance {
    /// The stance the other party takes
    pub fn opposite(&self) -> Stance {
        match self {
            Stance::For => Stance::Against,
            Stance::Against => Stance::For,
            Stance::Neutral => Stance::Neutral,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Stance::For => "For",
            Stance::Against => "Against",
            Stance::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Stance {
    type Err = DebateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "for" => Ok(Stance::For),
            "against" => Ok(Stance::Against),
            "neutral" => Ok(Stance::Neutral),
            other => Err(DebateError::InvalidConfig(format!(
                "unknown stance '{}'",
                other
            ))),
        }
    }
}

/// Who speaks first in each set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opener {
    User,
    Ai,
}

impl std::str::FromStr for Opener {
    type Err = DebateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Opener::User),
            "ai" => Ok(Opener::Ai),
            other => Err(DebateError::InvalidConfig(format!(
                "unknown opener '{}'",
                other
            ))),
        }
    }
}

/// Immutable configuration of one debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateConfig {
    /// What is being debated
    pub topic: String,
    /// AI opponent difficulty
    pub difficulty: Difficulty,
    /// The human's stance
    pub user_stance: Stance,
    /// Who opens each set
    pub opener: Opener,
    /// Number of Presentation/Rebuttal/Closing cycles
    #[serde(default = "default_sets")]
    pub number_of_sets: u32,
}

fn default_sets() -> u32 {
    DEFAULT_SETS
}

impl DebateConfig {
    /// Create a config with the default number of sets
    pub fn new(topic: &str, difficulty: Difficulty, user_stance: Stance, opener: Opener) -> Self {
        Self {
            topic: topic.to_string(),
            difficulty,
            user_stance,
            opener,
            number_of_sets: DEFAULT_SETS,
        }
    }

    /// Override the number of sets
    pub fn with_sets(mut self, sets: u32) -> Self {
        self.number_of_sets = sets;
        self
    }

    /// Check the config is usable for a debate
    pub fn validate(&self) -> Result<(), DebateError> {
        if self.topic.trim().is_empty() {
            return Err(DebateError::InvalidConfig("topic must not be empty".into()));
        }
        if !(MIN_SETS..=MAX_SETS).contains(&self.number_of_sets) {
            return Err(DebateError::InvalidConfig(format!(
                "number of sets must be between {} and {}, got {}",
                MIN_SETS, MAX_SETS, self.number_of_sets
            )));
        }
        Ok(())
    }

    /// The stance the AI defends
    pub fn ai_stance(&self) -> Stance {
        self.user_stance.opposite()
    }

    /// Whether turns must be screened for citations
    pub fn requires_source_validation(&self) -> bool {
        self.difficulty.requires_source_validation()
    }

    /// Percent chance that an AI turn carries a planted error
    pub fn injection_probability(&self) -> u8 {
        self.difficulty.injection_probability()
    }

    /// Canned opening used when the AI opens and the model is unavailable
    pub fn opening_line(&self) -> String {
        match self.ai_stance() {
            Stance::For => format!(
                "I will argue in favor of: {}. Are you ready to defend the opposing side?",
                self.topic
            ),
            Stance::Against => format!(
                "I will argue against: {}. Are you ready to defend the side in favor?",
                self.topic
            ),
            Stance::Neutral => format!(
                "Let's examine {} from several perspectives. Start by presenting your point of view.",
                self.topic
            ),
        }
    }

    /// Welcome shown when the user opens
    pub fn welcome_line(&self) -> String {
        format!(
            "Debate configured: {}\nYour stance: {}\nAI stance: {}\n\nStart your argument!",
            self.topic,
            self.user_stance,
            self.ai_stance()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(stance: Stance) -> DebateConfig {
        DebateConfig::new("School uniforms", Difficulty::Basic, stance, Opener::User)
    }

    #[test]
    fn test_ai_takes_opposite_stance() {
        assert_eq!(config(Stance::For).ai_stance(), Stance::Against);
        assert_eq!(config(Stance::Against).ai_stance(), Stance::For);
        assert_eq!(config(Stance::Neutral).ai_stance(), Stance::Neutral);
    }

    #[test]
    fn test_injection_probability_by_level() {
        let probs: Vec<u8> = Difficulty::ALL
            .iter()
            .map(|d| d.injection_probability())
            .collect();
        assert_eq!(probs, vec![30, 20, 10, 5]);
    }

    #[test]
    fn test_source_validation_only_for_advanced_levels() {
        assert!(!Difficulty::Basic.requires_source_validation());
        assert!(!Difficulty::Intermediate.requires_source_validation());
        assert!(Difficulty::Advanced.requires_source_validation());
        assert!(Difficulty::Expert.requires_source_validation());
    }

    #[test]
    fn test_validate_sets_range() {
        assert!(config(Stance::For).validate().is_ok());
        assert!(config(Stance::For).with_sets(0).validate().is_err());
        assert!(config(Stance::For).with_sets(11).validate().is_err());
        assert!(config(Stance::For).with_sets(10).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_topic() {
        let cfg = DebateConfig::new("   ", Difficulty::Expert, Stance::For, Opener::Ai);
        assert!(matches!(cfg.validate(), Err(DebateError::InvalidConfig(_))));
    }

    #[test]
    fn test_opening_line_follows_ai_stance() {
        assert!(config(Stance::For).opening_line().contains("argue against"));
        assert!(config(Stance::Neutral)
            .opening_line()
            .contains("several perspectives"));
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Expert".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert_eq!("against".parse::<Stance>().unwrap(), Stance::Against);
        assert_eq!("AI".parse::<Opener>().unwrap(), Opener::Ai);
        assert!("sometimes".parse::<Stance>().is_err());
    }

    #[test]
    fn test_missing_sets_defaults_on_deserialize() {
        let cfg: DebateConfig = serde_json::from_str(
            r#"{"topic":"Nuclear power","difficulty":"advanced","user_stance":"for","opener":"ai"}"#,
        )
        .unwrap();
        assert_eq!(cfg.number_of_sets, DEFAULT_SETS);
        assert_eq!(cfg.difficulty, Difficulty::Advanced);
    }
}
