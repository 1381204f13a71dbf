//! Prompt assembly for the AI opponent
//!
//! Pure string building. Nothing here talks to a model.

use agora_core::{DebateConfig, Difficulty, Stance};

use crate::injection::InjectionDirective;

/// Builds the text sent to the model for each turn
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// System instruction describing the debate and the AI's role
    pub fn system_instruction(&self, config: &DebateConfig) -> String {
        let ai_stance = config.ai_stance();
        let stance_description = stance_description(ai_stance);

        let behaviour = if ai_stance == Stance::Neutral {
            "Present both sides in a balanced way".to_string()
        } else {
            format!("Hold your position firmly: {}", stance_description)
        };

        let reminder = if ai_stance == Stance::Neutral {
            "Remember: present an objective analysis without favoring either side.".to_string()
        } else {
            format!(
                "Remember: you must defend your position ({}) consistently throughout the debate.",
                stance_description
            )
        };

        let sources = if config.requires_source_validation() {
            SOURCE_BLOCK
        } else {
            ""
        };

        format!(
            "You are Agora, taking part in a structured debate on: \"{topic}\"\n\
             \n\
             DEBATE SETTINGS:\n\
             - Level: {level}\n\
             - Your position: {stance_description}\n\
             - User's position: {user_stance}\n\
             \n\
             INSTRUCTIONS:\n\
             {verbosity}\n\
             \n\
             Debate behaviour:\n\
             - {behaviour}\n\
             - Present solid, well-structured arguments\n\
             - Rebut the opponent's arguments respectfully\n\
             - Use evidence and logic according to your difficulty level\n\
             - Keep a professional and respectful tone\n\
             - Concise answers (150 words max)\n\
             {sources}\n\
             {reminder}",
            topic = config.topic,
            level = config.difficulty,
            user_stance = config.user_stance,
            verbosity = verbosity(config.difficulty),
        )
    }

    /// Prompt for a regular debate turn
    pub fn turn_prompt(&self, config: &DebateConfig, user_text: &str) -> String {
        format!("{}\n\nUser: {}", self.system_instruction(config), user_text)
    }

    /// Prompt asking the AI to open the debate
    pub fn opening_prompt(&self, config: &DebateConfig) -> String {
        format!(
            "{}\n\nAs the opener, present your opening on: {}\nBe brief (100 words max).",
            self.system_instruction(config),
            config.topic
        )
    }

    /// Append a hidden error directive to `prompt`
    pub fn with_directive(&self, prompt: &str, directive: &InjectionDirective) -> String {
        format!(
            "{}\n\n\
             [SPECIAL TEACHING INSTRUCTION - DO NOT MENTION TO THE USER]:\n\
             {}\n\
             Do it naturally in your reply. The user should be able to spot it if paying attention.\n\
             Error type to commit: {}",
            prompt,
            directive.instruction,
            directive.kind.label()
        )
    }
}

const SOURCE_BLOCK: &str = "
ALLOWED SOURCES (prefer):
• Academic institutions (.edu, universities)
• Government agencies (.gob, .gov)
• International organizations (UN, WHO, ECLAC, etc.)
• Scientific journals (JSTOR, SciELO, Dialnet, etc.)

FORBIDDEN SOURCES (never use):
• Wikipedia
• Social networks (Facebook, Twitter/X, Instagram, TikTok)
• Personal blogs (Medium, Blogspot, WordPress)
• YouTube (except official institutional channels)
• Opinion forums without academic backing

CITATION FORMAT:
If you use a source, mention: [Institution/Author - Year - Short title]
";

fn stance_description(stance: Stance) -> &'static str {
    match stance {
        Stance::For => "Defend the position IN FAVOR of the topic",
        Stance::Against => "Defend the position AGAINST the topic",
        Stance::Neutral => "Analyze both positions objectively without taking a side",
    }
}

fn verbosity(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Basic => "Use simple language and clear arguments. Explain basic concepts.",
        Difficulty::Intermediate => {
            "Use solid arguments with examples. Introduce moderately complex concepts."
        }
        Difficulty::Advanced => {
            "Use sophisticated arguments, specific data and in-depth analysis. IMPORTANT: cite \
             academic sources and check the credibility of your references."
        }
        Difficulty::Expert => {
            "Use academic arguments, scientific evidence, exhaustive analysis and technical \
             terminology. CRITICAL: ALWAYS cite verified academic sources (journals, government \
             institutions, international bodies). NEVER use Wikipedia, social networks, personal \
             blogs or unverified sources."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::{ErrorKind, Opener};

    fn config(difficulty: Difficulty, stance: Stance) -> DebateConfig {
        DebateConfig::new("Nuclear energy", difficulty, stance, Opener::User)
    }

    #[test]
    fn test_instruction_states_ai_stance() {
        let text = PromptComposer::new().system_instruction(&config(Difficulty::Basic, Stance::For));
        assert!(text.contains("\"Nuclear energy\""));
        assert!(text.contains("Defend the position AGAINST the topic"));
        assert!(text.contains("User's position: For"));
        assert!(text.contains("Level: Basic"));
    }

    #[test]
    fn test_source_block_only_for_advanced_levels() {
        let composer = PromptComposer::new();
        for d in Difficulty::ALL {
            let text = composer.system_instruction(&config(d, Stance::Against));
            assert_eq!(
                text.contains("FORBIDDEN SOURCES"),
                d.requires_source_validation(),
                "{d}"
            );
        }
    }

    #[test]
    fn test_neutral_stance_is_balanced() {
        let text =
            PromptComposer::new().system_instruction(&config(Difficulty::Basic, Stance::Neutral));
        assert!(text.contains("Present both sides in a balanced way"));
        assert!(text.contains("objective analysis"));
    }

    #[test]
    fn test_turn_and_opening_prompts() {
        let composer = PromptComposer::new();
        let cfg = config(Difficulty::Intermediate, Stance::For);
        assert!(composer.turn_prompt(&cfg, "It is clean").ends_with("\n\nUser: It is clean"));
        assert!(composer
            .opening_prompt(&cfg)
            .contains("As the opener, present your opening on: Nuclear energy"));
    }

    #[test]
    fn test_directive_block_appended() {
        let directive = InjectionDirective::new(ErrorKind::StrawMan, Difficulty::Basic);
        let prompt = PromptComposer::new().with_directive("base", &directive);
        assert!(prompt.starts_with("base\n\n[SPECIAL TEACHING INSTRUCTION"));
        assert!(prompt.contains(&directive.instruction));
        assert!(prompt.ends_with("Error type to commit: Straw Man"));
    }
}
