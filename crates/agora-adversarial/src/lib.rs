//! # Agora Adversarial
//!
//! The critical-thinking side of a debate:
//!
//! - [`FallacyCatalog`] flags fallacy keywords in the human's turns
//! - [`SourcePolicy`] sorts cited URLs into trusted, blacklisted and unverified
//! - [`ErrorInjectionPlanner`] plants deliberate errors in AI turns and later
//!   decides whether the human caught them
//! - [`PromptComposer`] builds the text sent to the model
//!
//! ## Quick Start
//!
//! ```rust
//! use agora_adversarial::{ErrorInjectionPlanner, PromptComposer, SourcePolicy};
//! use agora_core::{DebateConfig, Difficulty, Opener, Stance};
//!
//! let config = DebateConfig::new("Social media age limits", Difficulty::Expert, Stance::For, Opener::User);
//!
//! let mut planner = ErrorInjectionPlanner::seeded(7).with_probability_override(100);
//! let directive = planner.plan(&config).unwrap();
//!
//! let composer = PromptComposer::new();
//! let prompt = composer.with_directive(&composer.turn_prompt(&config, "Kids need protection."), &directive);
//! assert!(prompt.contains("DO NOT MENTION TO THE USER"));
//!
//! let check = SourcePolicy::builtin().validate("See https://en.wikipedia.org/wiki/Internet");
//! assert!(check.has_blacklisted_sources);
//! ```

pub mod fallacies;
pub mod injection;
pub mod prompt;
pub mod sources;

pub use fallacies::{CatalogError, Fallacy, FallacyCatalog, KeywordHit};
pub use injection::{
    directive_text, is_challenge, resolve_challenges, ErrorInjectionPlanner, InjectionDirective,
    CRITICAL_KEYWORDS,
};
pub use prompt::PromptComposer;
pub use sources::{
    extract_urls, wildcard_to_regex, BlacklistEntry, ContextControl, SourcePolicy,
    SourcePolicyConfig, SourceValidation, TrustedRepository,
};
