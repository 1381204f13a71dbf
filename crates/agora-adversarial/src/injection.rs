//! Error injection: planting deliberate reasoning errors in AI turns
//!
//! Before each AI turn the planner rolls against the difficulty's injection
//! probability. On a hit it picks one of the fixed error kinds and returns a
//! hidden directive phrased for the difficulty: blatant at Basic, subtle at
//! Expert. Whether the human caught an error is decided later, by scanning
//! the human's turns that come after it for critical-thinking keywords.

use agora_core::{DebateConfig, Difficulty, ErrorKind, InjectedError, TurnLog};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Words that show the human pushed back on an argument
pub const CRITICAL_KEYWORDS: [&str; 20] = [
    "fallacy",
    "error",
    "incorrect",
    "not true",
    "contradict",
    "false data",
    "made up",
    "makes no sense",
    "logic",
    "weak argument",
    "generalization",
    "dichotomy",
    "authority",
    "circular",
    "source",
    "evidence",
    "proof",
    "demonstrate",
    "verify",
    "question",
];

/// A hidden instruction to commit one error in the next AI turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionDirective {
    /// The error the model is asked to commit
    pub kind: ErrorKind,
    /// Difficulty-calibrated phrasing of the request
    pub instruction: String,
}

impl InjectionDirective {
    /// Directive for `kind`, phrased for `difficulty`
    pub fn new(kind: ErrorKind, difficulty: Difficulty) -> Self {
        Self {
            kind,
            instruction: directive_text(kind, difficulty).to_string(),
        }
    }
}

/// Decides per AI turn whether to plant an error
///
/// Generic over the random source so tests can seed it.
#[derive(Debug)]
pub struct ErrorInjectionPlanner<R: Rng = StdRng> {
    rng: R,
    probability_override: Option<u8>,
}

impl ErrorInjectionPlanner<StdRng> {
    /// Planner seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Planner with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ErrorInjectionPlanner<R> {
    /// Planner drawing from `rng`
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            probability_override: None,
        }
    }

    /// Ignore the difficulty and inject with this percent chance (clamped to 100)
    pub fn with_probability_override(mut self, percent: u8) -> Self {
        self.probability_override = Some(percent.min(100));
        self
    }

    /// Percent chance used for `config`
    pub fn probability_for(&self, config: &DebateConfig) -> u8 {
        self.probability_override
            .unwrap_or_else(|| config.injection_probability())
    }

    /// Roll for the next AI turn
    pub fn plan(&mut self, config: &DebateConfig) -> Option<InjectionDirective> {
        let probability = self.probability_for(config);
        let roll: u8 = self.rng.random_range(1..=100);
        let inject = roll <= probability;

        debug!(roll, probability, inject, "Error injection roll");

        if !inject {
            return None;
        }

        let kind = ErrorKind::ALL[self.rng.random_range(0..ErrorKind::ALL.len())];
        info!(kind = %kind, difficulty = %config.difficulty, "Planting error in next AI turn");
        Some(InjectionDirective::new(kind, config.difficulty))
    }
}

/// Whether `text` contains any critical-thinking keyword
pub fn is_challenge(text: &str) -> bool {
    let lowered = text.to_lowercase();
    CRITICAL_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Decide for each planted error whether a later user turn challenged it
///
/// Only user turns with a log index strictly greater than the error's
/// `turn_index` count. Earlier turns never resolve an error.
pub fn resolve_challenges(errors: &[InjectedError], log: &TurnLog) -> Vec<InjectedError> {
    let resolved: Vec<InjectedError> = errors
        .iter()
        .map(|error| {
            let challenged = log
                .turns()
                .iter()
                .enumerate()
                .filter(|(i, _)| *i > error.turn_index)
                .any(|(_, turn)| turn.author.is_user() && is_challenge(&turn.text));
            InjectedError {
                challenged: Some(challenged),
                ..error.clone()
            }
        })
        .collect();

    let caught = resolved.iter().filter(|e| e.was_challenged()).count();
    debug!(
        caught,
        missed = resolved.len() - caught,
        "Resolved planted errors"
    );
    resolved
}

/// The fixed directive phrasing for each kind and difficulty
pub fn directive_text(kind: ErrorKind, difficulty: Difficulty) -> &'static str {
    use Difficulty::*;
    use ErrorKind::*;

    match (difficulty, kind) {
        (Basic, HastyGeneralization) => {
            "Commit an obvious hasty generalization: use 'ALWAYS' or 'NEVER' without grounds."
        }
        (Basic, FalseDichotomy) => "Present only two extreme options when more alternatives exist.",
        (Basic, AppealToAuthority) => "Appeal to a non-expert or fictional authority in an evident way.",
        (Basic, UnsourcedStatistic) => "Invent a specific statistic and cite it as true.",
        (Basic, Contradiction) => "Contradict something you said earlier in an evident way.",
        (Basic, CircularArgument) => "Use an obvious circular argument (the conclusion as a premise).",
        (Basic, StrawMan) => "Distort the opponent's argument in an exaggerated way.",
        (Basic, PostHoc) => {
            "Commit an evident post hoc fallacy (this happened after, so it was caused by)."
        }

        (Intermediate, HastyGeneralization) => "Make a generalization from insufficient evidence.",
        (Intermediate, FalseDichotomy) => "Simplify the issue down to two main options.",
        (Intermediate, AppealToAuthority) => {
            "Quote someone famous who is outside their area of expertise."
        }
        (Intermediate, UnsourcedStatistic) => {
            "Mention a percentage or statistic without a clear source."
        }
        (Intermediate, Contradiction) => "Subtly contradict an earlier point.",
        (Intermediate, CircularArgument) => "Use partially circular reasoning.",
        (Intermediate, StrawMan) => "Slightly oversimplify the opponent's argument.",
        (Intermediate, PostHoc) => "Assume causation from correlation without being fully obvious.",

        (Advanced, HastyGeneralization) => "Subtly extrapolate from a limited number of cases.",
        (Advanced, FalseDichotomy) => "Present a subtle dichotomy that ignores nuance.",
        (Advanced, AppealToAuthority) => "Appeal to consensus or authority in a questionable way.",
        (Advanced, UnsourcedStatistic) => "Use a plausible but unverified figure.",
        (Advanced, Contradiction) => "Introduce a minor inconsistency with earlier points.",
        (Advanced, CircularArgument) => "Partially assume what you are trying to prove.",
        (Advanced, StrawMan) => "Focus on the weakest version of the opposing argument.",
        (Advanced, PostHoc) => "Subtly suggest causation where there is only correlation.",

        (Expert, HastyGeneralization) => "Generalize from limited evidence in a very subtle way.",
        (Expert, FalseDichotomy) => "Frame the debate in binary terms in a sophisticated way.",
        (Expert, AppealToAuthority) => {
            "Cite an authority in a way that sounds convincing but is questionable."
        }
        (Expert, UnsourcedStatistic) => {
            "Include a specific figure that sounds credible but is made up."
        }
        (Expert, Contradiction) => "Introduce a very subtle inconsistency with earlier arguments.",
        (Expert, CircularArgument) => "Build an argument whose logic is subtly circular.",
        (Expert, StrawMan) => "Restate the opposing argument with a slight bias.",
        (Expert, PostHoc) => "Imply causation from correlation in a sophisticated way.",
    }
}
