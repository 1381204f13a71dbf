//! Debate engine - sessions, turns and analysis
//!
//! The engine owns every session and is the only writer of their logs. All
//! mutating operations take `&mut self`, so turns are serialized by the
//! borrow checker. A model call is the only suspension point: state changes
//! for an exchange are applied after it resolves, and nothing is applied when
//! it fails.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use agora_adversarial::{
    ErrorInjectionPlanner, FallacyCatalog, InjectionDirective, PromptComposer, SourcePolicy,
};
use agora_core::{
    AdvanceOutcome, Author, DebateAnalysis, DebateConfig, DebateError, Difficulty, InjectedError,
    Opener, Phase, Transcript, Turn,
};
use agora_llm::{GenerationConfig, HistoryEntry, LlmProvider, LlmRequest};

use crate::analysis::analyze_transcript;
use crate::config::EngineConfig;
use crate::session::{ActiveDebate, ChatSession};

/// User turns longer than this without any URL earn a citation tip
const CITATION_TIP_MIN_CHARS: usize = 100;

/// A cited URL that the source policy rejects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedSource {
    pub url: String,
    pub reason: Option<String>,
}

/// Advisory notes about a turn; never part of the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnWarning {
    /// The user spoke in a phase the AI leads; the turn is still answered
    OutOfTurn { phase: Phase, expected: Author },
    /// Blacklisted sources were cited
    BlacklistedSources {
        author: Author,
        sources: Vec<FlaggedSource>,
    },
    /// A long argument with no citation at a level that expects them
    CitationTip { difficulty: Difficulty, guide: String },
}

impl fmt::Display for TurnWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnWarning::OutOfTurn { phase, expected } => {
                let who = if expected.is_user() { "you lead" } else { "the AI leads" };
                write!(
                    f,
                    "ℹ️ {} phase: {} this phase, your message is taken as a reply.",
                    phase, who
                )
            }
            TurnWarning::BlacklistedSources { author, sources } => {
                let subject = if author.is_user() {
                    "You cited"
                } else {
                    "The AI cited"
                };
                writeln!(f, "⚠️ WARNING: {} non-academic sources:", subject)?;
                for source in sources {
                    match &source.reason {
                        Some(reason) => writeln!(f, "• {} ({})", source.url, reason)?,
                        None => writeln!(f, "• {}", source.url)?,
                    }
                }
                write!(f, "These sources are not reliable for an academic debate.")
            }
            TurnWarning::CitationTip { difficulty, guide } => write!(
                f,
                "💡 TIP: At {} level, consider backing your arguments with academic sources.\n{}",
                difficulty, guide
            ),
        }
    }
}

/// What one exchange produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// The AI reply appended to the log
    pub reply: String,
    /// Advisory warnings for the caller to show
    pub warnings: Vec<TurnWarning>,
    /// Phase transition, when a debate is running
    pub outcome: Option<AdvanceOutcome>,
    /// Progress line after the exchange
    pub progress: Option<String>,
}

/// Everything needed to call the model for one AI turn
struct PendingExchange {
    session_id: Uuid,
    user_index: usize,
    request: LlmRequest,
    directive: Option<InjectionDirective>,
    config: Option<DebateConfig>,
}

/// Runs debates between a human and a model
pub struct DebateEngine<L: LlmProvider, R: Rng = StdRng> {
    llm: Arc<L>,
    generation: GenerationConfig,
    catalog: FallacyCatalog,
    sources: SourcePolicy,
    composer: PromptComposer,
    planner: ErrorInjectionPlanner<R>,
    /// Most recent first
    sessions: Vec<ChatSession>,
    current: Option<Uuid>,
}

impl<L: LlmProvider> DebateEngine<L, StdRng> {
    /// Create an engine, loading resources named in `config`
    pub fn new(llm: Arc<L>, config: EngineConfig) -> Self {
        let catalog = match &config.fallacy_catalog {
            Some(path) => FallacyCatalog::load_or_empty(path),
            None => FallacyCatalog::builtin(),
        };
        let sources = match &config.source_policy {
            Some(path) => SourcePolicy::load_or_default(path),
            None => SourcePolicy::builtin(),
        };
        let planner = match config.seed {
            Some(seed) => ErrorInjectionPlanner::seeded(seed),
            None => ErrorInjectionPlanner::from_entropy(),
        };

        info!(
            provider = llm.name(),
            fallacies = catalog.len(),
            seeded = config.seed.is_some(),
            "Debate engine ready"
        );

        Self {
            llm,
            generation: config.generation,
            catalog,
            sources,
            composer: PromptComposer::new(),
            planner,
            sessions: Vec::new(),
            current: None,
        }
    }
}

impl<L: LlmProvider, R: Rng> DebateEngine<L, R> {
    /// Swap the error injection planner
    pub fn with_planner<R2: Rng>(self, planner: ErrorInjectionPlanner<R2>) -> DebateEngine<L, R2> {
        DebateEngine {
            llm: self.llm,
            generation: self.generation,
            catalog: self.catalog,
            sources: self.sources,
            composer: self.composer,
            planner,
            sessions: self.sessions,
            current: self.current,
        }
    }

    /// Swap the fallacy catalog
    pub fn with_catalog(mut self, catalog: FallacyCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Swap the source policy
    pub fn with_source_policy(mut self, sources: SourcePolicy) -> Self {
        self.sources = sources;
        self
    }

    pub fn catalog(&self) -> &FallacyCatalog {
        &self.catalog
    }

    pub fn source_policy(&self) -> &SourcePolicy {
        &self.sources
    }

    // ---- sessions ----

    /// Start a fresh session and make it current
    pub fn new_session(&mut self) -> Uuid {
        let session = ChatSession::new(&format!("New conversation {}", self.sessions.len() + 1));
        let id = session.id;
        self.sessions.insert(0, session);
        self.current = Some(id);
        debug!(session = %id, "Session created");
        id
    }

    /// Make `id` the current session
    pub fn select_session(&mut self, id: Uuid) -> Result<(), DebateError> {
        if !self.sessions.iter().any(|s| s.id == id) {
            return Err(DebateError::SessionNotFound(id));
        }
        self.current = Some(id);
        Ok(())
    }

    /// Remove a session; removing the current one selects another
    pub fn delete_session(&mut self, id: Uuid) -> Result<(), DebateError> {
        let position = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or(DebateError::SessionNotFound(id))?;
        self.sessions.remove(position);
        debug!(session = %id, "Session deleted");

        if self.current == Some(id) {
            match self.sessions.first().map(|s| s.id) {
                Some(next) => self.current = Some(next),
                None => {
                    self.new_session();
                }
            }
        }
        Ok(())
    }

    /// All sessions, most recent first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// The selected session
    pub fn current_session(&self) -> Option<&ChatSession> {
        let id = self.current?;
        self.sessions.iter().find(|s| s.id == id)
    }

    fn session(&self) -> Result<&ChatSession, DebateError> {
        self.current_session().ok_or(DebateError::NoActiveSession)
    }

    fn session_mut(&mut self) -> Result<&mut ChatSession, DebateError> {
        let id = self.current.ok_or(DebateError::NoActiveSession)?;
        self.session_by_id(id)
    }

    fn session_by_id(&mut self, id: Uuid) -> Result<&mut ChatSession, DebateError> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(DebateError::SessionNotFound(id))
    }

    /// Empty the current session and drop its debate
    pub fn clear_current(&mut self) -> Result<(), DebateError> {
        self.session_mut()?.clear();
        Ok(())
    }

    // ---- debate ----

    /// Configure a debate on the current session, replacing its log
    ///
    /// Returns the first AI message: a model-written opening when the AI
    /// opens (or the canned opening if the model fails), else a welcome.
    pub async fn configure_debate(&mut self, config: DebateConfig) -> Result<String, DebateError> {
        config.validate()?;
        let session = self.session_mut()?;
        let session_id = session.id;

        session.log.clear();
        session.title = config.topic.clone();
        session.debate = Some(ActiveDebate::new(config.clone()));

        info!(
            session = %session_id,
            topic = %config.topic,
            difficulty = %config.difficulty,
            sets = config.number_of_sets,
            injection_probability = config.injection_probability(),
            "Debate configured"
        );

        let opening = match config.opener {
            Opener::User => config.welcome_line(),
            Opener::Ai => {
                let prompt = self.composer.opening_prompt(&config);
                let request = LlmRequest::with_history(&prompt, Vec::new(), self.generation.clone());
                match self.llm.complete(request).await {
                    Ok(response) => {
                        metrics::counter!("agora_ai_turns_total").increment(1);
                        response.content
                    }
                    Err(e) => {
                        metrics::counter!("agora_model_failures_total").increment(1);
                        warn!(error = %e, "Opening request failed, using canned opening");
                        config.opening_line()
                    }
                }
            }
        };

        self.session_by_id(session_id)?.push(Turn::ai(&opening));
        Ok(opening)
    }

    /// Record a user turn and get the AI's reply
    ///
    /// On model failure the user turn stays in the log and the debate does
    /// not advance; call [`retry_pending_turn`](Self::retry_pending_turn).
    pub async fn submit_user_turn(&mut self, text: &str) -> Result<TurnReport, DebateError> {
        let session = self.session_mut()?;
        let mut warnings = Vec::new();

        if let Some(debate) = &session.debate {
            if !debate.state.finished && debate.state.whose_turn() == Author::Ai {
                warnings.push(TurnWarning::OutOfTurn {
                    phase: debate.state.phase,
                    expected: Author::Ai,
                });
            }
        }

        let user_index = session.push(Turn::user(text));
        session.maybe_title_from(text);

        let config = session.config().cloned();
        if let Some(config) = config.as_ref().filter(|c| c.requires_source_validation()) {
            warnings.extend(self.screen_user_text(config, text));
        }

        let mut report = self.exchange(user_index).await?;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        Ok(report)
    }

    /// Re-run the exchange for a trailing user turn whose reply failed
    pub async fn retry_pending_turn(&mut self) -> Result<TurnReport, DebateError> {
        let session = self.session()?;
        if !session.has_pending_user_turn() {
            return Err(DebateError::NothingToRetry);
        }
        let user_index = session.log.len() - 1;
        debug!(session = %session.id, user_index, "Retrying pending turn");
        self.exchange(user_index).await
    }

    fn screen_user_text(&self, config: &DebateConfig, text: &str) -> Vec<TurnWarning> {
        let mut warnings = Vec::new();
        let validation = self.sources.validate(text);

        if validation.has_blacklisted_sources {
            warnings.push(self.blacklist_warning(Author::User, &validation.blacklisted_urls));
        }
        if text.chars().count() > CITATION_TIP_MIN_CHARS && validation.found_urls.is_empty() {
            warnings.push(TurnWarning::CitationTip {
                difficulty: config.difficulty,
                guide: self.sources.citation_guide(),
            });
        }
        warnings
    }

    fn blacklist_warning(&self, author: Author, urls: &[String]) -> TurnWarning {
        TurnWarning::BlacklistedSources {
            author,
            sources: urls
                .iter()
                .map(|url| FlaggedSource {
                    url: url.clone(),
                    reason: self.sources.blacklist_reason(url).map(str::to_string),
                })
                .collect(),
        }
    }

    fn prepare_exchange(&mut self, user_index: usize) -> Result<PendingExchange, DebateError> {
        let session = self.session()?;
        let session_id = session.id;
        let turns = session.log.turns();
        let user_text = turns
            .get(user_index)
            .map(|t| t.text.clone())
            .ok_or(DebateError::NothingToRetry)?;

        let history: Vec<HistoryEntry> = turns[..user_index]
            .iter()
            .map(|t| HistoryEntry::new(&t.text, t.author.is_user()))
            .collect();

        let config = session.config().cloned();
        let (prompt, directive) = match &config {
            Some(config) => {
                let base = self.composer.turn_prompt(config, &user_text);
                match self.planner.plan(config) {
                    Some(directive) => (self.composer.with_directive(&base, &directive), Some(directive)),
                    None => (base, None),
                }
            }
            None => (user_text, None),
        };

        Ok(PendingExchange {
            session_id,
            user_index,
            request: LlmRequest::with_history(&prompt, history, self.generation.clone()),
            directive,
            config,
        })
    }

    async fn exchange(&mut self, user_index: usize) -> Result<TurnReport, DebateError> {
        let pending = self.prepare_exchange(user_index)?;
        debug!(
            session = %pending.session_id,
            user_index = pending.user_index,
            history = pending.request.history.len(),
            injected = pending.directive.is_some(),
            "Requesting AI turn"
        );

        let response = match self.llm.complete(pending.request).await {
            Ok(response) => response,
            Err(e) => {
                metrics::counter!("agora_model_failures_total").increment(1);
                warn!(session = %pending.session_id, error = %e, "Model completion failed");
                return Err(DebateError::ModelCompletion(e.to_string()));
            }
        };
        metrics::counter!("agora_ai_turns_total").increment(1);

        let reply = response.content;
        let ai_warnings = match &pending.config {
            Some(config) if config.requires_source_validation() => {
                let validation = self.sources.validate(&reply);
                if validation.has_blacklisted_sources {
                    vec![self.blacklist_warning(Author::Ai, &validation.blacklisted_urls)]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        };

        let session = self.session_by_id(pending.session_id)?;
        let ai_index = session.push(Turn::ai(&reply));

        let mut outcome = None;
        if let Some(debate) = session.debate.as_mut() {
            if let Some(directive) = &pending.directive {
                debate
                    .injected_errors
                    .push(InjectedError::new(directive.kind, &reply, ai_index));
                metrics::counter!("agora_injected_errors_total", "kind" => directive.kind.label())
                    .increment(1);
                info!(kind = %directive.kind, turn = ai_index, "Planted error recorded");
            }
            outcome = Some(debate.state.advance());
        }

        Ok(TurnReport {
            reply,
            warnings: ai_warnings,
            outcome,
            progress: session.progress(),
        })
    }

    /// Advance the current debate by one phase; `None` outside a debate
    pub fn advance_phase(&mut self) -> Result<Option<AdvanceOutcome>, DebateError> {
        let session = self.session_mut()?;
        Ok(session.debate.as_mut().map(|d| d.state.advance()))
    }

    /// Who should speak next; the user whenever no debate is running
    pub fn whose_turn(&self) -> Author {
        self.current_session()
            .map(|s| s.whose_turn())
            .unwrap_or(Author::User)
    }

    /// Progress line of the current debate
    pub fn progress(&self) -> Option<String> {
        self.current_session().and_then(|s| s.progress())
    }

    /// Snapshot of the current session
    pub fn transcript(&self) -> Result<Transcript, DebateError> {
        Ok(self.session()?.transcript())
    }

    /// Score the current debate
    pub fn request_analysis(&self) -> Result<DebateAnalysis, DebateError> {
        let transcript = self.transcript()?;
        analyze_transcript(&transcript, &self.catalog)
    }
}

impl<L: LlmProvider, R: Rng> fmt::Debug for DebateEngine<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebateEngine")
            .field("provider", &self.llm.name())
            .field("sessions", &self.sessions.len())
            .field("current", &self.current)
            .finish()
    }
}
