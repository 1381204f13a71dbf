use std::sync::Arc;

use agora_adversarial::ErrorInjectionPlanner;
use agora_core::{
    AdvanceOutcome, Author, DebateConfig, DebateError, Difficulty, Opener, Phase, Stance,
};
use agora_llm::MockProvider;
use agora_runtime::{DebateEngine, EngineConfig, TurnWarning, GREETING};
use rand::rngs::StdRng;

const DIRECTIVE_MARKER: &str = "[SPECIAL TEACHING INSTRUCTION";

fn engine_with(
    llm: Arc<MockProvider>,
    injection_percent: u8,
) -> DebateEngine<MockProvider, StdRng> {
    let mut engine = DebateEngine::new(llm, EngineConfig::default())
        .with_planner(ErrorInjectionPlanner::seeded(9).with_probability_override(injection_percent));
    engine.new_session();
    engine
}

fn config(difficulty: Difficulty, opener: Opener, sets: u32) -> DebateConfig {
    DebateConfig::new("School uniforms", difficulty, Stance::For, opener).with_sets(sets)
}

#[tokio::test]
async fn test_operations_need_a_session() {
    let llm = Arc::new(MockProvider::constant("ok"));
    let mut engine = DebateEngine::new(llm, EngineConfig::default());

    assert!(matches!(
        engine.submit_user_turn("hello").await,
        Err(DebateError::NoActiveSession)
    ));
    assert!(matches!(
        engine.request_analysis(),
        Err(DebateError::NoActiveSession)
    ));
    assert_eq!(engine.whose_turn(), Author::User);
}

#[tokio::test]
async fn test_single_set_runs_to_finish() {
    let llm = Arc::new(MockProvider::constant("I disagree."));
    let mut engine = engine_with(llm.clone(), 0);

    let welcome = engine
        .configure_debate(config(Difficulty::Basic, Opener::User, 1))
        .await
        .unwrap();
    assert!(welcome.starts_with("Debate configured: School uniforms"));
    assert_eq!(engine.progress().unwrap(), "Set 1/1 - Presentation - Your turn");

    let first = engine.submit_user_turn("Uniforms build equality.").await.unwrap();
    assert_eq!(first.outcome, Some(AdvanceOutcome::Continuing));
    assert_eq!(first.progress.as_deref(), Some("Set 1/1 - Rebuttal - AI's turn"));

    let second = engine.submit_user_turn("They also save money.").await.unwrap();
    assert_eq!(second.outcome, Some(AdvanceOutcome::Continuing));

    let third = engine.submit_user_turn("I rest my case.").await.unwrap();
    assert_eq!(third.outcome, Some(AdvanceOutcome::Finished));
    assert_eq!(engine.progress().unwrap(), "Finished");

    // Frozen once finished
    assert_eq!(engine.advance_phase().unwrap(), Some(AdvanceOutcome::Finished));
    assert_eq!(llm.call_count(), 3);
}

#[tokio::test]
async fn test_out_of_turn_is_advisory() {
    let llm = Arc::new(MockProvider::constant("Opening statement."));
    let mut engine = engine_with(llm, 0);

    engine
        .configure_debate(config(Difficulty::Basic, Opener::Ai, 2))
        .await
        .unwrap();
    assert_eq!(engine.whose_turn(), Author::Ai);

    let report = engine.submit_user_turn("Let me answer anyway.").await.unwrap();
    assert!(report.warnings.contains(&TurnWarning::OutOfTurn {
        phase: Phase::Presentation,
        expected: Author::Ai,
    }));
    assert_eq!(report.reply, "Opening statement.");
    assert_eq!(
        report.warnings[0].to_string(),
        "ℹ️ Presentation phase: the AI leads this phase, your message is taken as a reply."
    );
}

#[tokio::test]
async fn test_ai_opening_falls_back_without_advancing() {
    let llm = Arc::new(MockProvider::failing());
    let mut engine = engine_with(llm, 0);
    let cfg = config(Difficulty::Intermediate, Opener::Ai, 2);

    let opening = engine.configure_debate(cfg.clone()).await.unwrap();
    assert_eq!(opening, cfg.opening_line());

    let session = engine.current_session().unwrap();
    assert_eq!(session.log.len(), 1);
    assert_eq!(session.debate.as_ref().unwrap().state.phase, Phase::Presentation);
}

#[tokio::test]
async fn test_opening_prompt_has_no_history() {
    let llm = Arc::new(MockProvider::constant("Opening."));
    let mut engine = engine_with(llm.clone(), 0);
    engine
        .configure_debate(config(Difficulty::Basic, Opener::Ai, 1))
        .await
        .unwrap();

    let request = &llm.requests()[0];
    assert!(request.history.is_empty());
    assert!(request
        .prompt
        .contains("As the opener, present your opening on: School uniforms"));
}

#[tokio::test]
async fn test_full_injection_and_detection() {
    let llm = Arc::new(MockProvider::constant("Every school that tried uniforms failed."));
    let mut engine = engine_with(llm.clone(), 100);
    engine
        .configure_debate(config(Difficulty::Basic, Opener::User, 1))
        .await
        .unwrap();

    engine.submit_user_turn("Uniforms build equality.").await.unwrap();
    engine
        .submit_user_turn("That is a fallacy, where is the evidence?")
        .await
        .unwrap();
    engine.submit_user_turn("I rest my case.").await.unwrap();

    let requests = llm.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.prompt.contains(DIRECTIVE_MARKER)));
    assert_eq!(requests[0].history.len(), 1);
    assert!(!requests[0].history[0].is_user);

    let analysis = engine.request_analysis().unwrap();
    assert_eq!(analysis.injected_errors.len(), 3);
    assert_eq!(analysis.injected_errors[0].challenged, Some(true));
    assert_eq!(analysis.injected_errors[1].challenged, Some(false));
    assert_eq!(analysis.injected_errors[2].challenged, Some(false));
    assert!((analysis.detection_rate - 100.0 / 3.0).abs() < 1e-9);

    // Analysis reads only
    assert_eq!(engine.request_analysis().unwrap(), analysis);
}

#[tokio::test]
async fn test_zero_probability_never_injects() {
    let llm = Arc::new(MockProvider::constant("Fine."));
    let mut engine = engine_with(llm.clone(), 0);
    engine
        .configure_debate(config(Difficulty::Basic, Opener::User, 2))
        .await
        .unwrap();

    for i in 0..6 {
        engine.submit_user_turn(&format!("Point {}", i)).await.unwrap();
    }

    assert!(llm.requests().iter().all(|r| !r.prompt.contains(DIRECTIVE_MARKER)));
    assert!(engine.request_analysis().unwrap().injected_errors.is_empty());
}

#[tokio::test]
async fn test_model_failure_keeps_user_turn_and_retries() {
    let llm = Arc::new(MockProvider::constant("Reply.").failing_next(1));
    let mut engine = engine_with(llm.clone(), 100);
    engine
        .configure_debate(config(Difficulty::Basic, Opener::User, 1))
        .await
        .unwrap();

    let err = engine.submit_user_turn("Uniforms help.").await.unwrap_err();
    assert!(err.is_retryable());

    let session = engine.current_session().unwrap();
    assert!(session.has_pending_user_turn());
    let debate = session.debate.as_ref().unwrap();
    assert_eq!(debate.state.phase, Phase::Presentation);
    assert!(debate.injected_errors.is_empty());

    let report = engine.retry_pending_turn().await.unwrap();
    assert_eq!(report.reply, "Reply.");
    assert_eq!(report.outcome, Some(AdvanceOutcome::Continuing));

    // The retried request carries the same history
    let requests = llm.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].history, requests[1].history);

    assert!(matches!(
        engine.retry_pending_turn().await,
        Err(DebateError::NothingToRetry)
    ));
}

#[tokio::test]
async fn test_history_truncated_to_limit() {
    let llm = Arc::new(MockProvider::constant("ok"));
    let mut engine = engine_with(llm.clone(), 0);

    for i in 0..30 {
        engine.submit_user_turn(&format!("message {}", i)).await.unwrap();
    }

    let last = llm.requests().pop().unwrap();
    // 1 greeting + 29 exchanges precede the last user turn
    assert_eq!(last.history.len(), 50);
    assert_eq!(last.history[49].text, "ok");
    assert_eq!(last.prompt, "message 29");
}

#[tokio::test]
async fn test_source_warnings_at_expert_level() {
    let llm = Arc::new(MockProvider::constant(
        "Per https://facebook.com/groups/uniforms most parents agree.",
    ));
    let mut engine = engine_with(llm, 0);
    engine
        .configure_debate(config(Difficulty::Expert, Opener::User, 1))
        .await
        .unwrap();

    let report = engine
        .submit_user_turn("See https://en.wikipedia.org/wiki/School_uniform")
        .await
        .unwrap();

    let authors: Vec<Author> = report
        .warnings
        .iter()
        .filter_map(|w| match w {
            TurnWarning::BlacklistedSources { author, .. } => Some(*author),
            _ => None,
        })
        .collect();
    assert_eq!(authors, vec![Author::User, Author::Ai]);

    let long = "Uniforms remove visible markers of income and so reduce the social pressure that \
                pupils from poorer families feel every single day at school.";
    let report = engine.submit_user_turn(long).await.unwrap();
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, TurnWarning::CitationTip { .. })));
}

#[tokio::test]
async fn test_no_source_screening_at_basic_level() {
    let llm = Arc::new(MockProvider::constant("ok"));
    let mut engine = engine_with(llm, 0);
    engine
        .configure_debate(config(Difficulty::Basic, Opener::User, 1))
        .await
        .unwrap();

    let report = engine
        .submit_user_turn("See https://en.wikipedia.org/wiki/School_uniform")
        .await
        .unwrap();
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn test_session_lifecycle() {
    let llm = Arc::new(MockProvider::constant("ok"));
    let mut engine = DebateEngine::new(llm, EngineConfig::default());

    let first = engine.new_session();
    let second = engine.new_session();
    assert_eq!(engine.sessions().len(), 2);
    assert_eq!(engine.sessions()[0].title, "New conversation 2");
    assert_eq!(engine.current_session().unwrap().id, second);

    engine.submit_user_turn("Is homework worth it for young children?").await.unwrap();
    assert_eq!(
        engine.current_session().unwrap().title,
        "Is homework worth it for young..."
    );

    engine.delete_session(second).unwrap();
    assert_eq!(engine.current_session().unwrap().id, first);

    engine.delete_session(first).unwrap();
    assert_eq!(engine.sessions().len(), 1);
    let fresh = engine.current_session().unwrap();
    assert_eq!(fresh.log.turns()[0].text, GREETING);

    let unknown = uuid::Uuid::new_v4();
    assert!(matches!(
        engine.select_session(unknown),
        Err(DebateError::SessionNotFound(id)) if id == unknown
    ));
}

#[tokio::test]
async fn test_configure_replaces_log_and_clear_drops_debate() {
    let llm = Arc::new(MockProvider::constant("ok"));
    let mut engine = engine_with(llm, 0);
    engine.submit_user_turn("free chat").await.unwrap();

    engine
        .configure_debate(config(Difficulty::Advanced, Opener::User, 3))
        .await
        .unwrap();
    let session = engine.current_session().unwrap();
    assert_eq!(session.title, "School uniforms");
    assert_eq!(session.log.len(), 1);

    assert!(matches!(
        engine.request_analysis(),
        Err(DebateError::EmptyTurnLog)
    ));

    engine.clear_current().unwrap();
    assert!(engine.progress().is_none());
    assert_eq!(engine.advance_phase().unwrap(), None);
}

#[tokio::test]
async fn test_invalid_config_rejected() {
    let llm = Arc::new(MockProvider::constant("ok"));
    let mut engine = engine_with(llm, 0);
    let result = engine
        .configure_debate(config(Difficulty::Basic, Opener::User, 11))
        .await;
    assert!(matches!(result, Err(DebateError::InvalidConfig(_))));
    assert!(engine.progress().is_none());
}
