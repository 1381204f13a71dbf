//! Post-debate analysis

use agora_adversarial::{resolve_challenges, FallacyCatalog};
use agora_core::{DebateAnalysis, DebateError, DebateScorer, ScoringInput, Transcript};
use tracing::info;

/// Score a debate transcript
///
/// Planted errors are resolved against the full turn log and fallacies are
/// detected in the user turns before scoring. Reads only, so the same
/// transcript always yields the same analysis.
pub fn analyze_transcript(
    transcript: &Transcript,
    catalog: &FallacyCatalog,
) -> Result<DebateAnalysis, DebateError> {
    // Free chat has no debate turns to score.
    let Some(config) = transcript.config.as_ref() else {
        return Err(DebateError::EmptyTurnLog);
    };

    let user_texts = transcript.user_texts();
    if user_texts.is_empty() {
        return Err(DebateError::EmptyTurnLog);
    }

    let injected_errors = resolve_challenges(&transcript.injected_errors, &transcript.turns);
    let fallacies = catalog.findings(&user_texts);

    let analysis = DebateScorer.score(&ScoringInput {
        user_turns: &user_texts,
        injected_errors: &injected_errors,
        fallacies: &fallacies,
        config: Some(config),
    });

    metrics::counter!("agora_analyses_total").increment(1);
    info!(
        topic = %config.topic,
        user_turns = user_texts.len(),
        fallacies = fallacies.len(),
        planted = injected_errors.len(),
        overall = analysis.overall,
        "Debate analyzed"
    );

    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_adversarial::Fallacy;
    use agora_core::{DebateConfig, Difficulty, ErrorKind, InjectedError, Opener, Stance, Turn};

    fn catalog() -> FallacyCatalog {
        FallacyCatalog::new(vec![Fallacy {
            code: "HG".into(),
            name: "Hasty Generalization".into(),
            kind: "induction".into(),
            description: "Too broad".into(),
            keywords_detection: vec!["always".into()],
        }])
    }

    fn transcript() -> Transcript {
        let mut t = Transcript {
            config: Some(DebateConfig::new(
                "Tuition-free college",
                Difficulty::Basic,
                Stance::For,
                Opener::User,
            )),
            ..Default::default()
        };
        t.turns.push(Turn::ai("Welcome"));
        t.turns.push(Turn::user("Education always pays off for society."));
        let ai = t.turns.push(Turn::ai("90% of graduates regret it."));
        t.turns.push(Turn::user("What is the source for that figure?"));
        t.injected_errors
            .push(InjectedError::new(ErrorKind::UnsourcedStatistic, "90% of graduates", ai));
        t
    }

    #[test]
    fn test_resolves_errors_and_finds_fallacies() {
        let analysis = analyze_transcript(&transcript(), &catalog()).unwrap();
        assert_eq!(analysis.fallacies.len(), 1);
        assert_eq!(analysis.fallacies[0].code, "HG");
        assert_eq!(analysis.injected_errors[0].challenged, Some(true));
        assert_eq!(analysis.detection_rate, 100.0);
    }

    #[test]
    fn test_idempotent() {
        let t = transcript();
        let first = analyze_transcript(&t, &catalog()).unwrap();
        let second = analyze_transcript(&t, &catalog()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_user_turns() {
        let mut t = transcript();
        t.turns = vec![Turn::ai("Welcome")].into();
        assert!(matches!(
            analyze_transcript(&t, &catalog()),
            Err(DebateError::EmptyTurnLog)
        ));
    }

    #[test]
    fn test_out_of_range_error_index_from_json() {
        let mut value = serde_json::to_value(transcript()).unwrap();
        value["injected_errors"][0]["turn_index"] = serde_json::json!(u64::MAX);
        let t: Transcript = serde_json::from_value(value).unwrap();

        let analysis = analyze_transcript(&t, &catalog()).unwrap();
        assert_eq!(analysis.injected_errors[0].challenged, Some(false));
        assert_eq!(analysis.detection_rate, 0.0);
    }

    #[test]
    fn test_free_chat_not_scored() {
        let mut t = transcript();
        t.config = None;
        assert!(matches!(
            analyze_transcript(&t, &catalog()),
            Err(DebateError::EmptyTurnLog)
        ));
    }
}
