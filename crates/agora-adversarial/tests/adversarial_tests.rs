use agora_adversarial::{
    resolve_challenges, ErrorInjectionPlanner, FallacyCatalog, PromptComposer, SourcePolicy,
};
use agora_core::{DebateConfig, Difficulty, ErrorKind, InjectedError, Opener, Stance, Turn, TurnLog};

const SPANISH_CATALOG: &str = r#"{
    "taxonomy_name": "Falacias",
    "version": "1.0",
    "falacias_list": [
        {
            "code": "GEN_APRESURADA",
            "name": "Generalización Apresurada",
            "type": "induccion",
            "description": "Conclusión general a partir de pocos casos",
            "keywords_detection": ["siempre"]
        },
        {
            "code": "AD_HOMINEM",
            "name": "Ad Hominem",
            "type": "relevancia",
            "description": "Ataque a la persona",
            "keywords_detection": ["ignorante"]
        }
    ]
}"#;

#[test]
fn test_spanish_catalog_single_finding() {
    let catalog = FallacyCatalog::from_json_str(SPANISH_CATALOG).unwrap();
    let hits = catalog.detect("Siempre pasa lo mismo");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].code, "GEN_APRESURADA");
    assert_eq!(catalog.get("GEN_APRESURADA").unwrap().name, "Generalización Apresurada");
}

#[test]
fn test_malformed_catalog_is_an_error() {
    assert!(FallacyCatalog::from_json_str("{ not json").is_err());
    assert!(FallacyCatalog::from_json_str(r#"{"version": "1"}"#).is_err());
}

#[test]
fn test_wikipedia_blacklisted_not_trusted() {
    let policy = SourcePolicy::from_json_str(
        r#"{
            "trustedRepositories": [{"name": "Gov", "urls": ["*.gov/*"]}],
            "blacklistUrls": [{"url": "wikipedia.org/*", "reason": "Open editing"}]
        }"#,
    )
    .unwrap();

    let result = policy.validate("As https://wikipedia.org/wiki/X shows");
    assert!(result.has_blacklisted_sources);
    assert!(!result.has_trusted_sources);
    assert_eq!(policy.blacklist_reason(&result.blacklisted_urls[0]), Some("Open editing"));
}

#[test]
fn test_planner_extremes_over_many_turns() {
    let config = DebateConfig::new("Space travel", Difficulty::Expert, Stance::Against, Opener::Ai);

    let mut always = ErrorInjectionPlanner::seeded(3).with_probability_override(100);
    let mut never = ErrorInjectionPlanner::seeded(3).with_probability_override(0);

    assert!((0..50).all(|_| always.plan(&config).is_some()));
    assert!((0..50).all(|_| never.plan(&config).is_none()));
}

#[test]
fn test_basic_rate_is_roughly_thirty_percent() {
    let config = DebateConfig::new("Space travel", Difficulty::Basic, Stance::For, Opener::User);
    let mut planner = ErrorInjectionPlanner::seeded(11);

    let hits = (0..2000).filter(|_| planner.plan(&config).is_some()).count();
    assert!((450..=750).contains(&hits), "hits = {hits}");
}

#[test]
fn test_planted_error_then_challenge() {
    let config = DebateConfig::new("Homework bans", Difficulty::Basic, Stance::For, Opener::User);
    let composer = PromptComposer::new();
    let mut planner = ErrorInjectionPlanner::seeded(5).with_probability_override(100);

    let directive = planner.plan(&config).unwrap();
    let prompt = composer.with_directive(&composer.turn_prompt(&config, "Homework is useless"), &directive);
    assert!(prompt.contains(directive.kind.label()));

    let mut log = TurnLog::new();
    log.push(Turn::user("Homework is useless"));
    let ai_index = log.push(Turn::ai("Every study ever shows homework always fails."));
    log.push(Turn::user("That is a generalization without evidence."));

    let errors = vec![
        InjectedError::new(directive.kind, "Every study ever", ai_index),
        InjectedError::new(ErrorKind::PostHoc, "never challenged", 5),
    ];
    let resolved = resolve_challenges(&errors, &log);

    assert!(resolved[0].was_challenged());
    assert_eq!(resolved[1].challenged, Some(false));
}
