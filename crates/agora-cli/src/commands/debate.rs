//! Debate command - run a debate against the AI opponent

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use agora_adversarial::ErrorInjectionPlanner;
use agora_core::{AdvanceOutcome, DebateConfig, Difficulty, Opener, Stance, DEFAULT_SETS};
use agora_llm::MockProvider;
use agora_runtime::{DebateEngine, EngineConfig, TurnReport, TurnWarning};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use rand::rngs::StdRng;

use super::{print_analysis, print_header};
use crate::{print_error, print_info, print_success, print_warning};

#[derive(Args)]
pub struct DebateArgs {
    /// Debate topic
    #[arg(short, long)]
    topic: String,

    /// basic, intermediate, advanced or expert
    #[arg(short, long, default_value = "basic")]
    difficulty: Difficulty,

    /// Your position: for or against
    #[arg(short, long, default_value = "for")]
    stance: Stance,

    /// Who opens each set: user or ai
    #[arg(short, long, default_value = "user")]
    opener: Opener,

    /// Number of sets (1-10)
    #[arg(long, default_value_t = DEFAULT_SETS)]
    sets: u32,

    /// JSON array of scripted AI replies; a keyword-driven opponent otherwise
    #[arg(long)]
    responses: Option<PathBuf>,

    /// Read user turns from a file, one per line, instead of stdin
    #[arg(long)]
    turns: Option<PathBuf>,

    /// Seed for error injection
    #[arg(long, env = "AGORA_SEED")]
    seed: Option<u64>,

    /// Override the injection probability (0-100)
    #[arg(long)]
    injection: Option<u8>,

    /// Write the transcript as JSON when the debate ends
    #[arg(long)]
    save: Option<PathBuf>,
}

pub async fn run(args: DebateArgs) -> Result<()> {
    let mut engine_config = EngineConfig::from_env().context("Invalid engine configuration")?;
    if args.seed.is_some() {
        engine_config.seed = args.seed;
    }
    tracing::debug!(seed = ?engine_config.seed, scripted = args.responses.is_some(), "Starting debate");

    let provider = match &args.responses {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let replies: Vec<String> =
                serde_json::from_str(&raw).context("Replies must be a JSON array of strings")?;
            MockProvider::new(replies)
        }
        None => MockProvider::smart(),
    };

    let mut engine = DebateEngine::new(Arc::new(provider), engine_config.clone());
    if let Some(percent) = args.injection {
        let planner = match engine_config.seed {
            Some(seed) => ErrorInjectionPlanner::seeded(seed),
            None => ErrorInjectionPlanner::from_entropy(),
        };
        engine = engine.with_planner(planner.with_probability_override(percent));
    }
    engine.new_session();

    let config = DebateConfig::new(&args.topic, args.difficulty, args.stance, args.opener)
        .with_sets(args.sets);

    print_header(&format!("🎤 {}", args.topic));
    let opening = engine.configure_debate(config).await?;
    println!("{} {}", "AI:".magenta().bold(), opening);
    print_progress(&engine);
    print_info("Commands: /advance /retry /analyze /progress /quit");

    let scripted = match &args.turns {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };
    let mut scripted_lines = scripted.as_deref().map(|s| s.lines());

    loop {
        let line = match scripted_lines.as_mut() {
            Some(lines) => match lines.next() {
                Some(line) => {
                    println!("{} {}", "You:".green().bold(), line);
                    line.to_string()
                }
                None => break,
            },
            None => match prompt_line()? {
                Some(line) => line,
                None => break,
            },
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => break,
            "/progress" => print_progress(&engine),
            "/analyze" => match engine.request_analysis() {
                Ok(analysis) => print_analysis(&analysis),
                Err(e) => print_warning(&e.to_string()),
            },
            "/advance" => match engine.advance_phase()? {
                Some(outcome) => print_outcome(outcome, &engine),
                None => print_info("No debate is configured"),
            },
            "/retry" => match engine.retry_pending_turn().await {
                Ok(report) => {
                    if show_report(&report) {
                        break;
                    }
                }
                Err(e) => print_error(&e.to_string()),
            },
            text => match engine.submit_user_turn(text).await {
                Ok(report) => {
                    if show_report(&report) {
                        break;
                    }
                }
                Err(e) if e.is_retryable() => {
                    print_error(&format!("{} (type /retry to try again)", e));
                }
                Err(e) => print_error(&e.to_string()),
            },
        }
    }

    if let Some(path) = &args.save {
        let transcript = engine.transcript()?;
        let json = serde_json::to_string_pretty(&transcript)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        print_success(&format!("Transcript saved to {}", path.display()));
    }

    match engine.request_analysis() {
        Ok(analysis) => print_analysis(&analysis),
        Err(e) => print_info(&format!("No analysis: {}", e)),
    }

    Ok(())
}

fn prompt_line() -> Result<Option<String>> {
    print!("{} ", "You:".green().bold());
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    Ok((read > 0).then_some(line))
}

/// Print one exchange; true once the debate has finished
fn show_report(report: &TurnReport) -> bool {
    for warning in &report.warnings {
        match warning {
            TurnWarning::OutOfTurn { .. } => println!("{}", warning.to_string().dimmed()),
            _ => println!("{}", warning.to_string().yellow()),
        }
    }
    println!("{} {}", "AI:".magenta().bold(), report.reply);
    if let Some(progress) = &report.progress {
        println!("{}", progress.dimmed());
    }
    report.outcome == Some(AdvanceOutcome::Finished)
}

fn print_outcome(outcome: AdvanceOutcome, engine: &DebateEngine<MockProvider, StdRng>) {
    match outcome {
        AdvanceOutcome::Finished => print_success("Debate finished"),
        AdvanceOutcome::SetCompleted => print_success("Set completed"),
        AdvanceOutcome::Continuing => {}
    }
    print_progress(engine);
}

fn print_progress(engine: &DebateEngine<MockProvider, StdRng>) {
    if let Some(progress) = engine.progress() {
        println!("{}", progress.dimmed());
    }
}
