//! Post-debate scoring
//!
//! Turns the human's message statistics, the fallacies found in their turns
//! and their error-detection rate into five 1-10 metrics, an overall score,
//! a list of recommendations and a narrative report. Every number here is
//! deterministic so the same transcript always scores the same.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::config::DebateConfig;
use crate::fallacy::FallacyFinding;
use crate::flaw::{ErrorKind, InjectedError};
use crate::transcript::preview;

/// Participation is full at this many user turns
const FULL_PARTICIPATION_TURNS: f64 = 6.0;
/// Source use is not derived from citations yet
const NEUTRAL_SOURCE_USE: f64 = 6.0;
/// Characters per depth point
const DEPTH_CHARS_PER_POINT: f64 = 50.0;
/// Fewer user turns than this triggers the participation nudge
const LOW_PARTICIPATION_TURNS: usize = 4;
/// Quoted AI text in the report is cut to this many characters
const QUOTE_CHARS: usize = 100;

/// Final assessment of a debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateAnalysis {
    /// Overall score (1-10)
    pub overall: f64,
    /// Participation (1-10)
    pub responsiveness: f64,
    /// Use of sources (1-10)
    pub source_use: f64,
    /// Argument quality (1-10)
    pub argument_quality: f64,
    /// Logical coherence (1-10)
    pub coherence: f64,
    /// Depth (1-10)
    pub depth: f64,
    /// Percent of planted errors the human challenged
    pub detection_rate: f64,
    /// Fallacies found in user turns
    pub fallacies: Vec<FallacyFinding>,
    /// Planted errors with their challenge status resolved
    pub injected_errors: Vec<InjectedError>,
    /// Ordered advice lines
    pub recommendations: Vec<String>,
    /// Narrative report
    pub feedback: String,
}

/// What the scorer consumes
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    /// Human turns, oldest first
    pub user_turns: &'a [&'a str],
    /// Planted errors, already resolved
    pub injected_errors: &'a [InjectedError],
    /// Fallacy findings across all user turns
    pub fallacies: &'a [FallacyFinding],
    /// Debate config, if one was active
    pub config: Option<&'a DebateConfig>,
}

/// Error detection tallies
#[derive(Debug, Clone, Copy, PartialEq)]
struct Detection {
    caught: usize,
    missed: usize,
    total: usize,
    /// 0-100, or 100 when nothing was planted
    rate: f64,
}

impl Detection {
    fn from_errors(errors: &[InjectedError]) -> Self {
        let caught = errors.iter().filter(|e| e.was_challenged()).count();
        let total = errors.len();
        let rate = if total > 0 {
            caught as f64 / total as f64 * 100.0
        } else {
            100.0
        };
        Self {
            caught,
            missed: total - caught,
            total,
            rate,
        }
    }
}

/// Deterministic scorer for finished debates
#[derive(Debug, Clone, Copy, Default)]
pub struct DebateScorer;

impl DebateScorer {
    /// Score a debate
    pub fn score(&self, input: &ScoringInput<'_>) -> DebateAnalysis {
        let turn_count = input.user_turns.len();
        let avg_len = average_chars(input.user_turns);
        let detection = Detection::from_errors(input.injected_errors);

        let responsiveness =
            (turn_count as f64 / FULL_PARTICIPATION_TURNS * 10.0).clamp(1.0, 10.0);
        let source_use = NEUTRAL_SOURCE_USE;
        let argument_quality = argument_quality(avg_len);
        let coherence = coherence(input.fallacies.len());
        let depth = (avg_len / DEPTH_CHARS_PER_POINT).clamp(1.0, 10.0);
        let detection_bonus = (detection.rate / 10.0).min(10.0);

        let overall = ((responsiveness + argument_quality + coherence + depth + detection_bonus)
            / 5.0)
            .clamp(1.0, 10.0);

        let recommendations =
            recommendations(input.injected_errors, &detection, input.fallacies, avg_len, turn_count);
        let feedback = feedback(
            input.config,
            turn_count,
            input.fallacies.len(),
            input.injected_errors,
            &detection,
        );

        tracing::debug!(
            overall,
            turns = turn_count,
            fallacies = input.fallacies.len(),
            detection_rate = detection.rate,
            "Debate scored"
        );

        DebateAnalysis {
            overall,
            responsiveness,
            source_use,
            argument_quality,
            coherence,
            depth,
            detection_rate: detection.rate,
            fallacies: input.fallacies.to_vec(),
            injected_errors: input.injected_errors.to_vec(),
            recommendations,
            feedback,
        }
    }
}

fn average_chars(turns: &[&str]) -> f64 {
    if turns.is_empty() {
        return 0.0;
    }
    let total: usize = turns.iter().map(|t| t.chars().count()).sum();
    total as f64 / turns.len() as f64
}

fn argument_quality(avg_len: f64) -> f64 {
    if avg_len > 300.0 {
        9.0
    } else if avg_len > 150.0 {
        7.5
    } else if avg_len > 80.0 {
        6.0
    } else {
        4.0
    }
}

fn coherence(fallacy_count: usize) -> f64 {
    match fallacy_count {
        0 => 9.5,
        1 => 7.5,
        2..=3 => 6.0,
        _ => 4.0,
    }
}

/// Name of the most frequent fallacy; ties go to the one seen first
fn most_frequent_fallacy(fallacies: &[FallacyFinding]) -> Option<&str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for finding in fallacies {
        match counts.iter_mut().find(|(name, _)| *name == finding.name) {
            Some((_, count)) => *count += 1,
            None => counts.push((finding.name.as_str(), 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (name, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name)
}

fn recommendations(
    errors: &[InjectedError],
    detection: &Detection,
    fallacies: &[FallacyFinding],
    avg_len: f64,
    turn_count: usize,
) -> Vec<String> {
    let mut out = Vec::new();
    let pct = detection.rate as i64;

    if detection.total > 0 {
        if detection.rate >= 80.0 {
            out.push(format!(
                "🌟 Excellent! You caught {} of the AI's {} errors ({}%)",
                detection.caught, detection.total, pct
            ));
        } else if detection.rate >= 50.0 {
            out.push(format!(
                "👍 You caught {} of {} errors, but missed {} opportunities",
                detection.caught, detection.total, detection.missed
            ));
        } else {
            out.push(format!(
                "⚠️ You only caught {} of {} errors. Work on your critical listening",
                detection.caught, detection.total
            ));
        }
    }

    if detection.missed > 0 {
        out.push(format!(
            "⚠️ You missed {} chance(s) to challenge weak AI arguments",
            detection.missed
        ));
        let mut seen: Vec<ErrorKind> = Vec::new();
        for err in errors.iter().filter(|e| !e.was_challenged()) {
            if !seen.contains(&err.kind) {
                seen.push(err.kind);
                out.push(err.kind.missed_tip().to_string());
            }
        }
    }

    if detection.caught > 0 {
        out.push(format!(
            "✅ Well done! You caught {} deliberate AI error(s)",
            detection.caught
        ));
    }

    match most_frequent_fallacy(fallacies) {
        Some(name) => out.push(format!(
            "⚠️ You committed {} fallacy(ies). Most common: {}",
            fallacies.len(),
            name
        )),
        None => out.push("✅ Excellent logic, no fallacies detected".to_string()),
    }

    if avg_len < 80.0 {
        out.push(format!(
            "📝 Develop your arguments further. Current average: {} characters",
            avg_len as i64
        ));
    } else if avg_len > 500.0 {
        out.push("✂️ Arguments are very long. Practice being concise".to_string());
    } else {
        out.push(format!(
            "👍 Good argument length ({} characters)",
            avg_len as i64
        ));
    }

    if turn_count < LOW_PARTICIPATION_TURNS {
        out.push(format!(
            "📢 Participate more actively. You only sent {} message(s)",
            turn_count
        ));
    }

    out
}

fn feedback(
    config: Option<&DebateConfig>,
    turn_count: usize,
    fallacy_count: usize,
    errors: &[InjectedError],
    detection: &Detection,
) -> String {
    let topic = config.map(|c| c.topic.as_str()).unwrap_or("N/A");
    let level = config.map(|c| c.difficulty.label()).unwrap_or("N/A");
    let stance = config.map(|c| c.user_stance.label()).unwrap_or("N/A");
    let probability = config.map(|c| c.injection_probability()).unwrap_or(0);
    // The report shows 0% when nothing was planted, unlike the scoring rate
    let pct = if detection.total > 0 {
        detection.rate as i64
    } else {
        0
    };

    let mut s = String::new();
    // Writing to a String cannot fail
    let _ = write_feedback(
        &mut s,
        topic,
        level,
        stance,
        probability,
        pct,
        turn_count,
        fallacy_count,
        errors,
        detection,
    );
    s
}

#[allow(clippy::too_many_arguments)]
fn write_feedback(
    s: &mut String,
    topic: &str,
    level: &str,
    stance: &str,
    probability: u8,
    pct: i64,
    turn_count: usize,
    fallacy_count: usize,
    errors: &[InjectedError],
    detection: &Detection,
) -> std::fmt::Result {
    writeln!(s, "📊 FULL DEBATE ANALYSIS")?;
    writeln!(s)?;
    writeln!(s, "Topic: \"{}\"", topic)?;
    writeln!(s, "Level: {}", level)?;
    writeln!(s, "Your stance: {}", stance)?;
    writeln!(s, "Messages sent: {}", turn_count)?;
    writeln!(s)?;

    writeln!(s, "🎯 CRITICAL THINKING (Spotting the AI's Errors)")?;
    if detection.total > 0 {
        writeln!(
            s,
            "The AI made {} deliberate error(s) to train your critical analysis:",
            detection.total
        )?;
        writeln!(s)?;
        writeln!(s, "✅ Caught: {} ({}%)", detection.caught, pct)?;
        writeln!(s, "❌ Missed: {}", detection.missed)?;
        writeln!(s)?;

        if pct >= 80 {
            writeln!(s, "🌟 EXCELLENT! Your critical analysis is outstanding.")?;
            writeln!(s, "You caught most of the errors I made on purpose.")?;
        } else if pct >= 50 {
            writeln!(s, "👍 GOOD. You are on the right track, but there is room to improve.")?;
            writeln!(s, "Review the errors you let through to learn to spot them.")?;
        } else {
            writeln!(s, "💪 MORE PRACTICE NEEDED. Most errors went unnoticed.")?;
            writeln!(s, "Listen actively and question every claim the AI makes.")?;
        }
        writeln!(s)?;

        if detection.missed > 0 {
            writeln!(s, "⚠️ OPPORTUNITIES YOU MISSED:")?;
            for err in errors.iter().filter(|e| !e.was_challenged()) {
                writeln!(s, "• {}", err.kind)?;
                writeln!(s, "  \"{}\"", preview(&err.text, QUOTE_CHARS))?;
                writeln!(s)?;
            }
        }

        if detection.caught > 0 {
            writeln!(s, "✅ ERRORS YOU CAUGHT:")?;
            for err in errors.iter().filter(|e| e.was_challenged()) {
                writeln!(s, "• {}", err.kind)?;
            }
            writeln!(s)?;
        }
    } else {
        writeln!(s, "There were no deliberate errors in this debate.")?;
        writeln!(s)?;
    }

    writeln!(s, "🔍 YOUR ARGUMENTATIVE LOGIC")?;
    if fallacy_count > 0 {
        writeln!(
            s,
            "⚠️ I found {} possible fallacy(ies) in your arguments.",
            fallacy_count
        )?;
        writeln!(s, "This weakens your position. Review the fallacies section.")?;
    } else {
        writeln!(s, "✅ I found no logical fallacies in your arguments. Excellent!")?;
    }
    writeln!(s)?;

    writeln!(s, "💡 FINAL RECOMMENDATION")?;
    writeln!(s, "Critical thinking is sharpened through constant practice.")?;
    writeln!(s, "Every debate is a chance to improve your analytical skills.")?;
    writeln!(s)?;
    writeln!(s, "At {} level, I made roughly", level)?;
    writeln!(s, "{}% deliberate errors.", probability)?;
    writeln!(s, "Your goal: spot them ALL and challenge them with evidence.")?;
    writeln!(s)?;
    writeln!(s, "Keep practicing! 💪")?;
    Ok(())
}
