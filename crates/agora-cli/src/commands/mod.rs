//! CLI command implementations

pub mod analyze;
pub mod catalog;
pub mod debate;

use std::path::Path;

use agora_adversarial::{FallacyCatalog, SourcePolicy};
use agora_core::DebateAnalysis;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

/// Fallacy catalog from `path`, empty when the file is unusable
pub fn load_catalog(path: Option<&Path>) -> FallacyCatalog {
    match path {
        Some(path) => FallacyCatalog::load_or_empty(path),
        None => FallacyCatalog::builtin(),
    }
}

/// Source policy from `path`, the built-in one when the file is unusable
pub fn load_policy(path: Option<&Path>) -> SourcePolicy {
    match path {
        Some(path) => SourcePolicy::load_or_default(path),
        None => SourcePolicy::builtin(),
    }
}

/// Section header in the CLI's house style
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "═".repeat(50).cyan());
}

fn score_cell(score: f64) -> Cell {
    let color = if score >= 7.0 {
        Color::Green
    } else if score >= 5.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{:.1}", score)).fg(color)
}

/// Render a finished analysis
pub fn print_analysis(analysis: &DebateAnalysis) {
    print_header("📊 Debate Analysis");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Metric").fg(Color::Cyan),
            Cell::new("Score /10").fg(Color::Cyan),
        ]);
    for (name, score) in [
        ("Overall", analysis.overall),
        ("Responsiveness", analysis.responsiveness),
        ("Source use", analysis.source_use),
        ("Argument quality", analysis.argument_quality),
        ("Coherence", analysis.coherence),
        ("Depth", analysis.depth),
    ] {
        table.add_row(vec![Cell::new(name), score_cell(score)]);
    }
    println!("{table}");

    if !analysis.injected_errors.is_empty() {
        let caught = analysis
            .injected_errors
            .iter()
            .filter(|e| e.was_challenged())
            .count();
        println!(
            "\n{} {}/{} planted errors caught ({:.0}%)",
            "Detection:".bold(),
            caught,
            analysis.injected_errors.len(),
            analysis.detection_rate
        );
        for error in &analysis.injected_errors {
            let mark = if error.was_challenged() {
                "✓".green()
            } else {
                "✗".red()
            };
            println!("  {} {} (turn {})", mark, error.kind, error.turn_index);
        }
    }

    if !analysis.fallacies.is_empty() {
        println!("\n{}", "Fallacies in your arguments:".bold());
        for finding in &analysis.fallacies {
            println!("  {} {}: {}", "•".yellow(), finding.name.bold(), finding.fragment.dimmed());
            println!("    {}", finding.explanation);
        }
    }

    if !analysis.recommendations.is_empty() {
        println!("\n{}", "Recommendations:".bold());
        for rec in &analysis.recommendations {
            println!("  {}", rec);
        }
    }

    println!("\n{}", analysis.feedback);
}
