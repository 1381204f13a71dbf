//! Catalog command - inspect fallacies and the source policy

use std::path::PathBuf;

use agora_adversarial::SourcePolicy;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use super::{load_catalog, load_policy, print_header};

#[derive(Args)]
pub struct CatalogArgs {
    /// Fallacy catalog JSON; the built-in catalog otherwise
    #[arg(long, env = "AGORA_FALLACY_CATALOG")]
    fallacies: Option<PathBuf>,

    /// Source policy JSON; the built-in policy otherwise
    #[arg(long, env = "AGORA_SOURCE_POLICY")]
    sources: Option<PathBuf>,

    /// Classify URLs against the source policy
    #[arg(long = "check-url", num_args = 1..)]
    check_urls: Vec<String>,

    /// Also print the citation guide
    #[arg(long)]
    guide: bool,
}

pub fn run(args: CatalogArgs) -> Result<()> {
    let catalog = load_catalog(args.fallacies.as_deref());
    let policy = load_policy(args.sources.as_deref());

    if !args.check_urls.is_empty() {
        check_urls(&policy, &args.check_urls);
        return Ok(());
    }

    print_header(&format!(
        "📚 {} (v{}, {} entries)",
        catalog.taxonomy_name(),
        catalog.version(),
        catalog.len()
    ));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Code").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Type").fg(Color::Cyan),
            Cell::new("Keywords").fg(Color::Cyan),
        ]);
    for fallacy in catalog.entries() {
        table.add_row(vec![
            Cell::new(&fallacy.code).fg(Color::Yellow),
            Cell::new(&fallacy.name),
            Cell::new(&fallacy.kind),
            Cell::new(fallacy.keywords_detection.join(", ")),
        ]);
    }
    println!("{table}");

    if args.guide {
        print_header("🔗 Citation Guide");
        println!("{}", policy.citation_guide());
    }

    Ok(())
}

fn check_urls(policy: &SourcePolicy, urls: &[String]) {
    print_header("🔗 Source Check");
    for url in urls {
        if let Some(reason) = policy.blacklist_reason(url) {
            println!("  {} {} ({})", "✗".red().bold(), url, reason.dimmed());
        } else if policy.is_blacklisted(url) {
            println!("  {} {}", "✗".red().bold(), url);
        } else if policy.is_trusted(url) {
            println!("  {} {} {}", "✓".green().bold(), url, "trusted".green());
        } else {
            println!("  {} {} {}", "?".yellow().bold(), url, "unverified".yellow());
        }
    }
}
