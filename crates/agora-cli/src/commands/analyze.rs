//! Analyze command - score a saved debate transcript

use std::path::PathBuf;

use agora_core::Transcript;
use agora_runtime::analyze_transcript;
use anyhow::{Context, Result};
use clap::Args;

use super::{load_catalog, print_analysis};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Transcript JSON written by `agora debate --save`
    #[arg(short, long)]
    transcript: PathBuf,

    /// Fallacy catalog JSON; the built-in catalog otherwise
    #[arg(long, env = "AGORA_FALLACY_CATALOG")]
    catalog: Option<PathBuf>,

    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.transcript)
        .with_context(|| format!("Failed to read {}", args.transcript.display()))?;
    let transcript: Transcript = serde_json::from_str(&raw).context("Invalid transcript JSON")?;

    let catalog = load_catalog(args.catalog.as_deref());

    let analysis = analyze_transcript(&transcript, &catalog)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis);
    }

    Ok(())
}
