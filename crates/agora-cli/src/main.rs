//! Agora CLI - practice structured debates against an AI opponent
//!
//! # Usage
//!
//! ```bash
//! # Debate interactively (offline, scripted opponent)
//! agora debate --topic "School uniforms" --difficulty advanced --stance for
//!
//! # Score a saved transcript
//! agora analyze --transcript debate.json
//!
//! # Inspect the fallacy catalog and source policy
//! agora catalog --check-url https://en.wikipedia.org/wiki/Debate
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::{analyze, catalog, debate};

/// Agora - debate practice with planted reasoning errors
#[derive(Parser)]
#[command(
    name = "agora",
    version,
    about = "Agora CLI - Structured debate practice",
    long_about = "Agora runs turn-based debates against an AI opponent.\n\n\
                  The opponent occasionally commits deliberate reasoning errors;\n\
                  the final analysis scores how many of them you caught."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive debate
    #[command(name = "debate")]
    Debate(debate::DebateArgs),

    /// Score a saved transcript
    #[command(name = "analyze")]
    Analyze(analyze::AnalyzeArgs),

    /// Show the fallacy catalog and source policy
    #[command(name = "catalog")]
    Catalog(catalog::CatalogArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Debate(args) => debate::run(args).await,
        Commands::Analyze(args) => analyze::run(args),
        Commands::Catalog(args) => catalog::run(args),
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Print a success message with a checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message with an X
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}
