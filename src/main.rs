// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Load .env, parse command-line arguments using clap
// 2. Validate --repo and --period (before any network call)
// 3. Build the HTTP fetcher and the progress bar
// 4. Run the pipeline (see run.rs) and print the summary
// 5. Exit with proper code (0 = success, 2 = error)
//
// Rust concepts used:
// - async/await: Requests and retry sleeps are awaited, never blocking a thread
// - Result<T, E>: For error handling (T = success type, E = error type)
// - anyhow::Context: Adds a human readable line on top of an error
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - HTTP client settings
mod github; // src/github/ - GitHub API access
mod output; // src/output.rs - sorting and printing the summary
mod progress; // src/progress.rs - progress bar
mod run; // src/run.rs - the request pipeline
mod stats; // src/stats/ - counting per contributor

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser; // Parser trait enables the parse() method
use colored::Colorize;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::{parse_period, Cli};
use github::{HttpFetcher, RepoId};
use progress::TerminalProgress;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("{}", format!("Error: {:#}", e).red());
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(e) = dotenv_problem(dotenv) {
        warn!(error = %e, "could not load .env file");
    }

    // Validate everything that can fail before touching the network
    let repo = RepoId::parse(&cli.repo)?;
    let period = cli
        .period
        .as_deref()
        .map(|raw| parse_period(raw, Utc::now()))
        .transpose()?;

    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .filter(|token| !token.trim().is_empty());
    if token.is_none() {
        warn!("no GitHub token configured, using the unauthenticated rate limit");
    }

    let config = cli.client_config(token);
    let fetcher = HttpFetcher::new(&config)?;

    let days = period
        .map(|p| p.days.to_string())
        .unwrap_or_else(|| "*".to_string());
    eprintln!("  Fetching comments for past {} days for \"{}\"...\n", days, repo);

    let progress = TerminalProgress::new(run::initial_units());
    let result =
        run::collect_activity(&fetcher, &repo, period.map(|p| p.cutoff), &progress).await;

    // Stop the bar on both paths before printing anything else
    let contributors = match result {
        Ok(contributors) => {
            progress.finish();
            contributors
        }
        Err(e) => {
            progress.abandon();
            return Err(e).with_context(|| format!("Failed to collect activity for {}", repo));
        }
    };

    if cli.json {
        println!("{}", output::render_json(&contributors)?);
    } else if !contributors.is_empty() {
        println!("{}", output::render_text(&contributors));
    }

    Ok(())
}

// A missing .env file is fine; anything else (e.g. a malformed line) is
// worth a warning
fn dotenv_problem(result: dotenvy::Result<PathBuf>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e),
    }
}

// Sends tracing events to stderr
//
// RUST_LOG wins when set; otherwise warnings only, or debug with --verbose.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "collab_tally=debug"
    } else {
        "collab_tally=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
