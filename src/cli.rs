// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Besides the Cli struct, this file validates --period. A bad period is a
// startup error: it is rejected before any network call is made.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// - Result: parse_period() returns Err for malformed input
// =============================================================================

use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeDelta, Utc};
use clap::Parser;

use std::time::Duration;

use crate::config::{ClientConfig, DEFAULT_API_BASE, DEFAULT_RETRY_MS, DEFAULT_TIMEOUT_MS};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "collab-tally",
    version,
    about = "Counts commits and comments per contributor of a GitHub repository",
    long_about = "collab-tally fetches contributor statistics and every commit, pull request and \
                  issue comment of a GitHub repository, then lists contributors by number of comments. \
                  It waits out GitHub's rate limit and retries timed out requests once."
)]
pub struct Cli {
    /// Repository to inspect, e.g. rust-lang/rust
    ///
    /// A full URL like https://github.com/rust-lang/rust works too
    #[arg(long)]
    pub repo: String,

    /// Only count comments from the last N days, written as "<N>d" (e.g. 30d)
    #[arg(long)]
    pub period: Option<String>,

    /// GitHub personal access token
    ///
    /// Falls back to GITHUB_TOKEN when GITHUB_PERSONAL_ACCESS_TOKEN is unset.
    /// Both may also come from a .env file in the current directory.
    #[arg(long, env = "GITHUB_PERSONAL_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Give up on a request after this many milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Wait this many milliseconds before retrying a timed out request
    #[arg(long, default_value_t = DEFAULT_RETRY_MS)]
    pub retry_ms: u64,

    /// Output results in JSON format instead of a list
    #[arg(long)]
    pub json: bool,

    /// Print debug logs to stderr (same as RUST_LOG=collab_tally=debug)
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    // Collects the HTTP settings; the token is resolved by the caller
    // because it has an extra environment fallback
    pub fn client_config(&self, token: Option<String>) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base.clone(),
            token,
            timeout: Duration::from_millis(self.timeout_ms),
            retry_delay: Duration::from_millis(self.retry_ms),
        }
    }
}

/// A validated --period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub days: u32,
    /// Comments created before this instant are ignored
    pub cutoff: DateTime<Utc>,
}

// Parses "<N>d" into a Period ending at `now`
//
// Example:
//   parse_period("30d", now) -> Period { days: 30, cutoff: now - 30 days }
//   parse_period("xd", now)  -> Err
pub fn parse_period(period: &str, now: DateTime<Utc>) -> Result<Period> {
    let invalid = || anyhow!("Option '--period' must be in the form '<# days>d'");

    let days = period
        .trim()
        .strip_suffix('d')
        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .and_then(|digits| digits.parse::<u32>().ok())
        .ok_or_else(invalid)?;

    let cutoff = TimeDelta::try_days(i64::from(days))
        .and_then(|delta| now.checked_sub_signed(delta))
        .ok_or_else(invalid)?;

    Ok(Period { days, cutoff })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `env = "..."` do on an argument?
//    - If the flag is not given, clap reads the environment variable instead
//    - hide_env_values keeps the token out of --help output
//
// 2. Why Option<String> for --period?
//    - The flag is optional; None means "count every comment"
//
// 3. Why checked_sub_signed instead of `now - delta`?
//    - A huge number of days would overflow the date range
//    - The checked version returns None instead of panicking
// -----------------------------------------------------------------------------
