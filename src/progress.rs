// src/progress.rs
// =============================================================================
// Progress reporting.
//
// The core (retry orchestrator, page walker, run controller) only talks to
// the Progress trait. main.rs plugs in TerminalProgress, an indicatif bar
// that looks like:
//
//   Get pulls/comments (page 3)... [#######>-----] 58% | ETA: 4s | Remaining Rate Limit: 4873
//
// indicatif hides the bar automatically when stderr is not a terminal.
// =============================================================================

use indicatif::{ProgressBar, ProgressStyle};

/// Receives status updates while a run is in progress.
///
/// Units are cumulative. The total only ever grows.
pub trait Progress: Send + Sync {
    /// Short label describing the current step
    fn step(&self, label: &str);
    /// Marks `units` more units of work as done
    fn advance(&self, units: u64);
    /// Adds `units` to the total amount of work
    fn grow_total(&self, units: u64);
    /// Last seen `x-ratelimit-remaining`
    fn rate_limit(&self, remaining: u32);
}

pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new(total: u64) -> TerminalProgress {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template(
            "{msg}... [{bar:40.cyan/blue}] {percent}% | ETA: {eta} | Remaining Rate Limit: {prefix}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
        bar.set_style(style);
        bar.set_prefix("?");

        TerminalProgress { bar }
    }

    /// Leaves the finished bar on screen
    pub fn finish(&self) {
        self.bar.finish();
    }

    /// Stops drawing without completing the bar (used on failure)
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl Progress for TerminalProgress {
    fn step(&self, label: &str) {
        self.bar.set_message(label.to_string());
    }

    fn advance(&self, units: u64) {
        self.bar.inc(units);
    }

    fn grow_total(&self, units: u64) {
        let total = self.bar.length().unwrap_or(0);
        self.bar.set_length(total + units);
    }

    fn rate_limit(&self, remaining: u32) {
        self.bar.set_prefix(remaining.to_string());
    }
}
