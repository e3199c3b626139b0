// src/stats/mod.rs
// =============================================================================
// This module turns raw API payloads into the per-contributor summary.
//
// Submodules:
// - aggregate: ContributorRecord and the fold operations
// - filter: Drops comments older than the --period cutoff
//
// Nothing in here does I/O. Every function takes its inputs and returns a
// result, which keeps the counting logic easy to test on its own.
// =============================================================================

mod aggregate;
mod filter;

pub use aggregate::{fold_commit_stats, fold_comments, ContributorMap, ContributorRecord};
pub use filter::filter_since;
