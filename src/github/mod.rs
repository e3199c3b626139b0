// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to the GitHub REST API.
//
// Submodules, leaves first:
// - resource: Parses "owner/name" into a RepoId
// - link:     Decodes pagination Link headers
// - fetch:    One HTTP GET with a timeout, classified into a RequestOutcome
// - retry:    Retries a quota/timeout failure exactly once
// - paginate: Follows "next" links across all pages of a comment listing
// - types:    Serde structs for the JSON payloads
// - error:    Fatal failures (FetchError)
//
// Rust concepts:
// - Modules: Organizing related functionality
// - pub use: Re-export so callers can write `github::Target`
// =============================================================================

mod error;
mod fetch;
mod link;
mod paginate;
mod resource;
mod retry;
mod types;

#[cfg(test)]
pub mod scripted;
#[cfg(test)]
pub mod test_server;

pub use error::FetchError;
pub use fetch::{Fetcher, HttpFetcher, Target};
pub use paginate::walk_comments;
pub use resource::RepoId;
pub use retry::execute_json;
pub use types::{Comment, ContributorStat, RateLimitResponse};

#[cfg(test)]
pub use types::Account;
