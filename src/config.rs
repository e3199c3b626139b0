// src/config.rs
// =============================================================================
// Settings the HTTP fetcher is built from.
//
// Nothing here is global: main builds one ClientConfig from the CLI
// arguments (which may come from environment variables or a .env file)
// and hands it to HttpFetcher::new().
// =============================================================================

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

// Hard bound on a single HTTP request, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

// How long to wait before retrying a timed out request, in milliseconds
pub const DEFAULT_RETRY_MS: u64 = 1_000;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every relative API path is joined onto
    pub base_url: String,
    /// Personal access token, None for unauthenticated access
    pub token: Option<String>,
    /// Wall-clock bound for one physical request
    pub timeout: Duration,
    /// Back-off before retrying a timed out request
    pub retry_delay: Duration,
}
