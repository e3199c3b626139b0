// src/github/error.rs
// =============================================================================
// Fatal request failures.
//
// Quota exhaustion and timeouts are NOT errors here: they are recoverable
// outcomes handled by the retry orchestrator (see retry.rs). Everything in
// this enum aborts the run.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network level failure (DNS, connection reset, TLS, ...)
    #[error("request to {target} failed: {source}")]
    Transport {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status we do not handle
    #[error("request to {target} returned HTTP {status}")]
    Status { target: String, status: StatusCode },

    /// The body could not be decoded into the expected payload
    #[error("could not decode response from {target}: {source}")]
    Decode {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    /// GitHub answers 202 while contributor statistics are still being computed
    #[error("statistics for {target} are still being computed by GitHub, try again shortly")]
    NotReady { target: String },

    /// The second attempt of a logical request failed as well
    #[error("retry failed for {target}: {reason}")]
    RetryFailed { target: String, reason: String },

    /// The API base URL or a request path could not be turned into a URL
    #[error("invalid request URL {target}: {source}")]
    InvalidUrl {
        target: String,
        #[source]
        source: url::ParseError,
    },
}
