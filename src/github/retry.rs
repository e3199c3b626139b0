// src/github/retry.rs
// =============================================================================
// The retry orchestrator: turns one logical request into at most two
// physical requests.
//
// Algorithm:
// 1. Fetch.
// 2. Success -> done. Fatal -> fail immediately, never retried.
// 3. QuotaExceeded or TimedOut on the first attempt -> sleep for the delay
//    the outcome carries (quota reset time, or the fixed timeout back-off),
//    then fetch again.
// 4. Any failure on the second attempt -> FetchError::RetryFailed.
//    There is no third attempt.
//
// The sleep is a tokio sleep: it suspends only this logical request.
//
// Rust concepts:
// - loop + match: A small state machine without nested callbacks
// - Trait objects (&dyn Fetcher): The caller decides which fetcher to use
// =============================================================================

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::FetchError;
use super::fetch::{Fetcher, Page, RequestOutcome, Target};
use crate::progress::Progress;

/// Original attempt plus one retry
pub const MAX_ATTEMPTS: u32 = 2;

// Runs one logical request to completion
//
// Returns: the successful Page, or the fatal cause
pub async fn execute(
    fetcher: &dyn Fetcher,
    target: &Target,
    progress: &dyn Progress,
) -> Result<Page, FetchError> {
    let mut attempt = 1;

    loop {
        let outcome = fetcher.fetch(target).await;
        debug!(%target, attempt, outcome = outcome.kind(), "request finished");

        if attempt >= MAX_ATTEMPTS {
            return match outcome {
                RequestOutcome::Success(page) => Ok(page),
                RequestOutcome::Fatal(cause) => Err(FetchError::RetryFailed {
                    target: target.to_string(),
                    reason: cause.to_string(),
                }),
                other => Err(FetchError::RetryFailed {
                    target: target.to_string(),
                    reason: other.kind().to_string(),
                }),
            };
        }

        let delay = match outcome {
            RequestOutcome::Success(page) => return Ok(page),
            RequestOutcome::Fatal(cause) => return Err(cause),
            RequestOutcome::QuotaExceeded {
                rate_remaining,
                reset_delay,
            } => {
                progress.rate_limit(rate_remaining);
                progress.step(&format!(
                    "Rate Limit Exceeded! Retrying in {} ms",
                    reset_delay.as_millis()
                ));
                reset_delay
            }
            RequestOutcome::TimedOut { retry_delay } => {
                progress.step(&format!(
                    "Request Timed Out! Retrying in {} ms",
                    retry_delay.as_millis()
                ));
                retry_delay
            }
        };

        warn!(%target, delay_ms = delay.as_millis() as u64, "retrying request");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

// Same as execute(), then decodes the body as JSON
//
// Returns: (payload, x-ratelimit-remaining)
pub async fn execute_json<T: DeserializeOwned>(
    fetcher: &dyn Fetcher,
    target: &Target,
    progress: &dyn Progress,
) -> Result<(T, Option<u32>), FetchError> {
    let page = execute(fetcher, target, progress).await?;
    let payload = page.json(target)?;
    Ok((payload, page.rate_remaining))
}
