// src/github/fetch.rs
// =============================================================================
// This module issues ONE HTTP GET against the GitHub API and classifies
// what happened.
//
// Every physical request ends up as exactly one RequestOutcome:
// - Success:        2xx with the raw body, quota left and pagination links
// - QuotaExceeded:  403/429 with `x-ratelimit-remaining: 0`; carries how long
//                   to wait until the quota resets (from `x-ratelimit-reset`)
// - TimedOut:       no response within the configured bound; the in-flight
//                   request is dropped (which closes the socket)
// - Fatal:          anything else, never retried
//
// Deciding whether to retry is NOT done here, see retry.rs.
//
// Rust concepts:
// - Enums with data: RequestOutcome carries different fields per variant
// - Traits: Fetcher lets tests swap the real HTTP client for a script
// - tokio::time::timeout: Cancels a future that takes too long
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::error::FetchError;
use super::link::{parse_link_header, LinkSet};
use crate::config::ClientConfig;

/// What to GET: a path relative to the API base, or an absolute URL
/// taken from a pagination link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target(String);

impl Target {
    pub fn new(target: impl Into<String>) -> Self {
        Target(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for pagination URLs, false for API paths like `repos/o/r/comments`
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with("https://") || self.0.starts_with("http://")
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A successful response, not yet decoded.
#[derive(Debug, Clone)]
pub struct Page {
    pub body: String,
    /// Value of `x-ratelimit-remaining`, if the server sent it
    pub rate_remaining: Option<u32>,
    /// Decoded `Link` header (empty on single-page results)
    pub links: LinkSet,
}

impl Page {
    /// Decodes the body. A body that does not match `T` is fatal.
    pub fn json<T: DeserializeOwned>(&self, target: &Target) -> Result<T, FetchError> {
        serde_json::from_str(&self.body).map_err(|source| FetchError::Decode {
            target: target.to_string(),
            source,
        })
    }
}

/// Classified result of one physical request.
#[derive(Debug)]
pub enum RequestOutcome {
    Success(Page),
    QuotaExceeded {
        rate_remaining: u32,
        /// Time left until the server resets the quota, never negative
        reset_delay: Duration,
    },
    TimedOut {
        retry_delay: Duration,
    },
    Fatal(FetchError),
}

impl RequestOutcome {
    /// Short name used in logs and retry failure messages
    pub fn kind(&self) -> &'static str {
        match self {
            RequestOutcome::Success(_) => "success",
            RequestOutcome::QuotaExceeded { .. } => "rate limit exceeded",
            RequestOutcome::TimedOut { .. } => "request timed out",
            RequestOutcome::Fatal(_) => "fatal error",
        }
    }
}

/// Issues a single request. Implemented by HttpFetcher, and by scripted
/// fakes in tests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, target: &Target) -> RequestOutcome;
}

/// The real fetcher, backed by reqwest.
pub struct HttpFetcher {
    client: Client,
    base: Url,
    timeout: Duration,
    retry_delay: Duration,
}

impl HttpFetcher {
    // Builds the HTTP client from the configuration
    //
    // Every request gets the token (if any), the GitHub JSON media type and
    // a User-Agent (GitHub rejects requests without one).
    pub fn new(config: &ClientConfig) -> Result<HttpFetcher> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("token {}", token))
                .context("GitHub token contains characters not allowed in a header")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        // Url::join() replaces the last path segment unless the base ends in '/'
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .with_context(|| format!("Invalid API base URL '{}'", config.base_url))?;

        Ok(HttpFetcher {
            client,
            base,
            timeout: config.timeout,
            retry_delay: config.retry_delay,
        })
    }

    fn resolve(&self, target: &Target) -> Result<Url, FetchError> {
        let resolved = if target.is_absolute() {
            Url::parse(target.as_str())
        } else {
            self.base.join(target.as_str().trim_start_matches('/'))
        };

        resolved.map_err(|source| FetchError::InvalidUrl {
            target: target.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &Target) -> RequestOutcome {
        let url = match self.resolve(target) {
            Ok(url) => url,
            Err(e) => return RequestOutcome::Fatal(e),
        };

        debug!(%url, "GET");

        // Sending and reading the body both count against the timeout
        let request = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, headers, body))
        };

        match tokio::time::timeout(self.timeout, request).await {
            // The timeout fired: the request future has been dropped already
            Err(_) => {
                warn!(%target, timeout_ms = self.timeout.as_millis() as u64, "request timed out");
                RequestOutcome::TimedOut {
                    retry_delay: self.retry_delay,
                }
            }
            Ok(Err(e)) if e.is_timeout() => RequestOutcome::TimedOut {
                retry_delay: self.retry_delay,
            },
            Ok(Err(e)) => RequestOutcome::Fatal(FetchError::Transport {
                target: target.to_string(),
                source: e,
            }),
            Ok(Ok((status, headers, body))) => {
                classify_response(target, status, &headers, body, Utc::now(), self.retry_delay)
            }
        }
    }
}

// Turns a response that did arrive into a RequestOutcome
//
// Parameters:
//   now:            current instant, used to compute the quota reset delay
//   fallback_delay: used when a quota response lacks a readable reset header
pub fn classify_response(
    target: &Target,
    status: StatusCode,
    headers: &HeaderMap,
    body: String,
    now: DateTime<Utc>,
    fallback_delay: Duration,
) -> RequestOutcome {
    let rate_remaining =
        header_number(headers, "x-ratelimit-remaining").and_then(|n| u32::try_from(n).ok());

    if status == StatusCode::ACCEPTED {
        return RequestOutcome::Fatal(FetchError::NotReady {
            target: target.to_string(),
        });
    }

    if status.is_success() {
        let links = parse_link_header(headers.get(LINK).and_then(|v| v.to_str().ok()));
        return RequestOutcome::Success(Page {
            body,
            rate_remaining,
            links,
        });
    }

    let denied = status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS;
    if denied && rate_remaining == Some(0) {
        let reset_delay = header_number(headers, "x-ratelimit-reset")
            .map(|reset| reset_delay(reset as i64, now))
            .unwrap_or(fallback_delay);

        warn!(
            %target,
            reset_delay_ms = reset_delay.as_millis() as u64,
            "rate limit exceeded"
        );
        return RequestOutcome::QuotaExceeded {
            rate_remaining: 0,
            reset_delay,
        };
    }

    RequestOutcome::Fatal(FetchError::Status {
        target: target.to_string(),
        status,
    })
}

// Time between now and the quota reset instant (Unix seconds)
//
// A reset instant in the past (clock skew) gives zero, never a negative sleep.
pub fn reset_delay(reset_epoch_secs: i64, now: DateTime<Utc>) -> Duration {
    DateTime::<Utc>::from_timestamp(reset_epoch_secs, 0)
        .and_then(|reset| (reset - now).to_std().ok())
        .unwrap_or(Duration::ZERO)
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does the timeout wrap an async block?
//    - tokio::time::timeout(d, fut) races `fut` against a timer
//    - If the timer wins, `fut` is dropped
//    - Dropping a reqwest future aborts the request and frees the socket
//    - Putting send() AND text() in one block bounds the whole exchange
//
// 2. Why return RequestOutcome instead of Result?
//    - There are four possible results, two of which are "try again later"
//    - An enum makes every caller handle all four explicitly
//    - The compiler complains if a match forgets one
//
// 3. What does #[async_trait] do?
//    - It rewrites `async fn` in a trait into a method returning a boxed future
//    - That lets us use `&dyn Fetcher` (a trait object) everywhere
//
// 4. Why take `now` as a parameter in classify_response()?
//    - Reading the clock inside would make the result change between runs
//    - Passing it in lets tests use a fixed instant
// -----------------------------------------------------------------------------
