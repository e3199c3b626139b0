// src/github/types.rs
// =============================================================================
// Wire payloads returned by the GitHub REST API.
//
// Only the fields we actually read are declared; serde ignores the rest.
// `author` and `user` are Option because GitHub returns null for deleted
// ("ghost") accounts.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// An account reference, e.g. `{ "login": "octocat", ... }`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub login: String,
}

/// One entry of `GET repos/{owner}/{repo}/stats/contributors`
#[derive(Debug, Clone, Deserialize)]
pub struct ContributorStat {
    pub author: Option<Account>,
    /// Total commits by this author
    pub total: u64,
}

/// One entry of the comments, pull request comments, and issue comments listings
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub user: Option<Account>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Login of the author, None for ghost accounts
    pub fn login(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.login.as_str())
    }
}

/// Body of `GET rate_limit`
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResponse {
    pub resources: RateLimitResources,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitCore,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitCore {
    pub remaining: u32,
}
