// src/github/scripted.rs
// =============================================================================
// An in-memory Fetcher for tests: hands out pre-arranged outcomes in order
// and records which targets were requested.
// =============================================================================

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::error::FetchError;
use super::fetch::{Fetcher, Page, RequestOutcome, Target};
use super::link::parse_link_header;

#[derive(Default)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<RequestOutcome>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<RequestOutcome>) -> ScriptedFetcher {
        ScriptedFetcher {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Targets requested so far
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, target: &Target) -> RequestOutcome {
        self.seen.lock().unwrap().push(target.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request to {}", target))
    }
}

pub fn ok(body: &str, rate_remaining: u32, link: Option<&str>) -> RequestOutcome {
    RequestOutcome::Success(Page {
        body: body.to_string(),
        rate_remaining: Some(rate_remaining),
        links: parse_link_header(link),
    })
}

pub fn quota(reset_ms: u64) -> RequestOutcome {
    RequestOutcome::QuotaExceeded {
        rate_remaining: 0,
        reset_delay: Duration::from_millis(reset_ms),
    }
}

pub fn timed_out(retry_ms: u64) -> RequestOutcome {
    RequestOutcome::TimedOut {
        retry_delay: Duration::from_millis(retry_ms),
    }
}

pub fn fatal(status: StatusCode) -> RequestOutcome {
    RequestOutcome::Fatal(FetchError::Status {
        target: "scripted".to_string(),
        status,
    })
}

/// JSON array with one comment per (login, created_at) pair
pub fn comments_json(entries: &[(&str, &str)]) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(login, created_at)| {
            format!(
                r#"{{"user": {{"login": "{}"}}, "created_at": "{}"}}"#,
                login, created_at
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}
