// src/stats/aggregate.rs
// =============================================================================
// Per-contributor counters and the folds that fill them.
//
// The map is keyed by GitHub login. A record is created the first time a
// login shows up (in the commit statistics OR in a comment) and is only ever
// incremented afterwards.
//
// Both folds are pure: they take the current map by value and hand back the
// updated one. Counting is per key addition, so the order of the input does
// not change the result.
//
// Rust concepts:
// - BTreeMap: A sorted map, so JSON output is stable between runs
// - entry() API: Insert-or-update in one lookup
// - Moving values in and out: `map` goes in, the updated map comes out
// =============================================================================

use serde::Serialize;
use std::collections::BTreeMap;

use crate::github::{Comment, ContributorStat};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorRecord {
    pub total_commits: u64,
    pub total_comments: u64,
}

#[cfg(test)]
impl ContributorRecord {
    pub fn new(total_commits: u64, total_comments: u64) -> Self {
        ContributorRecord {
            total_commits,
            total_comments,
        }
    }
}

/// login -> counters
pub type ContributorMap = BTreeMap<String, ContributorRecord>;

// Builds the initial map from `stats/contributors`
//
// One record per author, with total_comments = 0. Entries whose author was
// deleted (author: null) are skipped.
pub fn fold_commit_stats(stats: &[ContributorStat]) -> ContributorMap {
    stats
        .iter()
        .filter_map(|stat| stat.author.as_ref().map(|author| (author, stat.total)))
        .fold(ContributorMap::new(), |mut map, (author, total)| {
            map.entry(author.login.clone()).or_default().total_commits += total;
            map
        })
}

// Adds one comment to its author's record, creating a zero-commit record
// for authors who never committed
pub fn fold_comments(comments: &[Comment], map: ContributorMap) -> ContributorMap {
    comments
        .iter()
        .filter_map(Comment::login)
        .fold(map, |mut map, login| {
            map.entry(login.to_string()).or_default().total_comments += 1;
            map
        })
}
