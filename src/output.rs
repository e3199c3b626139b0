// src/output.rs
// =============================================================================
// Final output: sorts contributors and renders them as text or JSON.
//
// Text output, one line per contributor, most comments first:
//
//      12 comments, alice (10 commits)
//       1 comment, carol (0 commits)
//
// Contributors with the same number of comments are listed by login.
// =============================================================================

use anyhow::Result;
use serde::Serialize;

use crate::stats::{ContributorMap, ContributorRecord};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRow<'a> {
    login: &'a str,
    #[serde(flatten)]
    record: ContributorRecord,
}

// Sorts by comment count (descending), then login (ascending)
pub fn sorted(contributors: &ContributorMap) -> Vec<(&str, ContributorRecord)> {
    let mut rows: Vec<(&str, ContributorRecord)> = contributors
        .iter()
        .map(|(login, record)| (login.as_str(), *record))
        .collect();

    rows.sort_by(|(a_login, a), (b_login, b)| {
        b.total_comments
            .cmp(&a.total_comments)
            .then_with(|| a_login.cmp(b_login))
    });

    rows
}

pub fn render_text(contributors: &ContributorMap) -> String {
    sorted(contributors)
        .into_iter()
        .map(|(login, record)| {
            format!(
                "{:>5} {}, {} ({} {})",
                record.total_comments,
                plural(record.total_comments, "comment"),
                login,
                record.total_commits,
                plural(record.total_commits, "commit"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON array in the same order as the text output
pub fn render_json(contributors: &ContributorMap) -> Result<String> {
    let rows: Vec<JsonRow> = sorted(contributors)
        .into_iter()
        .map(|(login, record)| JsonRow { login, record })
        .collect();

    Ok(serde_json::to_string_pretty(&rows)?)
}

fn plural(count: u64, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
