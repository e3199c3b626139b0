// src/stats/filter.rs
// =============================================================================
// Cutoff filtering for comments.
//
// The cutoff is the earliest acceptable creation instant: a comment is kept
// when `created_at >= cutoff`. Without a cutoff everything is kept.
// =============================================================================

use chrono::{DateTime, Utc};

use crate::github::Comment;

pub fn filter_since(comments: Vec<Comment>, cutoff: Option<DateTime<Utc>>) -> Vec<Comment> {
    match cutoff {
        Some(cutoff) => comments
            .into_iter()
            .filter(|comment| comment.created_at >= cutoff)
            .collect(),
        None => comments,
    }
}
