// src/run.rs
// =============================================================================
// The run controller: one strictly sequential pass over the API.
//
//   rate_limit
//   -> stats/contributors          (commits per author)
//   -> comments                    (all pages)
//   -> pulls/comments              (all pages)
//   -> issues/comments             (all pages)
//   -> finished ContributorMap
//
// Exactly one request is in flight at any time. Any fatal error aborts the
// whole run: there is no partial summary.
//
// Progress units: one for the statistics, one per comment endpoint, one for
// the final step, plus whatever extra pages the walker discovers.
// =============================================================================

use chrono::{DateTime, Utc};
use tracing::info;

use crate::github::{
    execute_json, walk_comments, ContributorStat, FetchError, Fetcher, RateLimitResponse, RepoId,
    Target,
};
use crate::progress::Progress;
use crate::stats::{fold_commit_stats, fold_comments, ContributorMap};

/// Comment listings walked for every repository, in this order
pub const COMMENT_ENDPOINTS: [&str; 3] = ["comments", "pulls/comments", "issues/comments"];

/// Units of work known before the first request
pub fn initial_units() -> u64 {
    COMMENT_ENDPOINTS.len() as u64 + 2
}

// Reads the remaining core quota from `GET rate_limit`
pub async fn fetch_rate_limit(
    fetcher: &dyn Fetcher,
    progress: &dyn Progress,
) -> Result<u32, FetchError> {
    let target = Target::new("rate_limit");
    let (response, _): (RateLimitResponse, _) = execute_json(fetcher, &target, progress).await?;
    Ok(response.resources.core.remaining)
}

// Runs the full pipeline for one repository
//
// Parameters:
//   cutoff: only count comments created at or after this instant
//
// Returns: login -> (commits, comments), or the first fatal error
pub async fn collect_activity(
    fetcher: &dyn Fetcher,
    repo: &RepoId,
    cutoff: Option<DateTime<Utc>>,
    progress: &dyn Progress,
) -> Result<ContributorMap, FetchError> {
    progress.step("Getting Collaborator Statistics");
    let remaining = fetch_rate_limit(fetcher, progress).await?;
    progress.rate_limit(remaining);
    info!(%repo, remaining, "starting run");

    let route = repo.route();

    let target = Target::new(format!("{}/stats/contributors", route));
    let (stats, rate): (Vec<ContributorStat>, _) =
        execute_json(fetcher, &target, progress).await?;
    let mut contributors = fold_commit_stats(&stats);

    progress.advance(1);
    if let Some(rate) = rate {
        progress.rate_limit(rate);
    }
    progress.step("Finished Getting Collaborator Statistics");
    info!(committers = contributors.len(), "collaborator statistics fetched");

    for endpoint in COMMENT_ENDPOINTS {
        progress.step(&format!("Get {}", endpoint));

        let start = Target::new(format!("{}/{}", route, endpoint));
        let walk = walk_comments(fetcher, endpoint, start, cutoff, progress).await?;
        info!(
            endpoint,
            pages = walk.pages,
            comments = walk.comments.len(),
            rate_remaining = walk.rate_remaining,
            "endpoint walked"
        );

        contributors = fold_comments(&walk.comments, contributors);

        progress.advance(1);
        progress.step(&format!("Finished Get {}", endpoint));
    }

    progress.advance(1);
    progress.step("Finished");

    Ok(contributors)
}
