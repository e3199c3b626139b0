// src/github/paginate.rs
// =============================================================================
// This module walks a paginated comment listing from the first page to the
// last, following the `next` relation of each page's Link header.
//
// How it works:
// 1. comment_pages() is a lazy Stream: each poll fetches one page through
//    the retry orchestrator, decodes it, drops comments older than the
//    cutoff and remembers the page's `next` link as the stream state.
//    It ends when a page has no `next` link.
// 2. walk_comments() drains that stream, accumulating comments and
//    reporting progress along the way.
//
// Progress accounting:
// - The caller already counted one unit for the endpoint (the first page).
// - If page 1 announces a `last` page, we add `last - 1` units to the
//   total once. That estimate is not revised from later pages.
//   So a 3-page listing grows the total by 2 (pages 2 and 3), not by a
//   single net unit, and then advances by 2.
// - Every page after the first is one unit of work done. If the server
//   hands out more pages than announced, the total grows by one per
//   surplus page so it never falls behind the position.
//
// A fatal error on any page aborts the walk. Comments collected so far
// are dropped along with it.
//
// Rust concepts:
// - Streams (futures::stream): An async iterator, pulled one page at a time
// - try_unfold: Builds a stream from a state (the next URL) and a step fn
// - pin_mut!: Streams must be pinned before you can poll them
// =============================================================================

use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, TryStreamExt};
use futures::pin_mut;
use tracing::debug;

use super::error::FetchError;
use super::fetch::{Fetcher, Target};
use super::link::LinkSet;
use super::retry::execute;
use super::types::Comment;
use crate::progress::Progress;
use crate::stats::filter_since;

/// One decoded, cutoff-filtered page of comments.
#[derive(Debug)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub rate_remaining: Option<u32>,
    pub links: LinkSet,
}

/// Everything a finished walk produced.
#[derive(Debug, Default)]
pub struct CommentWalk {
    pub comments: Vec<Comment>,
    /// `x-ratelimit-remaining` of the last page that reported one
    pub rate_remaining: Option<u32>,
    /// Number of pages fetched
    pub pages: u32,
}

// Lazily fetches the pages of a comment listing
//
// Parameters:
//   start:  first page, usually an API path like `repos/o/r/issues/comments`
//   cutoff: keep only comments created at or after this instant (None keeps all)
//
// The stream is forward-only: once a page is yielded it is never fetched again.
pub fn comment_pages<'a>(
    fetcher: &'a dyn Fetcher,
    start: Target,
    cutoff: Option<DateTime<Utc>>,
    progress: &'a dyn Progress,
) -> impl Stream<Item = Result<CommentPage, FetchError>> + 'a {
    stream::try_unfold(Some(start), move |next: Option<Target>| async move {
        let target = match next {
            Some(target) => target,
            None => return Ok::<_, FetchError>(None),
        };

        let page = execute(fetcher, &target, progress).await?;
        let comments: Vec<Comment> = page.json(&target)?;
        let fetched = comments.len();
        let comments = filter_since(comments, cutoff);

        debug!(%target, fetched, kept = comments.len(), "comment page");

        let following = page.links.next().map(|link| Target::new(link.url.clone()));

        Ok::<_, FetchError>(Some((
            CommentPage {
                comments,
                rate_remaining: page.rate_remaining,
                links: page.links,
            },
            following,
        )))
    })
}

// Walks every page of a comment listing
//
// Parameters:
//   label: endpoint name for progress messages, e.g. "pulls/comments"
//
// Returns: all kept comments across all pages, or the first fatal error
pub async fn walk_comments(
    fetcher: &dyn Fetcher,
    label: &str,
    start: Target,
    cutoff: Option<DateTime<Utc>>,
    progress: &dyn Progress,
) -> Result<CommentWalk, FetchError> {
    let pages = comment_pages(fetcher, start, cutoff, progress);
    pin_mut!(pages);

    let mut walk = CommentWalk::default();
    // Extra pages already added to the progress total
    let mut announced: u64 = 0;
    let mut extra_seen: u64 = 0;

    while let Some(page) = pages.try_next().await? {
        walk.pages += 1;

        if walk.pages == 1 {
            if let Some(last) = page.links.last_page() {
                announced = u64::from(last.saturating_sub(1));
                if announced > 0 {
                    progress.grow_total(announced);
                }
            }
        } else {
            extra_seen += 1;
            if extra_seen > announced {
                progress.grow_total(1);
                announced += 1;
            }
            progress.advance(1);
        }

        if let Some(rate) = page.rate_remaining {
            walk.rate_remaining = Some(rate);
            progress.rate_limit(rate);
        }

        walk.comments.extend(page.comments);

        if let Some(next) = page.links.next() {
            let label = match next.page {
                Some(number) => format!("Get {} (page {})", label, number),
                None => format!("Get {} (next page)", label),
            };
            progress.step(&label);
        }
    }

    Ok(walk)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a Stream?
//    - The async version of Iterator
//    - Instead of next() you call .try_next().await (from TryStreamExt)
//    - Nothing is fetched until someone asks for the next item
//
// 2. How does try_unfold work?
//    - It starts with a state (here: Some(first target))
//    - Each step gets the state and returns Ok(Some((item, new_state)))
//    - Returning Ok(None) ends the stream, Err(e) ends it with an error
//
// 3. Why `move |next| async move { ... }`?
//    - The closure must own what it captures (fetcher, progress, cutoff)
//    - The async block inside must own `next` since it outlives the call
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::scripted::{comments_json, fatal, ok, quota, ScriptedFetcher};
    use crate::progress::testing::{Event, RecordingProgress};
    use reqwest::StatusCode;

    const PAGE_2: &str = "https://api.github.com/repositories/1/comments?page=2";
    const PAGE_3: &str = "https://api.github.com/repositories/1/comments?page=3";

    fn page(n: usize) -> String {
        let entries: Vec<(&str, &str)> = (0..n).map(|_| ("alice", "2024-05-01T00:00:00Z")).collect();
        comments_json(&entries)
    }

    fn three_page_script() -> Vec<crate::github::fetch::RequestOutcome> {
        let first_link = format!(r#"<{}>; rel="next", <{}>; rel="last""#, PAGE_2, PAGE_3);
        let second_link = format!(r#"<{}>; rel="next""#, PAGE_3);
        vec![
            ok(&page(5), 90, Some(&first_link)),
            ok(&page(3), 89, Some(&second_link)),
            ok(&page(2), 88, None),
        ]
    }

    #[tokio::test]
    async fn test_walks_three_pages() {
        let fetcher = ScriptedFetcher::new(three_page_script());
        let progress = RecordingProgress::default();

        let walk = walk_comments(
            &fetcher,
            "comments",
            Target::new("repos/o/r/comments"),
            None,
            &progress,
        )
        .await
        .unwrap();

        assert_eq!(walk.comments.len(), 10);
        assert_eq!(walk.pages, 3);
        assert_eq!(walk.rate_remaining, Some(88));
        assert_eq!(
            fetcher.seen(),
            vec!["repos/o/r/comments".to_string(), PAGE_2.to_string(), PAGE_3.to_string()]
        );

        // Total grows once after page 1 by last - 1, then one unit per extra page
        assert_eq!(
            progress.events(),
            vec![
                Event::GrowTotal(2),
                Event::RateLimit(90),
                Event::Step("Get comments (page 2)".to_string()),
                Event::Advance(1),
                Event::RateLimit(89),
                Event::Step("Get comments (page 3)".to_string()),
                Event::Advance(1),
                Event::RateLimit(88),
            ]
        );
    }

    #[tokio::test]
    async fn test_single_page_needs_no_extra_work() {
        let fetcher = ScriptedFetcher::new(vec![ok(&page(4), 50, None)]);
        let progress = RecordingProgress::default();

        let walk = walk_comments(
            &fetcher,
            "issues/comments",
            Target::new("repos/o/r/issues/comments"),
            None,
            &progress,
        )
        .await
        .unwrap();

        assert_eq!(walk.comments.len(), 4);
        assert_eq!(walk.pages, 1);
        assert_eq!(progress.grown(), 0);
        assert_eq!(progress.advanced(), 0);
    }

    #[tokio::test]
    async fn test_cutoff_filters_each_page() {
        let first = comments_json(&[
            ("alice", "2024-05-10T00:00:00Z"),
            ("bob", "2024-04-01T00:00:00Z"),
        ]);
        let second = comments_json(&[
            ("carol", "2024-05-01T00:00:00Z"),
            ("dave", "2024-04-30T23:59:59Z"),
        ]);
        let link = format!(r#"<{}>; rel="next", <{}>; rel="last""#, PAGE_2, PAGE_2);
        let fetcher = ScriptedFetcher::new(vec![ok(&first, 10, Some(&link)), ok(&second, 9, None)]);
        let progress = RecordingProgress::default();
        let cutoff = "2024-05-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();

        let walk = walk_comments(
            &fetcher,
            "comments",
            Target::new("repos/o/r/comments"),
            Some(cutoff),
            &progress,
        )
        .await
        .unwrap();

        let logins: Vec<&str> = walk.comments.iter().filter_map(|c| c.login()).collect();
        assert_eq!(logins, vec!["alice", "carol"]);
    }

    #[tokio::test]
    async fn test_more_pages_than_announced_grows_total() {
        // Page 1 says last=2, but page 2 still links onwards
        let first_link = format!(r#"<{}>; rel="next", <{}>; rel="last""#, PAGE_2, PAGE_2);
        let second_link = format!(r#"<{}>; rel="next""#, PAGE_3);
        let fetcher = ScriptedFetcher::new(vec![
            ok(&page(1), 3, Some(&first_link)),
            ok(&page(1), 2, Some(&second_link)),
            ok(&page(1), 1, None),
        ]);
        let progress = RecordingProgress::default();

        walk_comments(
            &fetcher,
            "comments",
            Target::new("repos/o/r/comments"),
            None,
            &progress,
        )
        .await
        .unwrap();

        assert_eq!(progress.grown(), 2);
        assert_eq!(progress.advanced(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_retry_then_continue() {
        let link = format!(r#"<{}>; rel="next", <{}>; rel="last""#, PAGE_2, PAGE_2);
        let fetcher = ScriptedFetcher::new(vec![
            ok(&page(2), 1, Some(&link)),
            quota(3_000),
            ok(&page(2), 4_999, None),
        ]);
        let progress = RecordingProgress::default();

        let walk = walk_comments(
            &fetcher,
            "comments",
            Target::new("repos/o/r/comments"),
            None,
            &progress,
        )
        .await
        .unwrap();

        assert_eq!(walk.comments.len(), 4);
        assert_eq!(walk.rate_remaining, Some(4_999));
        assert_eq!(fetcher.seen(), vec!["repos/o/r/comments", PAGE_2, PAGE_2]);
    }

    #[tokio::test]
    async fn test_fatal_page_discards_partial_results() {
        let link = format!(r#"<{}>; rel="next", <{}>; rel="last""#, PAGE_2, PAGE_3);
        let fetcher = ScriptedFetcher::new(vec![
            ok(&page(5), 10, Some(&link)),
            fatal(StatusCode::INTERNAL_SERVER_ERROR),
        ]);
        let progress = RecordingProgress::default();

        let result = walk_comments(
            &fetcher,
            "comments",
            Target::new("repos/o/r/comments"),
            None,
            &progress,
        )
        .await;

        assert!(matches!(result, Err(FetchError::Status { .. })));
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let fetcher = ScriptedFetcher::new(three_page_script());
        let progress = RecordingProgress::default();

        let pages = comment_pages(&fetcher, Target::new("repos/o/r/comments"), None, &progress);
        pin_mut!(pages);

        let first = pages.try_next().await.unwrap().unwrap();
        assert_eq!(first.comments.len(), 5);
        // Only the first page has been requested so far
        assert_eq!(fetcher.seen().len(), 1);
    }
}
