//! Paginated collector
//!
//! Walks a cursor-paginated list operation to the end, keeps every item whose
//! projected attributes satisfy the predicate, then enforces that exactly one
//! item matched.
//!
//! Per lookup the traversal moves `Idle -> Fetching(cursor) -> Fetching(next) | Done`,
//! dropping to a failed state on the first listing error. Pages are fetched
//! strictly one after another; the next fetch is only issued once every item
//! of the current page has been evaluated.

use super::attributes::project;
use super::error::{LookupError, PaginationFault};
use super::filter::Predicate;
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;

/// Default hard cap on pages followed in one traversal
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// One page returned by a list operation
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub items: Vec<R>,
    /// Cursor for the following page; `None` or empty on the last page
    pub next_cursor: Option<String>,
}

impl<R> Page<R> {
    pub fn new(items: Vec<R>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// A final page with no continuation
    pub fn last(items: Vec<R>) -> Self {
        Self::new(items, None)
    }
}

/// Bounds on a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub max_pages: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Follow every page and return the matching items in first-seen order
///
/// `list` is called with `None` first, then with each non-empty cursor the
/// previous page returned. A listing error aborts the traversal immediately.
pub async fn collect_matches<R, F, Fut>(
    kind: &str,
    predicate: &Predicate,
    limits: PageLimits,
    mut list: F,
) -> Result<Vec<R>, LookupError>
where
    R: Serialize,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = anyhow::Result<Page<R>>>,
{
    let mut matches = Vec::new();
    let mut cursor: Option<String> = None;
    let mut seen_cursors = HashSet::new();
    let mut pages = 0usize;

    loop {
        if pages >= limits.max_pages {
            return Err(PaginationFault::PageLimitExceeded {
                limit: limits.max_pages,
            }
            .into());
        }
        pages += 1;

        let page = list(cursor.take())
            .await
            .map_err(|e| LookupError::upstream(kind, e))?;

        let fetched = page.items.len();
        let before = matches.len();
        matches.extend(
            page.items
                .into_iter()
                .filter(|item| predicate.matches(&project(item))),
        );
        tracing::debug!(
            "{} page {}: {} items, {} matched",
            kind,
            pages,
            fetched,
            matches.len() - before
        );

        match page.next_cursor.filter(|c| !c.is_empty()) {
            None => break,
            Some(next) => {
                if !seen_cursors.insert(next.clone()) {
                    return Err(PaginationFault::CursorRepeated {
                        cursor: next,
                        page: pages,
                    }
                    .into());
                }
                cursor = Some(next);
            }
        }
    }

    Ok(matches)
}

/// Follow every page and return the single matching item
pub async fn collect<R, F, Fut>(
    kind: &str,
    predicate: &Predicate,
    limits: PageLimits,
    list: F,
) -> Result<R, LookupError>
where
    R: Serialize,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = anyhow::Result<Page<R>>>,
{
    let mut matches = collect_matches(kind, predicate, limits, list).await?;

    match matches.len() {
        0 => Err(LookupError::NotFound {
            kind: kind.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(LookupError::Ambiguous {
            kind: kind.to_string(),
            count,
        }),
    }
}
