//! Exhaustive traversal of paginated API resources.
//!
//! The Spotify Web API pages every collection endpoint. Two styles are in
//! use: offset/limit with a `total` count in each response body (saved
//! tracks, playlist tracks) and cursor/after with an opaque continuation
//! token (followed artists). Both drivers below drain a resource completely
//! into memory, wrapping each individual page request in the retry executor.
//! A page that exhausts its retries aborts the whole fetch; callers never
//! see a partially drained collection.

use std::future::Future;

use crate::{
    error::SyncError,
    retry::{RetryPolicy, with_retry},
};

/// One offset/limit page: the items plus the collection total as reported
/// by the server alongside this page.
#[derive(Debug, Clone)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// One cursor page: the items plus the continuation cursor, `None` when the
/// final page has been reached.
#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub after: Option<String>,
}

/// Fully materializes an offset/limit paginated collection.
///
/// # Arguments
///
/// * `policy` - Retry policy applied to every individual page request
/// * `limit` - Page size; the offset advances by exactly this amount
/// * `request` - Performs one page request for the given offset
///
/// # Termination
///
/// Traversal stops once `offset >= total` after a page has been consumed.
/// The `total` reported with the latest page is trusted, so a collection
/// that grows or shrinks mid-fetch is handled at the server's discretion.
/// An empty page also terminates, guarding against a remote that keeps
/// reporting a total it never serves.
///
/// # Errors
///
/// The classified error of the first page request that exhausts its retries
/// (or fails non-retryably). No items are returned in that case.
pub async fn fetch_all_offset<T, F, Fut>(
    policy: &RetryPolicy,
    limit: u64,
    mut request: F,
) -> Result<Vec<T>, SyncError>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<OffsetPage<T>, SyncError>>,
{
    let mut items: Vec<T> = Vec::new();
    let mut offset: u64 = 0;

    loop {
        let page = with_retry(policy, || request(offset)).await?;

        let total = page.total;
        let fetched = page.items.len();
        items.extend(page.items);
        offset += limit;

        if offset >= total || fetched == 0 {
            break;
        }
    }

    Ok(items)
}

/// Fully materializes a cursor/after paginated collection.
///
/// # Arguments
///
/// * `policy` - Retry policy applied to every individual page request
/// * `request` - Performs one page request for the given cursor (`None` for
///   the first page)
///
/// # Termination
///
/// Traversal stops after a page whose `after` cursor is absent or empty.
/// Cursors are chained strictly: each request uses exactly the cursor
/// returned by the previous page, so no page is skipped or fetched twice.
///
/// # Errors
///
/// Same abort semantics as [`fetch_all_offset`].
pub async fn fetch_all_cursor<T, F, Fut>(
    policy: &RetryPolicy,
    mut request: F,
) -> Result<Vec<T>, SyncError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<CursorPage<T>, SyncError>>,
{
    let mut items: Vec<T> = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let page = with_retry(policy, || request(after.clone())).await?;

        items.extend(page.items);
        after = page.after.filter(|cursor| !cursor.is_empty());

        if after.is_none() {
            break;
        }
    }

    Ok(items)
}
