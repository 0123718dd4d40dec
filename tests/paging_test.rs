use std::sync::Mutex;
use std::time::Duration;

use spotsync::error::{ErrorKind, SyncError};
use spotsync::paging::{CursorPage, OffsetPage, fetch_all_cursor, fetch_all_offset};
use spotsync::retry::RetryPolicy;

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        initial_delay: Duration::from_millis(1),
        ..RetryPolicy::default()
    }
}

/// Serves `total` numbered items in pages of `limit`.
fn offset_page(offset: u64, limit: u64, total: u64) -> OffsetPage<u64> {
    let end = total.min(offset + limit);
    OffsetPage {
        items: (offset..end).collect(),
        total,
    }
}

#[tokio::test]
async fn test_offset_fetch_visits_every_page_exactly_once() {
    let offsets = Mutex::new(Vec::new());
    let offsets_ref = &offsets;

    let items = fetch_all_offset(&fast_policy(), 50, |offset| async move {
        offsets_ref.lock().unwrap().push(offset);
        Ok::<_, SyncError>(offset_page(offset, 50, 101))
    })
    .await
    .unwrap();

    // total=101, limit=50 -> exactly three requests at offsets 0, 50, 100
    assert_eq!(*offsets.lock().unwrap(), vec![0, 50, 100]);
    assert_eq!(items.len(), 101);
    // monotonic advance keeps arrival order intact
    assert_eq!(items, (0..101).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_offset_fetch_of_empty_collection_issues_one_request() {
    let offsets = Mutex::new(Vec::new());
    let offsets_ref = &offsets;

    let items = fetch_all_offset(&fast_policy(), 50, |offset| async move {
        offsets_ref.lock().unwrap().push(offset);
        Ok::<_, SyncError>(offset_page(offset, 50, 0))
    })
    .await
    .unwrap();

    assert!(items.is_empty());
    assert_eq!(*offsets.lock().unwrap(), vec![0]);
}

#[tokio::test]
async fn test_offset_fetch_retries_a_failing_page_without_skipping() {
    let calls = Mutex::new(Vec::new());
    let calls_ref = &calls;

    let items = fetch_all_offset(&fast_policy(), 50, |offset| async move {
        calls_ref.lock().unwrap().push(offset);
        // second page fails once before succeeding
        let second_page_attempts = calls_ref
            .lock()
            .unwrap()
            .iter()
            .filter(|o| **o == 50)
            .count();
        if offset == 50 && second_page_attempts == 1 {
            return Err(SyncError::api(502, "bad gateway"));
        }
        Ok(offset_page(offset, 50, 101))
    })
    .await
    .unwrap();

    // offset 50 was attempted twice, nothing skipped, nothing re-fetched
    assert_eq!(*calls.lock().unwrap(), vec![0, 50, 50, 100]);
    assert_eq!(items, (0..101).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_offset_fetch_aborts_when_a_page_exhausts_retries() {
    let calls = Mutex::new(Vec::new());
    let calls_ref = &calls;

    let result: Result<Vec<u64>, SyncError> =
        fetch_all_offset(&fast_policy(), 50, |offset| async move {
            calls_ref.lock().unwrap().push(offset);
            if offset == 50 {
                return Err(SyncError::api(502, "bad gateway"));
            }
            Ok(offset_page(offset, 50, 101))
        })
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    // first page once, second page three times (retries exhausted), no third page
    assert_eq!(*calls.lock().unwrap(), vec![0, 50, 50, 50]);
}

#[tokio::test]
async fn test_offset_fetch_propagates_non_retryable_errors_immediately() {
    let calls = Mutex::new(0u32);
    let calls_ref = &calls;

    let result: Result<Vec<u64>, SyncError> =
        fetch_all_offset(&fast_policy(), 50, |_offset| async move {
            *calls_ref.lock().unwrap() += 1;
            Err(SyncError::config("broken setup"))
        })
        .await;

    assert_eq!(result.unwrap_err().kind(), ErrorKind::Config);
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_cursor_fetch_chains_cursors_strictly() {
    let cursors = Mutex::new(Vec::new());
    let cursors_ref = &cursors;

    let items = fetch_all_cursor(&fast_policy(), |after| async move {
        cursors_ref.lock().unwrap().push(after.clone());
        let page = match after.as_deref() {
            None => CursorPage {
                items: vec!["a", "b"],
                after: Some("c1".to_string()),
            },
            Some("c1") => CursorPage {
                items: vec!["c"],
                after: Some("c2".to_string()),
            },
            Some("c2") => CursorPage {
                items: vec!["d"],
                after: None,
            },
            other => panic!("unexpected cursor {:?}", other),
        };
        Ok::<_, SyncError>(page)
    })
    .await
    .unwrap();

    assert_eq!(items, vec!["a", "b", "c", "d"]);
    assert_eq!(
        *cursors.lock().unwrap(),
        vec![None, Some("c1".to_string()), Some("c2".to_string())]
    );
}

#[tokio::test]
async fn test_cursor_fetch_treats_empty_cursor_as_terminal() {
    let calls = Mutex::new(0u32);
    let calls_ref = &calls;

    let items = fetch_all_cursor(&fast_policy(), |_after| async move {
        *calls_ref.lock().unwrap() += 1;
        Ok::<_, SyncError>(CursorPage {
            items: vec![1, 2, 3],
            after: Some(String::new()),
        })
    })
    .await
    .unwrap();

    assert_eq!(items, vec![1, 2, 3]);
    assert_eq!(*calls.lock().unwrap(), 1);
}
