use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use spotsync::error::{ErrorKind, SyncError};
use spotsync::retry::{RetryPolicy, with_retry};

/// Short delays so the backoff tests run quickly.
fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        initial_delay: Duration::from_millis(10),
        backoff_factor: 2,
        retryable_kinds: vec![ErrorKind::Api],
    }
}

#[tokio::test]
async fn test_success_on_first_attempt_invokes_once() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;

    let result = with_retry(&fast_policy(3), || async move {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        Ok::<_, SyncError>(42)
    })
    .await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fail_twice_then_succeed_on_third_attempt() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;
    let start = Instant::now();

    let result = with_retry(&fast_policy(3), || async move {
        let attempt = calls_ref.fetch_add(1, Ordering::SeqCst);
        if attempt < 2 {
            Err(SyncError::api(502, "bad gateway"))
        } else {
            Ok("success")
        }
    })
    .await;

    assert_eq!(result.unwrap(), "success");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // waits were 10ms then 20ms
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn test_exhausted_retries_propagate_the_last_error() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;

    let result: Result<(), SyncError> = with_retry(&fast_policy(3), || async move {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        Err(SyncError::api(502, "still broken"))
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status(), Some(502));
    // at most max_retries total attempts
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_non_retryable_error_short_circuits() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;
    let start = Instant::now();

    let result: Result<(), SyncError> = with_retry(&fast_policy(3), || async move {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        Err(SyncError::config("missing variable"))
    })
    .await;

    assert_eq!(result.unwrap_err().kind(), ErrorKind::Config);
    // exactly one invocation and no backoff wait
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(start.elapsed() < Duration::from_millis(10));
}

#[tokio::test]
async fn test_empty_retryable_set_disables_retries() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;
    let policy = RetryPolicy {
        retryable_kinds: Vec::new(),
        ..fast_policy(3)
    };

    let result: Result<(), SyncError> = with_retry(&policy, || async move {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        Err(SyncError::api(502, "bad gateway"))
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_success_after_one_failure_stops_retrying() {
    let calls = AtomicUsize::new(0);
    let calls_ref = &calls;

    let result = with_retry(&fast_policy(5), || async move {
        let attempt = calls_ref.fetch_add(1, Ordering::SeqCst);
        if attempt == 0 {
            Err(SyncError::api(502, "one off"))
        } else {
            Ok(attempt)
        }
    })
    .await;

    assert_eq!(result.unwrap(), 1);
    // no further attempts after the first success
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
