use std::error::Error;

use spotsync::error::{ErrorKind, Severity, SyncError};

#[test]
fn test_api_error_carries_status_and_kind() {
    let err = SyncError::api(404, "playlist not found");

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("404"));
    assert!(err.to_string().contains("playlist not found"));
}

#[test]
fn test_non_api_errors_have_no_status() {
    assert_eq!(SyncError::config("missing var").status(), None);
    assert_eq!(
        SyncError::track("fetch failed", SyncError::api(502, "bad gateway")).status(),
        None
    );
}

#[test]
fn test_wrapping_preserves_the_original_cause() {
    let cause = SyncError::api(503, "service unavailable");
    let err = SyncError::playlist("failed to add tracks to playlist", cause);

    assert_eq!(err.kind(), ErrorKind::Playlist);

    // the API error stays reachable through the source chain
    let source = err.source().expect("wrapped error must keep its cause");
    assert!(source.to_string().contains("503"));
    assert!(source.to_string().contains("service unavailable"));
}

#[test]
fn test_retry_eligibility_is_kind_membership() {
    let api = SyncError::api(502, "bad gateway");
    let config = SyncError::config("missing var");
    let auth = SyncError::Auth {
        message: "refresh failed".to_string(),
        source: None,
    };

    let default_kinds = [ErrorKind::Api];
    assert!(api.is_retryable(&default_kinds));
    assert!(!config.is_retryable(&default_kinds));
    assert!(!auth.is_retryable(&default_kinds));

    // membership is by value, so widening the set widens eligibility
    assert!(auth.is_retryable(&[ErrorKind::Api, ErrorKind::Auth]));
    assert!(!api.is_retryable(&[]));
}

#[test]
fn test_severity_rules() {
    // server-side API errors and configuration errors are fatal
    assert_eq!(SyncError::api(500, "boom").severity(), Severity::Fatal);
    assert_eq!(SyncError::api(503, "boom").severity(), Severity::Fatal);
    assert_eq!(SyncError::config("missing").severity(), Severity::Fatal);

    // everything else is reported as a warning
    assert_eq!(SyncError::api(404, "gone").severity(), Severity::Warning);
    assert_eq!(SyncError::api(429, "limited").severity(), Severity::Warning);
    assert_eq!(
        SyncError::follow("follow failed", SyncError::api(500, "boom")).severity(),
        Severity::Warning
    );
}
