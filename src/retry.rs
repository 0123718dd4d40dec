//! Bounded exponential backoff around fallible async operations.
//!
//! Every remote call in the application (one page request, one mutation
//! chunk, one token exchange) goes through [`with_retry`]. The policy decides
//! how many attempts are made and which error kinds are worth retrying at
//! all; configuration and authentication failures propagate immediately.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::{
    error::{ErrorKind, SyncError},
    warning,
};

/// Retry configuration for [`with_retry`].
///
/// `max_retries` is the total number of attempts, not the number of retries
/// after the first try. The wait before attempt *k* (counting from 0) is
/// `initial_delay * backoff_factor^(k-1)` and depends only on the attempt
/// number, never on the kind of the previous error.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub backoff_factor: u32,
    pub retryable_kinds: Vec<ErrorKind>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            backoff_factor: 2,
            retryable_kinds: vec![ErrorKind::Api],
        }
    }
}

/// Executes `op` until it succeeds, fails with a non-retryable error, or
/// exhausts `policy.max_retries` attempts.
///
/// # Arguments
///
/// * `policy` - Attempt bound, backoff schedule and retryable kinds
/// * `op` - Closure producing a fresh future per attempt
///
/// # Returns
///
/// The first `Ok` value, or the classified error of the last attempt. An
/// error whose kind is not in `policy.retryable_kinds` is propagated
/// immediately without a backoff wait.
///
/// # Backoff
///
/// Waits are cooperative (`tokio::time::sleep`); no resource is held while
/// suspended. With the defaults a failing operation is attempted at 0ms,
/// 1000ms and 3000ms before the error surfaces.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, SyncError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SyncError>>,
{
    let mut attempt: u32 = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retryable(&policy.retryable_kinds) {
                    return Err(err);
                }

                attempt += 1;
                if attempt >= policy.max_retries {
                    return Err(err);
                }

                let delay = policy.initial_delay * policy.backoff_factor.pow(attempt - 1);
                warning!(
                    "Attempt {} failed ({}), retrying in {:?}",
                    attempt,
                    err,
                    delay
                );
                sleep(delay).await;
            }
        }
    }
}
