//! Chunked dispatch of large mutation sets.
//!
//! Spotify's mutation endpoints accept at most [`MAX_CHUNK_SIZE`] items per
//! request. [`apply_in_chunks`] partitions an arbitrarily large id set into
//! bounded chunks and applies them sequentially, stopping at the first chunk
//! that ultimately fails. Chunks that already succeeded are not rolled back;
//! a failed run may leave the target partially updated, which the next run
//! repairs because the whole sync is idempotent.

use std::future::Future;

use crate::{
    error::SyncError,
    retry::{RetryPolicy, with_retry},
};

/// Hard per-request item cap of the mutation endpoints.
pub const MAX_CHUNK_SIZE: usize = 100;

/// Applies `mutate` over `ids` in sequential chunks of at most
/// [`MAX_CHUNK_SIZE`] items.
///
/// # Arguments
///
/// * `policy` - Retry policy applied to every individual chunk call
/// * `ids` - Mutation-addressable identifiers, consumed in input order
/// * `mutate` - Performs one mutation call for one chunk
///
/// # Behavior
///
/// - Empty input is a no-op: zero mutation calls, zero retry invocations.
/// - Every chunk holds exactly `MAX_CHUNK_SIZE` ids except the final
///   remainder; concatenating the chunks reproduces the input order.
/// - Chunks are applied strictly sequentially; a chunk that exhausts its
///   retries (or fails non-retryably) aborts the call immediately and the
///   remaining chunks are never attempted.
///
/// # Returns
///
/// The number of ids applied, or the classified error of the failing chunk.
/// Callers wrap that error into their resource-specific kind before
/// propagating it further.
pub async fn apply_in_chunks<F, Fut>(
    policy: &RetryPolicy,
    ids: &[String],
    mut mutate: F,
) -> Result<usize, SyncError>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<(), SyncError>>,
{
    if ids.is_empty() {
        return Ok(0);
    }

    for chunk in ids.chunks(MAX_CHUNK_SIZE) {
        with_retry(policy, || mutate(chunk.to_vec())).await?;
    }

    Ok(ids.len())
}
