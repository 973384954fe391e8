use placecache_core::ValidationError;
use placecache_store::StoreError;
use thiserror::Error;

/// Failures a lookup caller can observe. Upstream provider errors never
/// appear here; the fallback chain absorbs them.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another caller held the fetch lock and the cache was still empty when
    /// the wait bound elapsed.
    #[error("gave up after {waited_ms} ms waiting for {key} to be filled")]
    LockWaitExhausted { key: String, waited_ms: u64 },

    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),
}
