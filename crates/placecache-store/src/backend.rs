use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::redis_store::RedisStore;

/// Single-key operations over an expiring key-value store.
///
/// No operation spans more than one key. Implementations must make
/// `set_if_absent_with_ttl` and `delete_if_equals` atomic with respect to
/// other callers of the same store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the live value for `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Overwrites `key` unconditionally.
    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration)
        -> Result<(), StoreError>;

    /// Writes `key` only when no live value exists. Returns `true` when the
    /// write happened.
    async fn set_if_absent_with_ttl(
        &self,
        key: &str,
        value: &[u8],
        ttl: Duration,
    ) -> Result<bool, StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Deletes `key` only while it still holds `expected`. Returns `true`
    /// when a value was removed.
    async fn delete_if_equals(&self, key: &str, expected: &[u8]) -> Result<bool, StoreError>;

    /// Round-trips the backend connection.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases the backend connection. Later operations fail with
    /// [`StoreError::Closed`] on backends that hold one; the default is a
    /// no-op for backends that do not.
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Opens the backend named by `url`.
///
/// `memory://` yields a process-local store (tests and single-instance
/// development); `redis://` and `rediss://` open a managed Redis connection.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedUrl`] for any other scheme, or
/// [`StoreError::Redis`] if the Redis connection cannot be established.
pub async fn connect(url: &str) -> Result<SharedStore, StoreError> {
    if url.starts_with("memory://") {
        tracing::info!("using in-process memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        let store = RedisStore::connect(url).await?;
        return Ok(Arc::new(store));
    }
    Err(StoreError::UnsupportedUrl(url.to_string()))
}

/// Millisecond TTL for backends that take an integer expiry. Never zero, since
/// a zero expiry is rejected by Redis and would mean "never live" in memory.
pub(crate) fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}
