//! Best-effort per-key mutual exclusion for upstream fetches.
//!
//! A lock is a store entry at `lock:{cache key}` written with set-if-absent
//! and an expiry. The entry's value is a random ownership token, and release
//! deletes the entry only while that token is still present, so a holder
//! whose lock already expired cannot remove a newer holder's lock.
//!
//! Locks are never renewed. A fetch that outlives the TTL loses exclusivity
//! and a second fetch may start; the store does not stop a non-holder from
//! writing the guarded cache entry either. Both are accepted trade-offs.

use std::time::Duration;

use placecache_core::CacheKey;
use uuid::Uuid;

use crate::backend::SharedStore;
use crate::error::StoreError;

/// Proof of a successful [`StampedeLock::try_acquire`]. Pass it back to
/// [`StampedeLock::release`]; dropping it leaves the lock to expire.
#[derive(Debug)]
#[must_use = "an unreleased lock stalls waiters until its TTL elapses"]
pub struct LockGuard {
    key: String,
    token: String,
}

impl LockGuard {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Clone)]
pub struct StampedeLock {
    store: SharedStore,
    ttl: Duration,
}

impl StampedeLock {
    #[must_use]
    pub fn new(store: SharedStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// One atomic set-if-absent attempt. `Some` means this caller is now the
    /// exclusive fetcher for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable.
    pub async fn try_acquire(&self, key: &CacheKey) -> Result<Option<LockGuard>, StoreError> {
        let lock_key = key.lock_key();
        let token = Uuid::new_v4().to_string();
        let acquired = self
            .store
            .set_if_absent_with_ttl(&lock_key, token.as_bytes(), self.ttl)
            .await?;

        if acquired {
            tracing::debug!(lock = %lock_key, ttl_secs = self.ttl.as_secs(), "lock acquired");
            Ok(Some(LockGuard {
                key: lock_key,
                token,
            }))
        } else {
            tracing::debug!(lock = %lock_key, "lock contended");
            Ok(None)
        }
    }

    /// Releases `guard` if this caller still owns it. Returns `false` when
    /// the lock had already expired or been taken over.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable.
    pub async fn release(&self, guard: LockGuard) -> Result<bool, StoreError> {
        let released = self
            .store
            .delete_if_equals(&guard.key, guard.token.as_bytes())
            .await?;
        if released {
            tracing::debug!(lock = %guard.key, "lock released");
        } else {
            tracing::warn!(
                lock = %guard.key,
                "lock release skipped: no longer held by this caller"
            );
        }
        Ok(released)
    }
}
