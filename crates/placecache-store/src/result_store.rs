use std::time::Duration;

use placecache_core::CacheKey;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::SharedStore;
use crate::error::StoreError;

/// Typed JSON view over the shared store for cached result payloads.
///
/// Entries are always written whole; nothing is updated in place.
#[derive(Clone)]
pub struct ResultStore {
    store: SharedStore,
}

impl ResultStore {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Reads and decodes the payload at `key`.
    ///
    /// A payload that no longer decodes as `T` is reported as a miss so the
    /// caller refetches and overwrites it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only when the backend itself fails.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>, StoreError> {
        let Some(bytes) = self.store.get(key.as_str()).await? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "discarding undecodable cache entry");
                Ok(None)
            }
        }
    }

    /// Serializes `value` and overwrites `key` with the given TTL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if `value` cannot be serialized, or the
    /// backend error if the write fails.
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::Encode {
            key: key.to_string(),
            source: e,
        })?;
        self.store.set_with_ttl(key.as_str(), &bytes, ttl).await?;
        tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "cache entry written");
        Ok(())
    }
}
