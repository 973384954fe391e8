//! Process-local store with TTL expiry.
//!
//! Expired entries are dropped when read and swept from the whole map on
//! writes, at most once per [`SWEEP_INTERVAL`], so keys that are never read
//! again do not accumulate.
//!
//! Expiry uses `tokio::time::Instant` so tests running under a paused clock
//! can advance past a TTL without sleeping.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::backend::KeyValueStore;
use crate::error::StoreError;

/// Minimum spacing between full sweeps of expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn new(value: &[u8], ttl: Duration) -> Self {
        Self {
            value: value.to_vec(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug)]
struct Entries {
    map: HashMap<String, Entry>,
    last_sweep: Instant,
}

impl Entries {
    fn sweep_if_due(&mut self, now: Instant) {
        if now.duration_since(self.last_sweep) < SWEEP_INTERVAL {
            return;
        }
        let before = self.map.len();
        self.map.retain(|_, e| e.is_live(now));
        self.last_sweep = now;
        let removed = before - self.map.len();
        if removed > 0 {
            tracing::trace!(removed, "swept expired memory store entries");
        }
    }
}

/// In-memory [`KeyValueStore`]. Clones share the same map.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<Entries>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Entries {
                map: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .map
            .values()
            .filter(|e| e.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.map.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.map.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &[u8],
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.sweep_if_due(now);
        entries.map.insert(key.to_string(), Entry::new(value, ttl));
        Ok(())
    }

    async fn set_if_absent_with_ttl(
        &self,
        key: &str,
        value: &[u8],
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.sweep_if_due(now);
        if entries.map.get(key).is_some_and(|e| e.is_live(now)) {
            return Ok(false);
        }
        entries.map.insert(key.to_string(), Entry::new(value, ttl));
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().await.map.remove(key);
        Ok(())
    }

    async fn delete_if_equals(&self, key: &str, expected: &[u8]) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let matches = entries
            .map
            .get(key)
            .is_some_and(|e| e.is_live(now) && e.value == expected);
        if matches {
            entries.map.remove(key);
        }
        Ok(matches)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = MemoryStore::new();
        store
            .set_with_ttl("k", b"payload", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"payload".to_vec()));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let store = MemoryStore::new();
        store
            .set_with_ttl("k", b"v", Duration::from_secs(2))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_millis(1_999)).await;
        assert!(store.get("k").await.unwrap().is_some());
        tokio::time::advance(Duration::from_millis(2)).await;
        assert!(store.get("k").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn set_if_absent_only_writes_once() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);
        assert!(store.set_if_absent_with_ttl("lock", b"a", ttl).await.unwrap());
        assert!(!store.set_if_absent_with_ttl("lock", b"b", ttl).await.unwrap());
        assert_eq!(store.get("lock").await.unwrap(), Some(b"a".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn set_if_absent_succeeds_after_expiry() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(1);
        assert!(store.set_if_absent_with_ttl("lock", b"a", ttl).await.unwrap());
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(store.set_if_absent_with_ttl("lock", b"b", ttl).await.unwrap());
    }

    #[tokio::test]
    async fn delete_if_equals_respects_marker() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);
        store.set_with_ttl("lock", b"owner-1", ttl).await.unwrap();
        assert!(!store.delete_if_equals("lock", b"owner-2").await.unwrap());
        assert!(store.get("lock").await.unwrap().is_some());
        assert!(store.delete_if_equals("lock", b"owner-1").await.unwrap());
        assert!(store.get("lock").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set_with_ttl("k", b"v", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(b.len().await, 1);
        b.delete("k").await.unwrap();
        assert!(a.get("k").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn writes_sweep_entries_that_are_never_read_again() {
        let store = MemoryStore::new();
        for i in 0..1_000 {
            store
                .set_with_ttl(&format!("cell:{i}"), b"v", Duration::from_secs(1))
                .await
                .unwrap();
        }
        tokio::time::advance(Duration::from_secs(5)).await;
        store
            .set_with_ttl("fresh", b"v", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.entries.lock().await.map.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_keeps_live_entries() {
        let store = MemoryStore::new();
        store
            .set_with_ttl("short", b"v", Duration::from_secs(1))
            .await
            .unwrap();
        store
            .set_with_ttl("long", b"v", Duration::from_secs(60))
            .await
            .unwrap();
        tokio::time::advance(SWEEP_INTERVAL * 2).await;
        assert!(store
            .set_if_absent_with_ttl("lock", b"t", Duration::from_secs(5))
            .await
            .unwrap());

        let held = store.entries.lock().await.map.len();
        assert_eq!(held, 2);
        assert!(store.get("long").await.unwrap().is_some());
    }
}
