//! Shared key-value store access for the lookup layer.
//!
//! Everything persisted by the service lives behind [`KeyValueStore`]: cached
//! result payloads (via [`ResultStore`]) and stampede locks (via
//! [`StampedeLock`]). Both ride entirely on the backend's own TTL expiry.

pub mod backend;
pub mod error;
pub mod lock;
pub mod memory;
pub mod redis_store;
pub mod result_store;

pub use backend::{connect, KeyValueStore, SharedStore};
pub use error::StoreError;
pub use lock::{LockGuard, StampedeLock};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use result_store::ResultStore;
