use thiserror::Error;

/// Failures of the shared store itself. None of these have a fallback.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("store connection has been closed")]
    Closed,

    #[error("unsupported store url '{0}': expected redis://, rediss:// or memory://")]
    UnsupportedUrl(String),

    #[error("failed to encode payload for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
