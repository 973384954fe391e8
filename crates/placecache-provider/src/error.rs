use thiserror::Error;

/// Errors returned by the maps provider client.
///
/// Callers in the lookup layer treat every variant the same way: as an
/// upstream failure that engages the fallback chain.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured bound.
    #[error("upstream request timed out after {0}s")]
    Timeout(u64),

    /// The provider answered with a non-success `status` field.
    #[error("maps API error {status}: {message}")]
    Api { status: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
