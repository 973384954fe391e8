//! Process wiring shared by the server and CLI binaries.

use std::sync::Arc;

use placecache_core::AppConfig;
use placecache_provider::{MapsClient, ProviderError};
use placecache_store::StoreError;
use thiserror::Error;

use crate::service::LookupService;
use crate::settings::LookupSettings;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build maps client: {0}")]
    Provider(#[from] ProviderError),
}

/// Opens the configured store and maps client and assembles a
/// [`LookupService`] over them.
///
/// # Errors
///
/// Returns [`BootstrapError`] if the store is unreachable or the provider
/// base URL is invalid.
pub async fn build_lookup_service(config: &AppConfig) -> Result<LookupService, BootstrapError> {
    let store = placecache_store::connect(&config.store_url).await?;
    let provider = MapsClient::with_base_url(
        &config.maps_api_key,
        config.upstream_timeout_secs,
        &config.maps_base_url,
    )?;
    tracing::debug!(store_url = %redact_url(&config.store_url), "lookup service wired");
    Ok(LookupService::new(
        store,
        Arc::new(provider),
        LookupSettings::from_app_config(config),
    ))
}

/// Drops any `user:password@` section from a store URL before it is logged.
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***@{}", &url[..scheme_end], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::redact_url;

    #[test]
    fn redacts_credentials() {
        assert_eq!(
            redact_url("redis://:hunter2@cache.internal:6379/0"),
            "redis://***@cache.internal:6379/0"
        );
    }

    #[test]
    fn leaves_plain_urls_alone() {
        assert_eq!(redact_url("redis://127.0.0.1:6379"), "redis://127.0.0.1:6379");
        assert_eq!(redact_url("memory://"), "memory://");
    }
}
