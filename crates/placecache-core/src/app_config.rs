use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::filters::FilterProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// What a caller that lost the stampede lock does once its wait bound elapses
/// without the cache being filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockWaitPolicy {
    /// Surface a lock-wait-exhausted error to the caller.
    Fail,
    /// Fetch from upstream anyway, accepting a redundant call.
    Fetch,
}

impl std::fmt::Display for LockWaitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockWaitPolicy::Fail => write!(f, "fail"),
            LockWaitPolicy::Fetch => write!(f, "fetch"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub maps_api_key: String,
    pub maps_base_url: String,
    pub store_url: String,
    pub upstream_timeout_secs: u64,
    pub grid_decimals: u32,
    pub places_ttl_secs: u64,
    pub empty_places_ttl_secs: u64,
    pub directions_ttl_secs: u64,
    pub lock_ttl_secs: u64,
    pub lock_poll_interval_ms: u64,
    pub lock_max_wait_ms: u64,
    pub lock_wait_policy: LockWaitPolicy,
    pub max_results: usize,
    pub relaxed_radius_m: u32,
    pub wide_radius_m: u32,
    pub filters_path: Option<PathBuf>,
    pub filters: FilterProfile,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    #[must_use]
    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }

    #[must_use]
    pub fn lock_poll_interval(&self) -> Duration {
        Duration::from_millis(self.lock_poll_interval_ms)
    }

    #[must_use]
    pub fn lock_max_wait(&self) -> Duration {
        Duration::from_millis(self.lock_max_wait_ms)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("maps_api_key", &"[redacted]")
            .field("maps_base_url", &self.maps_base_url)
            .field("store_url", &"[redacted]")
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("grid_decimals", &self.grid_decimals)
            .field("places_ttl_secs", &self.places_ttl_secs)
            .field("empty_places_ttl_secs", &self.empty_places_ttl_secs)
            .field("directions_ttl_secs", &self.directions_ttl_secs)
            .field("lock_ttl_secs", &self.lock_ttl_secs)
            .field("lock_poll_interval_ms", &self.lock_poll_interval_ms)
            .field("lock_max_wait_ms", &self.lock_max_wait_ms)
            .field("lock_wait_policy", &self.lock_wait_policy)
            .field("max_results", &self.max_results)
            .field("relaxed_radius_m", &self.relaxed_radius_m)
            .field("wide_radius_m", &self.wide_radius_m)
            .field("filters_path", &self.filters_path)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish_non_exhaustive()
    }
}
