use std::time::Duration;

use placecache_core::{AppConfig, FilterProfile, LockWaitPolicy};

/// Every tunable the lookup layer reads, resolved once at startup.
#[derive(Debug, Clone)]
pub struct LookupSettings {
    pub grid_decimals: u32,
    pub places_ttl: Duration,
    /// TTL for a place search that resolved to no results at all.
    pub empty_places_ttl: Duration,
    pub directions_ttl: Duration,
    pub lock_ttl: Duration,
    pub lock_poll_interval: Duration,
    pub lock_max_wait: Duration,
    pub lock_wait_policy: LockWaitPolicy,
    /// Bound on each individual upstream call.
    pub upstream_timeout: Duration,
    pub max_results: usize,
    /// Radius floor of the relaxed (category-free) planner stage.
    pub relaxed_radius_m: u32,
    /// Fixed radius of the widest planner stage.
    pub wide_radius_m: u32,
    pub filters: FilterProfile,
}

impl LookupSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            grid_decimals: config.grid_decimals,
            places_ttl: Duration::from_secs(config.places_ttl_secs),
            empty_places_ttl: Duration::from_secs(config.empty_places_ttl_secs),
            directions_ttl: Duration::from_secs(config.directions_ttl_secs),
            lock_ttl: config.lock_ttl(),
            lock_poll_interval: config.lock_poll_interval(),
            lock_max_wait: config.lock_max_wait(),
            lock_wait_policy: config.lock_wait_policy,
            upstream_timeout: config.upstream_timeout(),
            max_results: config.max_results,
            relaxed_radius_m: config.relaxed_radius_m,
            wide_radius_m: config.wide_radius_m,
            filters: config.filters.clone(),
        }
    }
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            grid_decimals: placecache_core::geo::DEFAULT_GRID_DECIMALS,
            places_ttl: Duration::from_secs(3_600),
            empty_places_ttl: Duration::from_secs(300),
            directions_ttl: Duration::from_secs(86_400),
            lock_ttl: Duration::from_secs(8),
            lock_poll_interval: Duration::from_millis(200),
            lock_max_wait: Duration::from_millis(5_000),
            lock_wait_policy: LockWaitPolicy::Fetch,
            upstream_timeout: Duration::from_secs(10),
            max_results: 10,
            relaxed_radius_m: 1_000,
            wide_radius_m: 5_000,
            filters: FilterProfile::default(),
        }
    }
}
