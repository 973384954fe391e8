use crate::app_config::{AppConfig, Environment, LockWaitPolicy};
use crate::filters::{load_filter_profile, FilterProfile};
use crate::ConfigError;

/// Largest grid resolution accepted for the coordinate normalizer.
const MAX_GRID_DECIMALS: u32 = 6;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the real environment so tests can
/// drive this with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let maps_api_key = require("MAPS_API_KEY")?;

    let env = parse_environment(&or_default("PLACECACHE_ENV", "development"))?;
    let bind_addr = or_default("PLACECACHE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("PLACECACHE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("PLACECACHE_LOG_LEVEL", "info");
    let store_url = or_default("PLACECACHE_STORE_URL", "redis://127.0.0.1:6379");
    let maps_base_url = or_default(
        "PLACECACHE_MAPS_BASE_URL",
        "https://maps.googleapis.com/maps/api/",
    );

    let upstream_timeout_secs = parse_u64("PLACECACHE_UPSTREAM_TIMEOUT_SECS", "10")?;
    let grid_decimals = parse_u32("PLACECACHE_GRID_DECIMALS", "3")?;
    let places_ttl_secs = parse_u64("PLACECACHE_PLACES_TTL_SECS", "3600")?;
    let empty_places_ttl_secs = parse_u64("PLACECACHE_EMPTY_PLACES_TTL_SECS", "300")?;
    let directions_ttl_secs = parse_u64("PLACECACHE_DIRECTIONS_TTL_SECS", "86400")?;
    let lock_ttl_secs = parse_u64("PLACECACHE_LOCK_TTL_SECS", "8")?;
    let lock_poll_interval_ms = parse_u64("PLACECACHE_LOCK_POLL_INTERVAL_MS", "200")?;
    let lock_max_wait_ms = parse_u64("PLACECACHE_LOCK_MAX_WAIT_MS", "5000")?;
    let lock_wait_policy =
        parse_lock_wait_policy(&or_default("PLACECACHE_LOCK_WAIT_POLICY", "fetch"))?;
    let max_results = parse_usize("PLACECACHE_MAX_RESULTS", "10")?;
    let relaxed_radius_m = parse_u32("PLACECACHE_RELAXED_RADIUS_M", "1000")?;
    let wide_radius_m = parse_u32("PLACECACHE_WIDE_RADIUS_M", "5000")?;
    let rate_limit_per_minute = parse_usize("PLACECACHE_RATE_LIMIT_PER_MINUTE", "120")?;

    let filters_path = lookup("PLACECACHE_FILTERS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let filters = match &filters_path {
        Some(path) => load_filter_profile(path)?,
        None => FilterProfile::default(),
    };

    let config = AppConfig {
        env,
        bind_addr,
        log_level,
        maps_api_key,
        maps_base_url,
        store_url,
        upstream_timeout_secs,
        grid_decimals,
        places_ttl_secs,
        empty_places_ttl_secs,
        directions_ttl_secs,
        lock_ttl_secs,
        lock_poll_interval_ms,
        lock_max_wait_ms,
        lock_wait_policy,
        max_results,
        relaxed_radius_m,
        wide_radius_m,
        filters_path,
        filters,
        rate_limit_per_minute,
    };

    validate_app_config(&config)?;
    Ok(config)
}

/// Cross-field checks that single-variable parsing cannot express.
fn validate_app_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.lock_ttl_secs == 0 {
        return Err(ConfigError::Validation(
            "PLACECACHE_LOCK_TTL_SECS must be at least 1".to_string(),
        ));
    }

    // A crashed fetcher holds the lock for its whole TTL, so the TTL has to
    // expire before a healthy upstream call would have timed out.
    if config.lock_ttl_secs >= config.upstream_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "lock TTL ({}s) must be strictly shorter than the upstream timeout ({}s)",
            config.lock_ttl_secs, config.upstream_timeout_secs
        )));
    }

    if config.lock_poll_interval_ms == 0 || config.lock_poll_interval_ms > config.lock_max_wait_ms
    {
        return Err(ConfigError::Validation(format!(
            "lock poll interval ({}ms) must be between 1ms and the max wait ({}ms)",
            config.lock_poll_interval_ms, config.lock_max_wait_ms
        )));
    }

    if config.max_results == 0 {
        return Err(ConfigError::Validation(
            "PLACECACHE_MAX_RESULTS must be at least 1".to_string(),
        ));
    }

    if config.grid_decimals > MAX_GRID_DECIMALS {
        return Err(ConfigError::Validation(format!(
            "PLACECACHE_GRID_DECIMALS must be at most {MAX_GRID_DECIMALS}, got {}",
            config.grid_decimals
        )));
    }

    if config.relaxed_radius_m == 0 || config.wide_radius_m < config.relaxed_radius_m {
        return Err(ConfigError::Validation(format!(
            "search radii must satisfy 0 < relaxed ({}m) <= wide ({}m)",
            config.relaxed_radius_m, config.wide_radius_m
        )));
    }

    Ok(())
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLACECACHE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_lock_wait_policy(s: &str) -> Result<LockWaitPolicy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "fail" => Ok(LockWaitPolicy::Fail),
        "fetch" => Ok(LockWaitPolicy::Fetch),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLACECACHE_LOCK_WAIT_POLICY".to_string(),
            reason: format!("expected 'fail' or 'fetch', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
