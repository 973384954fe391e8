//! Versioned cache-key construction.
//!
//! Every cached payload is addressed by exactly one key shape:
//!
//! `{domain}:{version}:{normalized-lat}:{normalized-lng}:{radius}:{discriminator}`
//!
//! Bump [`KEY_VERSION`] whenever a cached payload changes shape so entries
//! written by older builds are never decoded as the new shape.

use crate::geo::CoordinateNormalizer;
use crate::types::{DirectionQuery, GeoQuery};

pub const KEY_VERSION: &str = "v1";

const PLACES_DOMAIN: &str = "places";
const DIRECTIONS_DOMAIN: &str = "directions";
const LOCK_PREFIX: &str = "lock:";

/// Opaque, deterministic key for one cached result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the stampede lock guarding this entry.
    #[must_use]
    pub fn lock_key(&self) -> String {
        format!("{LOCK_PREFIX}{}", self.0)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheKeyBuilder {
    normalizer: CoordinateNormalizer,
}

impl CacheKeyBuilder {
    #[must_use]
    pub fn new(normalizer: CoordinateNormalizer) -> Self {
        Self { normalizer }
    }

    #[must_use]
    pub fn places_key(&self, query: &GeoQuery) -> CacheKey {
        let origin = self.normalizer.normalize(query.latitude, query.longitude);
        let category = query
            .category
            .as_deref()
            .map_or_else(|| "*".to_string(), sanitize_segment);
        CacheKey(format!(
            "{PLACES_DOMAIN}:{KEY_VERSION}:{}:{}:{}:cat={category}|mode={}",
            origin.lat_segment(),
            origin.lng_segment(),
            query.radius,
            query.mode.as_key_segment(),
        ))
    }

    /// Direction keys have no radius; the segment is fixed at `0` and the
    /// destination and unit live in the discriminator.
    #[must_use]
    pub fn directions_key(&self, query: &DirectionQuery) -> CacheKey {
        let origin = self
            .normalizer
            .normalize(query.origin.latitude, query.origin.longitude);
        let destination = self
            .normalizer
            .normalize(query.destination.latitude, query.destination.longitude);
        CacheKey(format!(
            "{DIRECTIONS_DOMAIN}:{KEY_VERSION}:{}:{}:0:to={},{}|unit={}",
            origin.lat_segment(),
            origin.lng_segment(),
            destination.lat_segment(),
            destination.lng_segment(),
            query.unit.as_key_segment(),
        ))
    }
}

/// Lower-cases and replaces anything outside `[a-z0-9_-]` so caller-supplied
/// text can never inject a segment separator.
fn sanitize_segment(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
