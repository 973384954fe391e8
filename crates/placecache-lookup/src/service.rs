//! Cache-aside coordinator.
//!
//! Per query: read the cache; on a miss take the per-key fetch lock, check
//! the cache once more, resolve (planner, ranker, fallback), write the result
//! and release. Callers that lose the lock poll the cache until it fills or
//! the wait bound elapses, then apply the configured [`LockWaitPolicy`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use placecache_core::{
    CacheKey, CacheKeyBuilder, CoordinateNormalizer, DirectionQuery, DirectionResult,
    DistanceSource, GeoQuery, LockWaitPolicy, PlaceResult,
};
use placecache_provider::MapsProvider;
use placecache_store::{ResultStore, SharedStore, StampedeLock, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;

use crate::error::LookupError;
use crate::fallback;
use crate::planner::{PlanOutcome, QueryPlanner};
use crate::ranker::ResultRanker;
use crate::settings::LookupSettings;

struct Resolved<T> {
    value: T,
    from_cache: bool,
}

impl<T> Resolved<T> {
    fn cached(value: T) -> Self {
        Self {
            value,
            from_cache: true,
        }
    }

    fn fetched(value: T) -> Self {
        Self {
            value,
            from_cache: false,
        }
    }
}

pub struct LookupService {
    store: SharedStore,
    results: ResultStore,
    lock: StampedeLock,
    keys: CacheKeyBuilder,
    provider: Arc<dyn MapsProvider>,
    planner: QueryPlanner,
    ranker: ResultRanker,
    settings: LookupSettings,
}

impl LookupService {
    #[must_use]
    pub fn new(
        store: SharedStore,
        provider: Arc<dyn MapsProvider>,
        settings: LookupSettings,
    ) -> Self {
        Self {
            results: ResultStore::new(store.clone()),
            lock: StampedeLock::new(store.clone(), settings.lock_ttl),
            keys: CacheKeyBuilder::new(CoordinateNormalizer::new(settings.grid_decimals)),
            planner: QueryPlanner::new(
                provider.clone(),
                settings.relaxed_radius_m,
                settings.wide_radius_m,
                settings.upstream_timeout,
            ),
            ranker: ResultRanker::new(settings.filters.clone(), settings.max_results),
            store,
            provider,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &LookupSettings {
        &self.settings
    }

    #[must_use]
    pub fn keys(&self) -> &CacheKeyBuilder {
        &self.keys
    }

    /// Round-trips the shared store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unreachable.
    pub async fn ping_store(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    /// Closes the shared store connection. Call once, after the last lookup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails to shut down cleanly.
    pub async fn close_store(&self) -> Result<(), StoreError> {
        self.store.close().await
    }

    /// Nearby places for `query`, ranked by distance from its origin.
    ///
    /// Upstream failures never surface: the answer degrades to relaxed
    /// stages, the raw candidate set, geocoding reconstruction, and finally an
    /// empty list.
    ///
    /// # Errors
    ///
    /// [`LookupError::Validation`] for a malformed query,
    /// [`LookupError::LockWaitExhausted`] under the `fail` wait policy, and
    /// [`LookupError::Store`] when the store is unreachable.
    pub async fn search_places(&self, query: &GeoQuery) -> Result<Vec<PlaceResult>, LookupError> {
        query.validate()?;
        let key = self.keys.places_key(query);
        let resolved = self
            .cache_aside(
                &key,
                |places: &Vec<PlaceResult>| {
                    if places.is_empty() {
                        self.settings.empty_places_ttl
                    } else {
                        self.settings.places_ttl
                    }
                },
                || self.resolve_places(query),
            )
            .await?;
        Ok(resolved.value)
    }

    /// Route distance for `query` in its requested unit.
    ///
    /// Always yields a finite distance when the store is healthy: a failed
    /// route lookup falls back to the great-circle estimate.
    ///
    /// # Errors
    ///
    /// Same as [`LookupService::search_places`].
    pub async fn directions_distance(
        &self,
        query: &DirectionQuery,
    ) -> Result<DirectionResult, LookupError> {
        query.validate()?;
        let key = self.keys.directions_key(query);
        let directions_ttl = self.settings.directions_ttl;
        let resolved = self
            .cache_aside(
                &key,
                |_: &DirectionResult| directions_ttl,
                || self.resolve_directions(query),
            )
            .await?;

        let mut result = resolved.value;
        if resolved.from_cache {
            result.source = DistanceSource::Cache;
        }
        Ok(result)
    }

    async fn cache_aside<T, Ttl, Fetch, Fut>(
        &self,
        key: &CacheKey,
        ttl_for: Ttl,
        fetch: Fetch,
    ) -> Result<Resolved<T>, LookupError>
    where
        T: Serialize + DeserializeOwned,
        Ttl: Fn(&T) -> Duration,
        Fetch: Fn() -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(hit) = self.results.get::<T>(key).await? {
            tracing::debug!(key = %key, "cache hit");
            return Ok(Resolved::cached(hit));
        }
        tracing::debug!(key = %key, "cache miss");

        if let Some(guard) = self.lock.try_acquire(key).await? {
            // Another fetcher may have filled the entry between our read and
            // the acquire.
            let rechecked = match self.results.get::<T>(key).await {
                Ok(hit) => hit,
                Err(e) => {
                    self.release_quietly(guard).await;
                    return Err(e.into());
                }
            };
            if let Some(hit) = rechecked {
                tracing::debug!(key = %key, "cache filled while acquiring lock");
                self.lock.release(guard).await?;
                return Ok(Resolved::cached(hit));
            }

            let value = fetch().await;
            let written = self.results.put(key, &value, ttl_for(&value)).await;
            let released = self.lock.release(guard).await;
            written?;
            released?;
            return Ok(Resolved::fetched(value));
        }

        if let Some(hit) = self.wait_for_fill::<T>(key).await? {
            tracing::debug!(key = %key, "cache filled by lock holder");
            return Ok(Resolved::cached(hit));
        }

        let waited_ms = u64::try_from(self.settings.lock_max_wait.as_millis()).unwrap_or(u64::MAX);
        match self.settings.lock_wait_policy {
            LockWaitPolicy::Fail => {
                tracing::warn!(key = %key, waited_ms, "lock wait exhausted; failing request");
                Err(LookupError::LockWaitExhausted {
                    key: key.to_string(),
                    waited_ms,
                })
            }
            LockWaitPolicy::Fetch => {
                tracing::warn!(key = %key, waited_ms, "lock wait exhausted; fetching redundantly");
                let value = fetch().await;
                self.results.put(key, &value, ttl_for(&value)).await?;
                Ok(Resolved::fetched(value))
            }
        }
    }

    /// Polls the cache at the configured interval until it holds `key` or the
    /// wait bound elapses.
    async fn wait_for_fill<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> Result<Option<T>, LookupError> {
        let deadline = Instant::now() + self.settings.lock_max_wait;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(self.settings.lock_poll_interval.min(deadline - now)).await;
            if let Some(hit) = self.results.get::<T>(key).await? {
                return Ok(Some(hit));
            }
        }
    }

    async fn release_quietly(&self, guard: placecache_store::LockGuard) {
        if let Err(e) = self.lock.release(guard).await {
            tracing::warn!(error = %e, "failed to release lock");
        }
    }

    async fn resolve_places(&self, query: &GeoQuery) -> Vec<PlaceResult> {
        let origin = query.origin();
        match self.planner.plan(query, &self.ranker).await {
            Ok(PlanOutcome::Matched { stage, places }) => {
                tracing::info!(stage, candidates = places.len(), "places resolved upstream");
                self.ranker.rank(origin, places)
            }
            Ok(PlanOutcome::Unfiltered { places }) => {
                tracing::info!(candidates = places.len(), "places resolved from raw candidates");
                self.ranker.rank(origin, places)
            }
            Ok(PlanOutcome::Exhausted) => {
                tracing::info!(
                    mode = %query.mode,
                    "no usable candidates; geocode fallback engaged"
                );
                self.geocode_fallback(query).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "nearby search failed; geocode fallback engaged");
                self.geocode_fallback(query).await
            }
        }
    }

    async fn geocode_fallback(&self, query: &GeoQuery) -> Vec<PlaceResult> {
        fallback::geocode_neighborhood(
            self.provider.as_ref(),
            query.origin(),
            self.settings.max_results,
            self.settings.upstream_timeout,
        )
        .await
    }

    async fn resolve_directions(&self, query: &DirectionQuery) -> DirectionResult {
        let call = self
            .provider
            .route_distance(query.origin, query.destination);
        match tokio::time::timeout(self.settings.upstream_timeout, call).await {
            Ok(Ok(meters)) if meters.is_finite() && meters >= 0.0 => {
                return DirectionResult {
                    distance: query.unit.from_meters(meters),
                    source: DistanceSource::Provider,
                };
            }
            Ok(Ok(meters)) => {
                tracing::warn!(meters, "provider returned an unusable distance");
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "route distance failed");
            }
            Err(_) => {
                tracing::warn!("route distance timed out");
            }
        }

        tracing::info!("distance estimate fallback engaged");
        DirectionResult {
            distance: fallback::estimate_distance(query.origin, query.destination, query.unit),
            source: DistanceSource::Estimated,
        }
    }
}
