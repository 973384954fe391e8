//! Shared fixtures: a scriptable, call-counting provider and store wiring.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use placecache_core::{Coordinate, LockWaitPolicy};
use placecache_lookup::{LookupService, LookupSettings};
use placecache_provider::{GeocodedAddress, MapsProvider, NearbyPlace, NearbySearch, ProviderError};
use placecache_store::MemoryStore;

type NearbyFn = dyn Fn(&NearbySearch) -> Result<Vec<NearbyPlace>, ProviderError> + Send + Sync;
type GeocodeFn =
    dyn Fn(usize, Coordinate) -> Result<Vec<GeocodedAddress>, ProviderError> + Send + Sync;
type RouteFn = dyn Fn(Coordinate, Coordinate) -> Result<f64, ProviderError> + Send + Sync;

/// Provider stub. Every capability answers empty/zero unless scripted.
pub struct StubProvider {
    nearby: Box<NearbyFn>,
    geocode: Box<GeocodeFn>,
    route: Box<RouteFn>,
    delay: Duration,
    nearby_calls: Mutex<Vec<NearbySearch>>,
    geocode_calls: AtomicUsize,
    route_calls: AtomicUsize,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            nearby: Box::new(|_| Ok(Vec::new())),
            geocode: Box::new(|_, _| Ok(Vec::new())),
            route: Box::new(|_, _| Ok(0.0)),
            delay: Duration::ZERO,
            nearby_calls: Mutex::new(Vec::new()),
            geocode_calls: AtomicUsize::new(0),
            route_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_nearby(
        mut self,
        f: impl Fn(&NearbySearch) -> Result<Vec<NearbyPlace>, ProviderError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.nearby = Box::new(f);
        self
    }

    /// `f` receives the 0-based call index and the probed point.
    pub fn with_geocode(
        mut self,
        f: impl Fn(usize, Coordinate) -> Result<Vec<GeocodedAddress>, ProviderError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.geocode = Box::new(f);
        self
    }

    pub fn with_route(
        mut self,
        f: impl Fn(Coordinate, Coordinate) -> Result<f64, ProviderError> + Send + Sync + 'static,
    ) -> Self {
        self.route = Box::new(f);
        self
    }

    /// Delays every call, to hold the fetch lock or trip the call timeout.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn nearby_calls(&self) -> Vec<NearbySearch> {
        self.nearby_calls.lock().expect("poisoned").clone()
    }

    pub fn nearby_call_count(&self) -> usize {
        self.nearby_calls.lock().expect("poisoned").len()
    }

    pub fn geocode_call_count(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub fn route_call_count(&self) -> usize {
        self.route_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl MapsProvider for StubProvider {
    async fn nearby_search(
        &self,
        request: &NearbySearch,
    ) -> Result<Vec<NearbyPlace>, ProviderError> {
        self.nearby_calls
            .lock()
            .expect("poisoned")
            .push(request.clone());
        self.pause().await;
        (self.nearby)(request)
    }

    async fn reverse_geocode(
        &self,
        point: Coordinate,
    ) -> Result<Vec<GeocodedAddress>, ProviderError> {
        let index = self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        (self.geocode)(index, point)
    }

    async fn route_distance(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<f64, ProviderError> {
        self.route_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        (self.route)(origin, destination)
    }
}

pub fn api_error() -> ProviderError {
    ProviderError::Api {
        status: "UNKNOWN_ERROR".into(),
        message: "stubbed failure".into(),
    }
}

pub fn place(id: &str, name: &str, types: &[&str], lat: f64, lng: f64) -> NearbyPlace {
    NearbyPlace {
        place_id: id.into(),
        name: name.into(),
        vicinity: Some(format!("{name} vicinity")),
        location: Coordinate::new(lat, lng),
        rating: None,
        types: types.iter().map(|t| (*t).to_string()).collect(),
    }
}

pub fn address(id: &str, text: &str) -> GeocodedAddress {
    GeocodedAddress {
        place_id: id.into(),
        formatted_address: text.into(),
    }
}

/// Production semantics with short waits so lock tests finish quickly.
pub fn test_settings() -> LookupSettings {
    LookupSettings {
        lock_ttl: Duration::from_secs(2),
        lock_poll_interval: Duration::from_millis(20),
        lock_max_wait: Duration::from_millis(2_000),
        lock_wait_policy: LockWaitPolicy::Fetch,
        upstream_timeout: Duration::from_secs(3),
        ..LookupSettings::default()
    }
}

pub struct Harness {
    pub service: Arc<LookupService>,
    pub provider: Arc<StubProvider>,
    pub store: MemoryStore,
}

pub fn harness(provider: StubProvider, settings: LookupSettings) -> Harness {
    let provider = Arc::new(provider);
    let store = MemoryStore::new();
    let service = Arc::new(LookupService::new(
        Arc::new(store.clone()),
        provider.clone(),
        settings,
    ));
    Harness {
        service,
        provider,
        store,
    }
}
