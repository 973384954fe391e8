//! An unreachable store has no fallback and must surface.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{test_settings, StubProvider};
use placecache_core::{Coordinate, DirectionQuery, DistanceUnit, GeoQuery, QueryMode};
use placecache_lookup::{LookupError, LookupService};
use placecache_store::{KeyValueStore, StoreError};

struct DownStore;

fn refused() -> StoreError {
    StoreError::Redis(redis::RedisError::from((
        redis::ErrorKind::IoError,
        "connection refused",
    )))
}

#[async_trait]
impl KeyValueStore for DownStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(refused())
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: &[u8],
        _ttl: Duration,
    ) -> Result<(), StoreError> {
        Err(refused())
    }

    async fn set_if_absent_with_ttl(
        &self,
        _key: &str,
        _value: &[u8],
        _ttl: Duration,
    ) -> Result<bool, StoreError> {
        Err(refused())
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(refused())
    }

    async fn delete_if_equals(&self, _key: &str, _expected: &[u8]) -> Result<bool, StoreError> {
        Err(refused())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(refused())
    }
}

fn service(provider: Arc<StubProvider>) -> LookupService {
    LookupService::new(Arc::new(DownStore), provider, test_settings())
}

#[tokio::test]
async fn place_search_propagates_store_failure() {
    let provider = Arc::new(StubProvider::new());
    let svc = service(provider.clone());

    let err = svc
        .search_places(&GeoQuery::new(
            33.749,
            -84.388,
            None,
            None,
            QueryMode::FoodAndRetail,
        ))
        .await
        .expect_err("store is down");

    assert!(matches!(err, LookupError::Store(_)));
    assert_eq!(provider.nearby_call_count(), 0);
}

#[tokio::test]
async fn directions_propagate_store_failure() {
    let provider = Arc::new(StubProvider::new());
    let svc = service(provider.clone());

    let err = svc
        .directions_distance(&DirectionQuery {
            origin: Coordinate::new(33.749, -84.388),
            destination: Coordinate::new(35.227, -80.843),
            unit: DistanceUnit::Meters,
        })
        .await
        .expect_err("store is down");

    assert!(matches!(err, LookupError::Store(_)));
    assert_eq!(provider.route_call_count(), 0);
}

#[tokio::test]
async fn ping_reports_store_failure() {
    let svc = service(Arc::new(StubProvider::new()));
    assert!(svc.ping_store().await.is_err());
}
