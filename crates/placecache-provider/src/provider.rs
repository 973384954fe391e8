use async_trait::async_trait;
use placecache_core::Coordinate;

use crate::error::ProviderError;
use crate::types::{GeocodedAddress, NearbyPlace, NearbySearch};

/// The three upstream capabilities the lookup layer depends on.
///
/// [`crate::MapsClient`] is the HTTP implementation; tests substitute stubs.
#[async_trait]
pub trait MapsProvider: Send + Sync {
    /// Places around a point. An empty vector is a successful empty answer.
    async fn nearby_search(&self, request: &NearbySearch)
        -> Result<Vec<NearbyPlace>, ProviderError>;

    /// Addresses at a point. An empty vector is a successful empty answer.
    async fn reverse_geocode(&self, point: Coordinate)
        -> Result<Vec<GeocodedAddress>, ProviderError>;

    /// Driving distance in metres along the first returned route.
    async fn route_distance(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<f64, ProviderError>;
}
