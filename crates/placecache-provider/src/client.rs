//! HTTP client for the maps provider REST API.
//!
//! Wraps `reqwest` with API key management, per-request timeouts, and typed
//! response decoding. Every endpoint checks the `"status"` field of the JSON
//! body: `OK` carries data, `ZERO_RESULTS` is an empty answer for place and
//! geocode lookups, and anything else surfaces as [`ProviderError::Api`].

use std::time::Duration;

use async_trait::async_trait;
use placecache_core::Coordinate;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::provider::MapsProvider;
use crate::types::{
    DirectionsResponse, GeocodeResponse, GeocodedAddress, NearbyPlace, NearbySearch,
    NearbySearchResponse,
};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

const NEARBY_SEARCH_PATH: &str = "place/nearbysearch/json";
const GEOCODE_PATH: &str = "geocode/json";
const DIRECTIONS_PATH: &str = "directions/json";

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Client for the maps provider.
///
/// Use [`MapsClient::new`] for production or [`MapsClient::with_base_url`] to
/// point at a mock server in tests.
pub struct MapsClient {
    client: Client,
    api_key: String,
    base_url: Url,
    timeout_secs: u64,
}

impl MapsClient {
    /// Creates a client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (a proxy, or wiremock in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ProviderError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(5)))
            .user_agent("placecache/0.1")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends endpoint paths
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            timeout_secs,
        })
    }

    /// Builds the endpoint URL with percent-encoded query parameters and the
    /// API key appended last.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ProviderError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and decodes the body.
    ///
    /// The URL carries the API key, so it is stripped from every transport
    /// error and only the endpoint path is used as error context.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ProviderError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout_secs)
            } else {
                ProviderError::Http(e.without_url())
            }
        })?;
        let response = response
            .error_for_status()
            .map_err(|e| ProviderError::Http(e.without_url()))?;
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    /// Returns `Ok(true)` for data, `Ok(false)` for an empty answer the
    /// endpoint allows, and an error for everything else.
    fn check_status(
        status: &str,
        error_message: Option<&str>,
        zero_results_is_empty: bool,
    ) -> Result<bool, ProviderError> {
        match status {
            STATUS_OK => Ok(true),
            STATUS_ZERO_RESULTS if zero_results_is_empty => Ok(false),
            other => Err(ProviderError::Api {
                status: other.to_string(),
                message: error_message.unwrap_or("no error message").to_string(),
            }),
        }
    }
}

fn lat_lng(point: Coordinate) -> String {
    format!("{},{}", point.latitude, point.longitude)
}

#[async_trait]
impl MapsProvider for MapsClient {
    async fn nearby_search(
        &self,
        request: &NearbySearch,
    ) -> Result<Vec<NearbyPlace>, ProviderError> {
        let location = lat_lng(request.location);
        let radius = request.radius.to_string();
        let mut params = vec![("location", location.as_str()), ("radius", radius.as_str())];
        if let Some(category) = request.category.as_deref() {
            params.push(("type", category));
        }

        let url = self.build_url(NEARBY_SEARCH_PATH, &params)?;
        let body: NearbySearchResponse = self.request_json(url, NEARBY_SEARCH_PATH).await?;
        if !Self::check_status(&body.status, body.error_message.as_deref(), true)? {
            return Ok(Vec::new());
        }

        tracing::debug!(
            radius = request.radius,
            category = request.category.as_deref().unwrap_or("*"),
            count = body.results.len(),
            "nearby search returned"
        );
        Ok(body.results.into_iter().map(NearbyPlace::from).collect())
    }

    async fn reverse_geocode(
        &self,
        point: Coordinate,
    ) -> Result<Vec<GeocodedAddress>, ProviderError> {
        let latlng = lat_lng(point);
        let url = self.build_url(GEOCODE_PATH, &[("latlng", latlng.as_str())])?;
        let body: GeocodeResponse = self.request_json(url, GEOCODE_PATH).await?;
        if !Self::check_status(&body.status, body.error_message.as_deref(), true)? {
            return Ok(Vec::new());
        }
        Ok(body.results.into_iter().map(GeocodedAddress::from).collect())
    }

    async fn route_distance(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<f64, ProviderError> {
        let origin = lat_lng(origin);
        let destination = lat_lng(destination);
        let url = self.build_url(
            DIRECTIONS_PATH,
            &[
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
            ],
        )?;
        let body: DirectionsResponse = self.request_json(url, DIRECTIONS_PATH).await?;
        // No route is a failure here: there is no distance to report.
        Self::check_status(&body.status, body.error_message.as_deref(), false)?;

        let route = body.routes.into_iter().next().ok_or_else(|| ProviderError::Api {
            status: STATUS_OK.to_string(),
            message: "response contained no routes".to_string(),
        })?;
        Ok(route.legs.iter().map(|leg| leg.distance.value).sum())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
