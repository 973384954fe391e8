//! Provider response types.
//!
//! The `Raw*` structs mirror the provider JSON and stay private to the
//! client; the public types carry only what the lookup layer consumes.

use placecache_core::Coordinate;
use serde::Deserialize;

/// Parameters of one nearby-search call.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearch {
    pub location: Coordinate,
    /// Metres.
    pub radius: u32,
    /// Provider category tag; `None` searches all categories.
    pub category: Option<String>,
}

/// A nearby-search candidate before filtering or ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPlace {
    pub place_id: String,
    pub name: String,
    pub vicinity: Option<String>,
    pub location: Coordinate,
    pub rating: Option<f64>,
    /// Provider category tags, e.g. `restaurant`, `food`.
    pub types: Vec<String>,
}

/// One reverse-geocoding hit.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    pub place_id: String,
    pub formatted_address: String,
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<RawPlace>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlace {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub geometry: RawGeometry,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeometry {
    pub location: RawLatLng,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<RawGeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeocodeResult {
    pub place_id: String,
    #[serde(default)]
    pub formatted_address: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRoute {
    #[serde(default)]
    pub legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLeg {
    pub distance: RawTextValue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTextValue {
    /// Metres.
    pub value: f64,
}

impl From<RawPlace> for NearbyPlace {
    fn from(raw: RawPlace) -> Self {
        Self {
            place_id: raw.place_id,
            name: raw.name,
            vicinity: raw.vicinity.filter(|v| !v.trim().is_empty()),
            location: Coordinate::new(raw.geometry.location.lat, raw.geometry.location.lng),
            rating: raw.rating,
            types: raw.types,
        }
    }
}

impl From<RawGeocodeResult> for GeocodedAddress {
    fn from(raw: RawGeocodeResult) -> Self {
        Self {
            place_id: raw.place_id,
            formatted_address: raw.formatted_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_place_tolerates_missing_optional_fields() {
        let raw: RawPlace = serde_json::from_value(serde_json::json!({
            "place_id": "abc",
            "geometry": { "location": { "lat": 1.5, "lng": -2.5 } }
        }))
        .expect("minimal place should parse");
        let place = NearbyPlace::from(raw);
        assert_eq!(place.place_id, "abc");
        assert_eq!(place.name, "");
        assert!(place.vicinity.is_none());
        assert!(place.rating.is_none());
        assert!(place.types.is_empty());
        assert_eq!(place.location, Coordinate::new(1.5, -2.5));
    }

    #[test]
    fn blank_vicinity_becomes_none() {
        let raw: RawPlace = serde_json::from_value(serde_json::json!({
            "place_id": "abc",
            "name": "Corner Cafe",
            "vicinity": "  ",
            "geometry": { "location": { "lat": 0.0, "lng": 0.0 } }
        }))
        .expect("place should parse");
        assert!(NearbyPlace::from(raw).vicinity.is_none());
    }

    #[test]
    fn directions_leg_distance_parses_value() {
        let parsed: DirectionsResponse = serde_json::from_value(serde_json::json!({
            "status": "OK",
            "routes": [{ "legs": [{ "distance": { "text": "1.2 km", "value": 1200 } }] }]
        }))
        .expect("directions should parse");
        assert!((parsed.routes[0].legs[0].distance.value - 1200.0).abs() < f64::EPSILON);
    }
}
