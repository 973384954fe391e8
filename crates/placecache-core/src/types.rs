use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest nearby-search radius the provider accepts, in metres.
pub const MAX_RADIUS_M: u32 = 50_000;

/// Radius used when a place query does not specify one, in metres.
pub const DEFAULT_RADIUS_M: u32 = 500;

/// Rejections raised before any cache, lock, or upstream work happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks that both axes are finite and inside the WGS84 ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] naming the offending axis.
    pub fn validate(
        &self,
        lat_field: &'static str,
        lng_field: &'static str,
    ) -> Result<(), ValidationError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::OutOfRange {
                field: lat_field,
                value: self.latitude,
            });
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::OutOfRange {
                field: lng_field,
                value: self.longitude,
            });
        }
        Ok(())
    }
}

/// Result-filtering policy for a place search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Food categories or allow-listed retailers; falls back to the raw
    /// candidate set when nothing classifies.
    #[default]
    FoodAndRetail,
    /// Allow-listed retailers only; never widens to the raw set.
    RetailerOnly,
}

impl QueryMode {
    /// Stable short tag used inside cache keys.
    #[must_use]
    pub fn as_key_segment(self) -> &'static str {
        match self {
            QueryMode::FoodAndRetail => "food",
            QueryMode::RetailerOnly => "retail",
        }
    }
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryMode::FoodAndRetail => write!(f, "food-and-retail"),
            QueryMode::RetailerOnly => write!(f, "retailer-only"),
        }
    }
}

impl FromStr for QueryMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" | "food-and-retail" | "food_and_retail" => Ok(QueryMode::FoodAndRetail),
            "grocery" | "grocery-only" | "retailer-only" | "retailer_only" => {
                Ok(QueryMode::RetailerOnly)
            }
            other => Err(ValidationError::InvalidParameter {
                field: "mode",
                reason: format!("unknown mode '{other}'"),
            }),
        }
    }
}

/// A nearby-place search as received from a caller. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in metres.
    pub radius: u32,
    pub category: Option<String>,
    pub mode: QueryMode,
}

impl GeoQuery {
    /// Builds a query, trimming the category and treating a blank one as absent.
    #[must_use]
    pub fn new(
        latitude: f64,
        longitude: f64,
        radius: Option<u32>,
        category: Option<String>,
        mode: QueryMode,
    ) -> Self {
        Self {
            latitude,
            longitude,
            radius: radius.unwrap_or(DEFAULT_RADIUS_M),
            category: category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            mode,
        }
    }

    #[must_use]
    pub fn origin(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError`] for out-of-range coordinates or a radius
    /// outside `1..=MAX_RADIUS_M`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.origin().validate("lat", "lng")?;
        if self.radius == 0 || self.radius > MAX_RADIUS_M {
            return Err(ValidationError::OutOfRange {
                field: "radius",
                value: f64::from(self.radius),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
    Miles,
}

impl DistanceUnit {
    const METERS_PER_MILE: f64 = 1_609.344;

    #[must_use]
    pub fn from_meters(self, meters: f64) -> f64 {
        match self {
            DistanceUnit::Meters => meters,
            DistanceUnit::Kilometers => meters / 1_000.0,
            DistanceUnit::Miles => meters / Self::METERS_PER_MILE,
        }
    }

    #[must_use]
    pub fn as_key_segment(self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meters" | "metres" => Ok(DistanceUnit::Meters),
            "km" | "kilometers" | "kilometres" => Ok(DistanceUnit::Kilometers),
            "mi" | "miles" => Ok(DistanceUnit::Miles),
            other => Err(ValidationError::InvalidParameter {
                field: "unit",
                reason: format!("unknown unit '{other}'"),
            }),
        }
    }
}

/// A route-distance query between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionQuery {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub unit: DistanceUnit,
}

impl DirectionQuery {
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] when either endpoint is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.origin.validate("origin_lat", "origin_lng")?;
        self.destination.validate("dest_lat", "dest_lng")
    }
}

/// One place returned to a caller. Distance from the query origin is a
/// ranking input only and is deliberately absent here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub id: String,
    pub name: String,
    /// Best-effort vicinity string; empty when the provider had none.
    pub address: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// `None` means unrated, not zero.
    pub rating: Option<f64>,
}

/// Where a distance value came from. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    Cache,
    Provider,
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionResult {
    pub distance: f64,
    pub source: DistanceSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_query_blank_category_is_none() {
        let q = GeoQuery::new(1.0, 2.0, None, Some("   ".into()), QueryMode::default());
        assert!(q.category.is_none());
        assert_eq!(q.radius, DEFAULT_RADIUS_M);
    }

    #[test]
    fn geo_query_rejects_out_of_range_latitude() {
        let q = GeoQuery::new(91.0, 0.0, Some(100), None, QueryMode::default());
        assert!(matches!(
            q.validate(),
            Err(ValidationError::OutOfRange { field: "lat", .. })
        ));
    }

    #[test]
    fn geo_query_rejects_nan_longitude() {
        let q = GeoQuery::new(0.0, f64::NAN, Some(100), None, QueryMode::default());
        assert!(matches!(
            q.validate(),
            Err(ValidationError::OutOfRange { field: "lng", .. })
        ));
    }

    #[test]
    fn geo_query_rejects_oversized_radius() {
        let q = GeoQuery::new(0.0, 0.0, Some(MAX_RADIUS_M + 1), None, QueryMode::default());
        assert!(matches!(
            q.validate(),
            Err(ValidationError::OutOfRange {
                field: "radius",
                ..
            })
        ));
    }

    #[test]
    fn query_mode_accepts_aliases() {
        assert_eq!("grocery-only".parse::<QueryMode>().unwrap(), QueryMode::RetailerOnly);
        assert_eq!("Food".parse::<QueryMode>().unwrap(), QueryMode::FoodAndRetail);
        assert!("everything".parse::<QueryMode>().is_err());
    }

    #[test]
    fn distance_unit_conversions() {
        assert!((DistanceUnit::Kilometers.from_meters(1_500.0) - 1.5).abs() < 1e-12);
        assert!((DistanceUnit::Miles.from_meters(1_609.344) - 1.0).abs() < 1e-12);
        assert!((DistanceUnit::Meters.from_meters(42.0) - 42.0).abs() < 1e-12);
    }

    #[test]
    fn place_result_serializes_short_coordinate_names_and_null_rating() {
        let place = PlaceResult {
            id: "abc".into(),
            name: "Mary Mac's".into(),
            address: "224 Ponce De Leon Ave".into(),
            latitude: 33.772,
            longitude: -84.379,
            rating: None,
        };
        let json = serde_json::to_value(&place).expect("serialize");
        assert_eq!(json["lat"].as_f64(), Some(33.772));
        assert_eq!(json["lng"].as_f64(), Some(-84.379));
        assert!(json["rating"].is_null());
        assert!(json.get("distance").is_none());
    }

    #[test]
    fn direction_result_source_is_snake_case() {
        let result = DirectionResult {
            distance: 1.0,
            source: DistanceSource::Estimated,
        };
        let json = serde_json::to_string(&result).expect("serialize");
        assert!(json.contains("\"source\":\"estimated\""));
    }
}
