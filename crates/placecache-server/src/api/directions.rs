use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use placecache_core::{Coordinate, DirectionQuery, DistanceSource, DistanceUnit, ValidationError};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_lookup_error, map_query_rejection, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct DistanceQuery {
    pub origin_lat: Option<f64>,
    pub origin_lng: Option<f64>,
    pub dest_lat: Option<f64>,
    pub dest_lng: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DistanceData {
    pub distance: f64,
    pub unit: DistanceUnit,
    /// Diagnostic provenance; not a correctness signal.
    pub source: DistanceSource,
}

impl DistanceQuery {
    fn into_direction_query(self) -> Result<DirectionQuery, ValidationError> {
        let required = |value: Option<f64>, name: &'static str| {
            value.ok_or(ValidationError::MissingParameter(name))
        };
        let origin = Coordinate::new(
            required(self.origin_lat, "origin_lat")?,
            required(self.origin_lng, "origin_lng")?,
        );
        let destination = Coordinate::new(
            required(self.dest_lat, "dest_lat")?,
            required(self.dest_lng, "dest_lng")?,
        );
        let unit = match self.unit.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<DistanceUnit>()?,
            _ => DistanceUnit::default(),
        };
        Ok(DirectionQuery {
            origin,
            destination,
            unit,
        })
    }
}

pub(super) async fn directions_distance(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<DistanceQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<DistanceData>>, ApiError> {
    let Query(query) = query.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;
    let direction_query = query
        .into_direction_query()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let result = state
        .lookup
        .directions_distance(&direction_query)
        .await
        .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: DistanceData {
            distance: result.distance,
            unit: direction_query.unit,
            source: result.source,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
