use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use placecache_core::{GeoQuery, PlaceResult, QueryMode, ValidationError};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_lookup_error, map_query_rejection, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<u32>,
    pub category: Option<String>,
    pub mode: Option<String>,
}

impl NearbyQuery {
    fn into_geo_query(self) -> Result<GeoQuery, ValidationError> {
        let lat = self.lat.ok_or(ValidationError::MissingParameter("lat"))?;
        let lng = self.lng.ok_or(ValidationError::MissingParameter("lng"))?;
        let mode = match self.mode.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<QueryMode>()?,
            _ => QueryMode::default(),
        };
        Ok(GeoQuery::new(lat, lng, self.radius, self.category, mode))
    }
}

pub(super) async fn nearby_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<PlaceResult>>>, ApiError> {
    let Query(query) = query.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;
    let geo_query = query
        .into_geo_query()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let data = state
        .lookup
        .search_places(&geo_query)
        .await
        .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
