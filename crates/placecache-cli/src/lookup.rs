//! Command handlers. Each runs one lookup and prints the result as JSON on
//! stdout; logs go to stderr.

use placecache_core::{Coordinate, DirectionQuery, DistanceUnit, GeoQuery, QueryMode};
use placecache_lookup::LookupService;

/// # Errors
///
/// Returns an error if validation fails or the store is unavailable.
pub(crate) async fn run_places(
    service: &LookupService,
    lat: f64,
    lng: f64,
    radius: Option<u32>,
    category: Option<String>,
    mode: QueryMode,
) -> anyhow::Result<()> {
    let query = GeoQuery::new(lat, lng, radius, category, mode);
    let places = service.search_places(&query).await?;
    if places.is_empty() {
        tracing::info!(%mode, "no places found");
    }
    println!("{}", serde_json::to_string_pretty(&places)?);
    Ok(())
}

/// # Errors
///
/// Returns an error if validation fails or the store is unavailable.
pub(crate) async fn run_directions(
    service: &LookupService,
    origin: (f64, f64),
    destination: (f64, f64),
    unit: DistanceUnit,
) -> anyhow::Result<()> {
    let query = DirectionQuery {
        origin: Coordinate::new(origin.0, origin.1),
        destination: Coordinate::new(destination.0, destination.1),
        unit,
    };
    let result = service.directions_distance(&query).await?;
    let body = serde_json::json!({
        "distance": result.distance,
        "unit": unit,
        "source": result.source,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// # Errors
///
/// Returns an error if the store does not answer.
pub(crate) async fn run_store_ping(service: &LookupService) -> anyhow::Result<()> {
    service.ping_store().await?;
    println!("store ok");
    Ok(())
}
