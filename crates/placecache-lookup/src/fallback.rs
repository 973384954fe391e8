//! Last-resort answers when the planner has nothing usable.
//!
//! Neither strategy ever fails: geocoding reconstruction degrades to an empty
//! list and the distance estimate is closed-form.

use std::collections::HashSet;
use std::time::Duration;

use placecache_core::{great_circle_distance_m, Coordinate, DistanceUnit, PlaceResult};
use placecache_provider::MapsProvider;

/// Probe step in each axis, roughly 11 m.
pub const GEOCODE_OFFSET_DEG: f64 = 0.0001;

/// Most results a geocoding reconstruction collects.
pub const GEOCODE_RESULT_CAP: usize = 10;

/// The 3×3 probe grid around `origin`, row-major from south-west.
#[must_use]
pub fn neighborhood_probes(origin: Coordinate) -> Vec<Coordinate> {
    let steps = [-1.0, 0.0, 1.0];
    steps
        .iter()
        .flat_map(|dlat| {
            steps.iter().map(move |dlng| {
                Coordinate::new(
                    origin.latitude + dlat * GEOCODE_OFFSET_DEG,
                    origin.longitude + dlng * GEOCODE_OFFSET_DEG,
                )
            })
        })
        .collect()
}

/// Reverse-geocodes the probe grid and turns each distinct address into an
/// unnamed, unrated result pinned to `origin`.
///
/// Probes run one at a time and stop as soon as `cap` results are held. A
/// failing or timed-out probe is logged and skipped.
pub async fn geocode_neighborhood(
    provider: &dyn MapsProvider,
    origin: Coordinate,
    cap: usize,
    call_timeout: Duration,
) -> Vec<PlaceResult> {
    let cap = cap.min(GEOCODE_RESULT_CAP);
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for probe in neighborhood_probes(origin) {
        if results.len() >= cap {
            break;
        }

        let addresses =
            match tokio::time::timeout(call_timeout, provider.reverse_geocode(probe)).await {
                Ok(Ok(addresses)) => addresses,
                Ok(Err(e)) => {
                    tracing::warn!(
                        lat = probe.latitude,
                        lng = probe.longitude,
                        error = %e,
                        "reverse geocode probe failed"
                    );
                    continue;
                }
                Err(_) => {
                    tracing::warn!(
                        lat = probe.latitude,
                        lng = probe.longitude,
                        timeout_ms = u64::try_from(call_timeout.as_millis()).unwrap_or(u64::MAX),
                        "reverse geocode probe timed out"
                    );
                    continue;
                }
            };

        for address in addresses {
            if address.formatted_address.trim().is_empty() || !seen.insert(address.place_id.clone())
            {
                continue;
            }
            results.push(PlaceResult {
                id: address.place_id,
                name: String::new(),
                address: address.formatted_address,
                latitude: origin.latitude,
                longitude: origin.longitude,
                rating: None,
            });
            if results.len() >= cap {
                break;
            }
        }
    }

    tracing::info!(results = results.len(), "geocode reconstruction finished");
    results
}

/// Great-circle distance between the two points in `unit`. Always finite and
/// non-negative for finite input.
#[must_use]
pub fn estimate_distance(origin: Coordinate, destination: Coordinate, unit: DistanceUnit) -> f64 {
    unit.from_meters(great_circle_distance_m(origin, destination))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_grid_is_three_by_three_around_origin() {
        let origin = Coordinate::new(33.749, -84.388);
        let probes = neighborhood_probes(origin);
        assert_eq!(probes.len(), 9);
        assert_eq!(probes[4], origin);
        assert!((probes[0].latitude - (33.749 - GEOCODE_OFFSET_DEG)).abs() < 1e-12);
        assert!((probes[0].longitude - (-84.388 - GEOCODE_OFFSET_DEG)).abs() < 1e-12);
        assert!((probes[8].latitude - (33.749 + GEOCODE_OFFSET_DEG)).abs() < 1e-12);
        assert!((probes[2].longitude - (-84.388 + GEOCODE_OFFSET_DEG)).abs() < 1e-12);
    }

    #[test]
    fn estimate_converts_units() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let m = estimate_distance(a, b, DistanceUnit::Meters);
        let km = estimate_distance(a, b, DistanceUnit::Kilometers);
        let mi = estimate_distance(a, b, DistanceUnit::Miles);
        assert!((m / 1_000.0 - km).abs() < 1e-9);
        assert!((m / 1_609.344 - mi).abs() < 1e-9);
    }
}
