//! Coordinate quantization and closed-form distance.
//!
//! Queries are floored onto a fixed decimal-degree grid before they become
//! cache keys, so GPS jitter inside one cell reuses the same cached answer.
//! Three decimals is roughly a 110 m cell at the equator: coarser grids raise
//! the hit rate and lower the effective precision of the answer.
//!
//! The floor is not strict. `CELL_EPSILON` of a cell is added first, so a
//! value less than `CELL_EPSILON / 10^decimals` degrees below a cell edge
//! (1e-10° on the default grid) lands in the cell above. That band is far
//! below GPS precision and keeps values typed at grid precision in their own
//! cell.

use crate::types::Coordinate;

/// Default grid resolution, in decimal places of a degree.
pub const DEFAULT_GRID_DECIMALS: u32 = 3;

/// Mean Earth radius used for great-circle distances, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Fraction of a cell added before flooring. Values typed at grid precision
/// (e.g. `33.749`) are not exactly representable in binary and can land a hair
/// below their own cell boundary without it.
const CELL_EPSILON: f64 = 1e-7;

/// A coordinate floored onto the normalizer grid, held as integer cell indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormalizedCoordinate {
    lat_cell: i64,
    lng_cell: i64,
    decimals: u32,
}

impl NormalizedCoordinate {
    #[must_use]
    pub fn latitude(&self) -> f64 {
        cell_to_degrees(self.lat_cell, self.decimals)
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        cell_to_degrees(self.lng_cell, self.decimals)
    }

    /// Fixed-precision latitude text, e.g. `33.749`.
    #[must_use]
    pub fn lat_segment(&self) -> String {
        format!("{:.*}", self.decimals as usize, self.latitude())
    }

    /// Fixed-precision longitude text, e.g. `-84.388`.
    #[must_use]
    pub fn lng_segment(&self) -> String {
        format!("{:.*}", self.decimals as usize, self.longitude())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateNormalizer {
    decimals: u32,
}

impl Default for CoordinateNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_DECIMALS)
    }
}

impl CoordinateNormalizer {
    #[must_use]
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    #[must_use]
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Floors a raw coordinate onto the grid. Range checking belongs to the
    /// caller; out-of-range input is quantized like any other value.
    #[must_use]
    pub fn normalize(&self, latitude: f64, longitude: f64) -> NormalizedCoordinate {
        NormalizedCoordinate {
            lat_cell: degrees_to_cell(latitude, self.decimals),
            lng_cell: degrees_to_cell(longitude, self.decimals),
            decimals: self.decimals,
        }
    }
}

fn scale(decimals: u32) -> f64 {
    10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX))
}

#[allow(clippy::cast_possible_truncation)]
fn degrees_to_cell(degrees: f64, decimals: u32) -> i64 {
    (degrees * scale(decimals) + CELL_EPSILON).floor() as i64
}

#[allow(clippy::cast_precision_loss)]
fn cell_to_degrees(cell: i64, decimals: u32) -> f64 {
    cell as f64 / scale(decimals)
}

/// Great-circle distance in metres via the spherical law of cosines.
///
/// Always finite and non-negative: the cosine term is clamped so rounding on
/// (near-)identical points cannot push `acos` outside its domain.
#[must_use]
pub fn great_circle_distance_m(from: Coordinate, to: Coordinate) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let cos_central = phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * delta_lambda.cos();
    let central_angle = cos_central.clamp(-1.0, 1.0).acos();

    EARTH_RADIUS_M * central_angle
}
