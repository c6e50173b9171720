//! Geospatial calculator: distance and quadrant direction from the reference point.
//!
//! Everything here is pure and deterministic. Distances are geodesic on the
//! WGS-84 ellipsoid, reported in miles and rounded to two decimals.

use geographiclib_rs::{Geodesic, InverseGeodesic};
use serde::{Deserialize, Serialize};

/// A point on the earth's surface, in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// New York City; every derived distance and direction is relative to it.
pub const REFERENCE_POINT: Coordinates = Coordinates::new(40.7128, -74.0060);

const METERS_PER_MILE: f64 = 1_609.344;

/// Quadrant of a point relative to the reference point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "NE")]
    NorthEast,
    #[serde(rename = "NW")]
    NorthWest,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "SW")]
    SouthWest,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::NorthEast => "NE",
            Direction::NorthWest => "NW",
            Direction::SouthEast => "SE",
            Direction::SouthWest => "SW",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The derived location fields of an item.
///
/// These four values are only ever computed together from one set of
/// coordinates, so an item can never carry a stale subset of them.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFields {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "distanceFromNY")]
    pub distance_from_ny: f64,
    #[serde(rename = "directionFromNY")]
    pub direction_from_ny: Direction,
}

impl GeoFields {
    pub fn derive(point: Coordinates) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            distance_from_ny: distance_from_reference(point),
            direction_from_ny: direction_from_reference(point),
        }
    }
}

/// Geodesic distance in miles from [`REFERENCE_POINT`], rounded to 2 decimals.
pub fn distance_from_reference(point: Coordinates) -> f64 {
    round_to_cents(geodesic_meters(REFERENCE_POINT, point) / METERS_PER_MILE)
}

/// Quadrant of `point` relative to [`REFERENCE_POINT`].
///
/// North and east are strict comparisons. A point that is north but not east
/// is NW, east but not north is SE, and neither (including the reference
/// point itself) is SW.
pub fn direction_from_reference(point: Coordinates) -> Direction {
    let is_north = point.latitude > REFERENCE_POINT.latitude;
    let is_east = point.longitude > REFERENCE_POINT.longitude;

    match (is_north, is_east) {
        (true, true) => Direction::NorthEast,
        (true, false) => Direction::NorthWest,
        (false, true) => Direction::SouthEast,
        (false, false) => Direction::SouthWest,
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Geodesic distance on the WGS-84 ellipsoid, in meters (Karney's method,
/// which converges for every pair of points including antipodes).
fn geodesic_meters(from: Coordinates, to: Coordinates) -> f64 {
    Geodesic::wgs84().inverse(from.latitude, from.longitude, to.latitude, to.longitude)
}
