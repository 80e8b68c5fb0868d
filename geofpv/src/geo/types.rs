//! Geographic type definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Approximate meters per degree of latitude, used for query bounding boxes.
pub const METERS_PER_DEGREE_APPROX: f64 = 111_000.0;

/// A geographic position in decimal degrees (WGS-84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without validation.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Both components are finite and within the valid lat/lon ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.is_finite()
            && (MIN_LAT..=MAX_LAT).contains(&self.latitude)
            && (MIN_LON..=MAX_LON).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Axis-aligned lat/lon box, as used by the building data query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Rough box extending `radius_m` in every direction from `center`.
    ///
    /// Uses ~111 km per degree of latitude and scales the longitude span
    /// by `cos(latitude)`. Good enough for a data query, not for geometry.
    pub fn around(center: Coordinate, radius_m: f64) -> Self {
        let lat_delta = radius_m / METERS_PER_DEGREE_APPROX;
        let lon_delta =
            radius_m / (METERS_PER_DEGREE_APPROX * center.latitude.to_radians().cos());

        Self {
            south: center.latitude - lat_delta,
            west: center.longitude - lon_delta,
            north: center.latitude + lat_delta,
            east: center.longitude + lon_delta,
        }
    }

    /// Check whether a coordinate lies inside (inclusive).
    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.south..=self.north).contains(&coord.latitude)
            && (self.west..=self.east).contains(&coord.longitude)
    }
}

impl fmt::Display for BoundingBox {
    /// Overpass order: south,west,north,east
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.south, self.west, self.north, self.east
        )
    }
}
