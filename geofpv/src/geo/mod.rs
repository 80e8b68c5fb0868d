//! Geodesy helpers and local tangent-plane projection.
//!
//! Distances use the haversine formula on a spherical Earth of radius
//! 6,371 km. Over the few hundred meters a building query covers, the
//! error against the WGS-84 ellipsoid is well below a GPS fix's accuracy.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Heading: degrees (0-360, 0=north, clockwise)
//! - Distance: meters

mod projector;
mod types;

pub use projector::{
    AxisConvention, BuildingCategory, GeoProjector, InvalidPolygonReason, LocalPoint,
    LocalPolygon, Polygon, ProjectionError, ProjectionReport, ProjectorConfig, RejectedPolygon,
    DEFAULT_BUILDING_HEIGHT_M, DEFAULT_METERS_PER_LEVEL,
};
pub use types::{BoundingBox, Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters.
///
/// Symmetric, and exactly zero for identical inputs.
///
/// # Example
///
/// ```
/// use geofpv::geo::{distance_meters, Coordinate};
///
/// let a = Coordinate::new(52.0, 13.0);
/// let b = Coordinate::new(53.0, 13.0);
/// let d = distance_meters(&a, &b);
/// assert!((d - 111_195.0).abs() < 10.0);
/// ```
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Normalize an angle in degrees to `[0, 360)`.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

/// Decide whether building data must be fetched again.
///
/// True when nothing has been fetched yet, or the observer moved more than
/// half the fetch radius away from where the last query was centered.
pub fn should_refetch(
    last_fetched: Option<&Coordinate>,
    current: &Coordinate,
    radius_m: f64,
) -> bool {
    match last_fetched {
        None => true,
        Some(last) => distance_meters(last, current) > radius_m / 2.0,
    }
}
