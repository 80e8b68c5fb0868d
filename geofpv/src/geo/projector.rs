//! Projection of geographic building footprints into a local Cartesian frame.
//!
//! The frame is a tangent plane centered on the observer:
//!
//! - `x` grows eastward
//! - `z` grows northward under [`AxisConvention::NorthPositiveZ`] (the
//!   default), or southward under [`AxisConvention::NorthNegativeZ`] for
//!   engines whose camera looks down `-z`
//!
//! Each axis offset is the haversine distance along that single axis, so the
//! result is exact along the meridian and parallel through the observer and
//! drifts only slightly at the corners of a few-hundred-meter query area.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::types::Coordinate;
use super::distance_meters;

/// Height used when a building carries neither a height nor a level count.
pub const DEFAULT_BUILDING_HEIGHT_M: f64 = 10.0;

/// Storey height used to derive a building height from its level count.
pub const DEFAULT_METERS_PER_LEVEL: f64 = 3.0;

/// Minimum number of vertices for an extrudable footprint.
const MIN_VERTICES: usize = 3;

/// Mapping of the north/south offset onto the renderer's z axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisConvention {
    /// North is `+z`.
    #[default]
    NorthPositiveZ,
    /// North is `-z`.
    NorthNegativeZ,
}

impl AxisConvention {
    /// Config file spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisConvention::NorthPositiveZ => "north_positive_z",
            AxisConvention::NorthNegativeZ => "north_negative_z",
        }
    }
}

impl fmt::Display for AxisConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AxisConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north_positive_z" => Ok(AxisConvention::NorthPositiveZ),
            "north_negative_z" => Ok(AxisConvention::NorthNegativeZ),
            other => Err(format!(
                "unknown axis convention '{}' (expected north_positive_z or north_negative_z)",
                other
            )),
        }
    }
}

/// A building footprint in geographic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Source identifier (OSM way id), if known.
    pub id: Option<u64>,
    /// Outer ring in ring order. Must not repeat the first vertex at the end.
    pub vertices: Vec<Coordinate>,
    /// Explicit height tag in meters.
    pub height_m: Option<f64>,
    /// Number of above-ground levels.
    pub levels: Option<f64>,
    /// Value of the `building` tag (`"house"`, `"office"`, ...).
    pub kind: Option<String>,
}

impl Polygon {
    /// Create a polygon with no id and no height information.
    pub fn new(vertices: Vec<Coordinate>) -> Self {
        Self {
            id: None,
            vertices,
            height_m: None,
            levels: None,
            kind: None,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_height(mut self, height_m: f64) -> Self {
        self.height_m = Some(height_m);
        self
    }

    pub fn with_levels(mut self, levels: f64) -> Self {
        self.levels = Some(levels);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Coarse category of the `building` tag.
    pub fn category(&self) -> BuildingCategory {
        self.kind
            .as_deref()
            .map(BuildingCategory::from_tag)
            .unwrap_or_default()
    }
}

/// Coarse building use, for picking a material per footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingCategory {
    Residential,
    Commercial,
    Industrial,
    Education,
    #[default]
    Other,
}

impl BuildingCategory {
    /// Classify a `building` tag value.
    pub fn from_tag(value: &str) -> Self {
        match value {
            "residential" | "house" | "detached" | "apartments" => Self::Residential,
            "commercial" | "office" | "retail" => Self::Commercial,
            "industrial" | "warehouse" | "factory" => Self::Industrial,
            "school" | "university" | "college" | "kindergarten" => Self::Education,
            _ => Self::Other,
        }
    }
}

/// A vertex in the local frame, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocalPoint {
    pub x: f64,
    pub z: f64,
}

/// A footprint projected into the local frame, ready for extrusion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalPolygon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub vertices: Vec<LocalPoint>,
    pub height_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub category: BuildingCategory,
}

/// Why a polygon cannot be projected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidPolygonReason {
    #[error("footprint has {0} vertices, at least 3 are required")]
    TooFewVertices(usize),

    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("vertex {index} is outside the valid latitude/longitude range")]
    CoordinateOutOfRange { index: usize },
}

/// Errors produced by [`GeoProjector`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// The polygon cannot form a renderable footprint.
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(#[from] InvalidPolygonReason),

    /// The observer position itself is unusable.
    #[error("Invalid reference coordinate: {0}")]
    InvalidReference(Coordinate),
}

/// A polygon that was skipped by [`GeoProjector::project_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedPolygon {
    /// Position of the polygon in the input slice.
    pub index: usize,
    pub id: Option<u64>,
    pub error: ProjectionError,
}

/// Outcome of projecting a batch of polygons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionReport {
    pub projected: Vec<LocalPolygon>,
    pub rejected: Vec<RejectedPolygon>,
}

impl ProjectionReport {
    /// True when every input polygon was projected.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Number of input polygons this report accounts for.
    pub fn total(&self) -> usize {
        self.projected.len() + self.rejected.len()
    }
}

/// Projector configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectorConfig {
    /// Height for buildings without height or level tags.
    pub default_height_m: f64,
    /// Storey height for buildings with only a level count.
    pub meters_per_level: f64,
    /// z axis orientation.
    pub axis: AxisConvention,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            default_height_m: DEFAULT_BUILDING_HEIGHT_M,
            meters_per_level: DEFAULT_METERS_PER_LEVEL,
            axis: AxisConvention::default(),
        }
    }
}

/// Projects geographic footprints into meters relative to an observer.
///
/// Stateless apart from its configuration; inputs are never modified.
///
/// # Usage
///
/// ```
/// use geofpv::geo::{Coordinate, GeoProjector, Polygon};
///
/// let projector = GeoProjector::default();
/// let observer = Coordinate::new(52.5200, 13.4050);
/// let footprint = Polygon::new(vec![
///     Coordinate::new(52.5201, 13.4051),
///     Coordinate::new(52.5201, 13.4052),
///     Coordinate::new(52.5202, 13.4052),
/// ])
/// .with_levels(3.0);
///
/// let local = projector.project(&observer, &footprint).unwrap();
/// assert_eq!(local.height_m, 9.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeoProjector {
    config: ProjectorConfig,
}

impl GeoProjector {
    pub fn new(config: ProjectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Resolve the extrusion height of a footprint.
    ///
    /// Order: explicit height, then `levels × meters_per_level`, then the
    /// configured default. Negative or non-finite tags count as absent.
    pub fn resolve_height(&self, polygon: &Polygon) -> f64 {
        if let Some(height) = polygon.height_m.filter(|h| usable_tag(*h)) {
            return height;
        }
        if let Some(levels) = polygon.levels.filter(|l| usable_tag(*l)) {
            return levels * self.config.meters_per_level;
        }
        self.config.default_height_m
    }

    /// Project a single coordinate relative to `reference`.
    pub fn project_point(&self, reference: &Coordinate, point: &Coordinate) -> LocalPoint {
        let along_parallel = Coordinate::new(reference.latitude, point.longitude);
        let along_meridian = Coordinate::new(point.latitude, reference.longitude);

        let x = distance_meters(reference, &along_parallel)
            * sign(wrap_longitude_delta(point.longitude - reference.longitude));
        let z = -distance_meters(reference, &along_meridian)
            * sign(reference.latitude - point.latitude);

        match self.config.axis {
            AxisConvention::NorthPositiveZ => LocalPoint { x, z },
            AxisConvention::NorthNegativeZ => LocalPoint { x, z: -z },
        }
    }

    /// Project one footprint.
    ///
    /// # Errors
    ///
    /// [`ProjectionError::InvalidPolygon`] when the footprint has fewer than
    /// three vertices or any vertex is non-finite or out of range;
    /// [`ProjectionError::InvalidReference`] when `reference` is unusable.
    pub fn project(
        &self,
        reference: &Coordinate,
        polygon: &Polygon,
    ) -> Result<LocalPolygon, ProjectionError> {
        validate_reference(reference)?;
        self.project_validated(reference, polygon)
    }

    /// Project a batch of footprints, collecting per-polygon failures.
    ///
    /// One bad footprint never aborts the batch. Only an unusable
    /// `reference` fails the whole call, since no polygon can be projected
    /// against it.
    pub fn project_all(
        &self,
        reference: &Coordinate,
        polygons: &[Polygon],
    ) -> Result<ProjectionReport, ProjectionError> {
        validate_reference(reference)?;

        let mut report = ProjectionReport::default();
        for (index, polygon) in polygons.iter().enumerate() {
            match self.project_validated(reference, polygon) {
                Ok(local) => report.projected.push(local),
                Err(error) => {
                    debug!(
                        index,
                        polygon_id = ?polygon.id,
                        reason = %error,
                        "Skipping footprint"
                    );
                    report.rejected.push(RejectedPolygon {
                        index,
                        id: polygon.id,
                        error,
                    });
                }
            }
        }

        debug!(
            projected = report.projected.len(),
            rejected = report.rejected.len(),
            "Projected footprints"
        );
        Ok(report)
    }

    fn project_validated(
        &self,
        reference: &Coordinate,
        polygon: &Polygon,
    ) -> Result<LocalPolygon, ProjectionError> {
        validate_polygon(polygon)?;

        let vertices = polygon
            .vertices
            .iter()
            .map(|v| self.project_point(reference, v))
            .collect();

        Ok(LocalPolygon {
            id: polygon.id,
            vertices,
            height_m: self.resolve_height(polygon),
            kind: polygon.kind.clone(),
            category: polygon.category(),
        })
    }
}

fn validate_reference(reference: &Coordinate) -> Result<(), ProjectionError> {
    if reference.is_valid() {
        Ok(())
    } else {
        Err(ProjectionError::InvalidReference(*reference))
    }
}

fn validate_polygon(polygon: &Polygon) -> Result<(), InvalidPolygonReason> {
    if polygon.vertices.len() < MIN_VERTICES {
        return Err(InvalidPolygonReason::TooFewVertices(polygon.vertices.len()));
    }
    for (index, vertex) in polygon.vertices.iter().enumerate() {
        if !vertex.is_finite() {
            return Err(InvalidPolygonReason::NonFiniteCoordinate { index });
        }
        if !vertex.is_valid() {
            return Err(InvalidPolygonReason::CoordinateOutOfRange { index });
        }
    }
    Ok(())
}

fn usable_tag(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Sign with `sign(0) == 0`, unlike `f64::signum`.
#[inline]
fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Longitude difference folded into (-180, 180] so points across the
/// antimeridian land on the correct side.
#[inline]
fn wrap_longitude_delta(delta: f64) -> f64 {
    let wrapped = (delta + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}
