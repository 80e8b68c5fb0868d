//! Integration tests for building projection.
//!
//! Covers the path from an Overpass response to local polygons:
//! - flattening ways and node references
//! - height policy from tags
//! - per-polygon rejection without aborting the batch
//!
//! Run with: `cargo test --test projection_integration`

use geofpv::buildings::{FetchPlanner, OverpassResponse};
use geofpv::geo::{
    distance_meters, Coordinate, GeoProjector, InvalidPolygonReason, Polygon, ProjectionError,
};

// ============================================================================
// Fixtures
// ============================================================================

/// Observer near Berlin Alexanderplatz.
const BERLIN: Coordinate = Coordinate::new(52.5200, 13.4050);

/// Overpass response with one good building per height rule and one
/// degenerate way.
const RESPONSE: &str = r#"{
  "elements": [
    {"type": "way", "id": 1, "nodes": [10, 11, 12, 10],
     "tags": {"building": "yes", "building:levels": "3"}},
    {"type": "way", "id": 2, "nodes": [10, 11, 13, 10],
     "tags": {"building": "commercial", "height": "21.5"}},
    {"type": "way", "id": 3, "nodes": [11, 12, 13, 11],
     "tags": {"building": "yes"}},
    {"type": "way", "id": 4, "nodes": [10, 11, 10],
     "tags": {"building": "shed"}},
    {"type": "node", "id": 10, "lat": 52.5201, "lon": 13.4051},
    {"type": "node", "id": 11, "lat": 52.5201, "lon": 13.4052},
    {"type": "node", "id": 12, "lat": 52.5202, "lon": 13.4052},
    {"type": "node", "id": 13, "lat": 52.5199, "lon": 13.4049}
  ]
}"#;

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_levels_scenario() {
    let projector = GeoProjector::default();
    let polygon = Polygon::new(vec![
        Coordinate::new(52.5201, 13.4051),
        Coordinate::new(52.5201, 13.4052),
        Coordinate::new(52.5202, 13.4052),
    ])
    .with_levels(3.0);

    let local = projector.project(&BERLIN, &polygon).unwrap();

    assert_eq!(local.height_m, 9.0);
    for (vertex, source) in local.vertices.iter().zip(&polygon.vertices) {
        // All vertices are north-east of the observer
        assert!(vertex.x > 0.0 && vertex.z > 0.0, "{:?}", vertex);
        let planar = (vertex.x * vertex.x + vertex.z * vertex.z).sqrt();
        assert!(planar < 30.0, "vertex {:?} too far from origin", vertex);
        // Planar offset agrees with the great-circle distance
        assert!((planar - distance_meters(&BERLIN, source)).abs() < 0.05);
    }
}

#[test]
fn test_response_to_local_polygons() {
    let response = OverpassResponse::from_slice(RESPONSE.as_bytes()).unwrap();
    let polygons = response.building_polygons();
    assert_eq!(polygons.len(), 4);

    let report = GeoProjector::default()
        .project_all(&BERLIN, &polygons)
        .unwrap();

    let heights: Vec<(Option<u64>, f64)> =
        report.projected.iter().map(|p| (p.id, p.height_m)).collect();
    assert_eq!(heights, vec![(Some(1), 9.0), (Some(2), 21.5), (Some(3), 10.0)]);

    assert_eq!(report.rejected.len(), 1);
    let rejected = &report.rejected[0];
    assert_eq!(rejected.id, Some(4));
    assert_eq!(rejected.index, 3);
    assert_eq!(
        rejected.error,
        ProjectionError::InvalidPolygon(InvalidPolygonReason::TooFewVertices(2))
    );
}

#[test]
fn test_vertex_south_west_of_observer() {
    let response = OverpassResponse::from_slice(RESPONSE.as_bytes()).unwrap();
    let report = GeoProjector::default()
        .project_all(&BERLIN, &response.building_polygons())
        .unwrap();

    // Way 2's third vertex (node 13) lies south-west of the observer
    let vertex = report.projected[1].vertices[2];
    assert!(vertex.x < 0.0);
    assert!(vertex.z < 0.0);
}

#[test]
fn test_moving_observer_reprojects_same_data() {
    let response = OverpassResponse::from_slice(RESPONSE.as_bytes()).unwrap();
    let polygons = response.building_polygons();
    let projector = GeoProjector::default();

    let mut planner = FetchPlanner::new(500.0);
    assert!(planner.needs_refresh(&BERLIN));
    planner.mark_fetched(BERLIN);

    // Step onto node 10 - no refetch needed, and that vertex is now the origin
    let moved = Coordinate::new(52.5201, 13.4051);
    assert!(!planner.needs_refresh(&moved));

    let report = projector.project_all(&moved, &polygons).unwrap();
    let origin = report.projected[0].vertices[0];
    assert!(origin.x.abs() < 1e-9 && origin.z.abs() < 1e-9);
}
