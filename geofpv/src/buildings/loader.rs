//! Fetches building footprints around the observer and projects them.

use thiserror::Error;
use tracing::{debug, info};

use super::overpass::{overpass_query, OverpassResponse};
use super::planner::FetchPlanner;
use crate::geo::{BoundingBox, Coordinate, GeoProjector, Polygon, ProjectionError, ProjectionReport};
use crate::provider::{HttpClient, ProviderError};

/// Public Overpass API endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Errors while fetching building data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Building query failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid building data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid position: {0}")]
    InvalidPosition(Coordinate),
}

/// Sends building queries to an Overpass endpoint.
pub struct OverpassClient<C: HttpClient> {
    http: C,
    url: String,
}

impl<C: HttpClient> OverpassClient<C> {
    pub fn new(http: C, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch all buildings inside `bbox`.
    pub fn fetch(&self, bbox: &BoundingBox) -> Result<OverpassResponse, FetchError> {
        let query = overpass_query(bbox);
        debug!(url = %self.url, bbox = %bbox, "Querying buildings");

        let body = self.http.post(&self.url, &query)?;
        let response = OverpassResponse::from_slice(&body)?;

        info!(elements = response.elements.len(), "Building data received");
        Ok(response)
    }
}

/// Keeps the footprints around the observer current.
///
/// Footprints are stored geographically and projected on demand, so the
/// local frame always centers on the latest position even between fetches.
pub struct BuildingLoader<C: HttpClient> {
    client: OverpassClient<C>,
    planner: FetchPlanner,
    projector: GeoProjector,
    polygons: Vec<Polygon>,
}

impl<C: HttpClient> BuildingLoader<C> {
    pub fn new(client: OverpassClient<C>, planner: FetchPlanner, projector: GeoProjector) -> Self {
        Self {
            client,
            planner,
            projector,
            polygons: Vec::new(),
        }
    }

    /// Report a new observer position, fetching if it moved far enough.
    ///
    /// Returns `true` when new data was fetched. On failure the previous
    /// footprints are kept and the next position retries.
    pub fn update_position(&mut self, position: &Coordinate) -> Result<bool, FetchError> {
        if !position.is_valid() {
            return Err(FetchError::InvalidPosition(*position));
        }
        if !self.planner.needs_refresh(position) {
            return Ok(false);
        }

        let response = self.client.fetch(&self.planner.bounds(position))?;
        self.polygons = response.building_polygons();
        self.planner.mark_fetched(*position);

        info!(
            buildings = self.polygons.len(),
            position = %position,
            "Building footprints refreshed"
        );
        Ok(true)
    }

    /// Project the stored footprints around `position`.
    pub fn local_buildings(&self, position: &Coordinate) -> Result<ProjectionReport, ProjectionError> {
        self.projector.project_all(position, &self.polygons)
    }

    /// Footprints from the last successful fetch.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn planner(&self) -> &FetchPlanner {
        &self.planner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    const RESPONSE: &str = r#"{"elements": [
        {"type": "way", "id": 1, "nodes": [10, 11, 12, 10], "tags": {"building": "yes"}},
        {"type": "way", "id": 2, "nodes": [10, 11], "tags": {"building": "yes"}},
        {"type": "node", "id": 10, "lat": 52.5201, "lon": 13.4051},
        {"type": "node", "id": 11, "lat": 52.5201, "lon": 13.4052},
        {"type": "node", "id": 12, "lat": 52.5202, "lon": 13.4052}
    ]}"#;

    fn loader(response: Result<Vec<u8>, ProviderError>) -> BuildingLoader<MockHttpClient> {
        let client = OverpassClient::new(MockHttpClient::new(response), DEFAULT_OVERPASS_URL);
        BuildingLoader::new(client, FetchPlanner::new(500.0), GeoProjector::default())
    }

    #[test]
    fn test_fetch_posts_query() {
        let client = OverpassClient::new(
            MockHttpClient::new(Ok(RESPONSE.as_bytes().to_vec())),
            "http://overpass.test/api",
        );
        let bbox = BoundingBox::around(Coordinate::new(52.52, 13.405), 500.0);

        let response = client.fetch(&bbox).unwrap();
        assert_eq!(response.elements.len(), 5);

        let (url, body) = client.http.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(url, "http://overpass.test/api");
        assert!(body.contains("way[\"building\"]"));
    }

    #[test]
    fn test_fetch_parse_error() {
        let client = OverpassClient::new(MockHttpClient::new(Ok(b"<html>".to_vec())), "u");
        let bbox = BoundingBox::around(Coordinate::new(0.0, 0.0), 10.0);
        assert!(matches!(client.fetch(&bbox), Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_update_position_fetches_once_then_waits() {
        let mut loader = loader(Ok(RESPONSE.as_bytes().to_vec()));
        let here = Coordinate::new(52.52, 13.405);

        assert!(loader.update_position(&here).unwrap());
        assert_eq!(loader.polygons().len(), 2);
        assert_eq!(loader.planner().last_fetched(), Some(here));

        // ~11 m away: inside the hysteresis band
        assert!(!loader.update_position(&Coordinate::new(52.5201, 13.405)).unwrap());
    }

    #[test]
    fn test_local_buildings_reports_degenerate_way() {
        let mut loader = loader(Ok(RESPONSE.as_bytes().to_vec()));
        let here = Coordinate::new(52.52, 13.405);
        loader.update_position(&here).unwrap();

        let report = loader.local_buildings(&here).unwrap();
        assert_eq!(report.projected.len(), 1);
        assert_eq!(report.projected[0].id, Some(1));
        assert_eq!(report.projected[0].height_m, 10.0);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].id, Some(2));
    }

    #[test]
    fn test_failed_fetch_keeps_planner_state() {
        let mut loader = loader(Err(ProviderError::HttpError("HTTP 504".to_string())));
        let here = Coordinate::new(52.52, 13.405);

        assert!(matches!(
            loader.update_position(&here),
            Err(FetchError::Provider(_))
        ));
        assert!(loader.planner().last_fetched().is_none());
        assert!(loader.polygons().is_empty());
    }

    #[test]
    fn test_invalid_position() {
        let mut loader = loader(Ok(RESPONSE.as_bytes().to_vec()));
        assert!(matches!(
            loader.update_position(&Coordinate::new(f64::NAN, 0.0)),
            Err(FetchError::InvalidPosition(_))
        ));
    }
}
