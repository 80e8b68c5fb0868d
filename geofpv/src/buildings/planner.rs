//! Decides when the building query has to be re-run.

use crate::geo::{should_refetch, BoundingBox, Coordinate};

/// Default query radius around the observer, in meters.
pub const DEFAULT_FETCH_RADIUS_M: f64 = 500.0;

/// Tracks where building data was last fetched.
///
/// A new query is due once the observer has moved more than half the
/// radius, so small GPS jitter never triggers a refetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlanner {
    radius_m: f64,
    last_fetched: Option<Coordinate>,
}

impl Default for FetchPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_RADIUS_M)
    }
}

impl FetchPlanner {
    pub fn new(radius_m: f64) -> Self {
        Self {
            radius_m,
            last_fetched: None,
        }
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn last_fetched(&self) -> Option<Coordinate> {
        self.last_fetched
    }

    /// Whether a query centered on `position` should be issued.
    pub fn needs_refresh(&self, position: &Coordinate) -> bool {
        should_refetch(self.last_fetched.as_ref(), position, self.radius_m)
    }

    /// Query area for a fetch centered on `position`.
    pub fn bounds(&self, position: &Coordinate) -> BoundingBox {
        BoundingBox::around(*position, self.radius_m)
    }

    /// Record a successful fetch centered on `position`.
    pub fn mark_fetched(&mut self, position: Coordinate) {
        self.last_fetched = Some(position);
    }

    /// Forget the last fetch; the next position triggers a query.
    pub fn reset(&mut self) {
        self.last_fetched = None;
    }
}
