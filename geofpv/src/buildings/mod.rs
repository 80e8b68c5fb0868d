//! Building footprints from OpenStreetMap.
//!
//! Queries the Overpass API for building ways around the observer, flattens
//! the response into geographic [`Polygon`](crate::geo::Polygon)s and hands
//! them to the [`GeoProjector`](crate::geo::GeoProjector).

mod loader;
mod overpass;
mod planner;

pub use loader::{BuildingLoader, FetchError, OverpassClient, DEFAULT_OVERPASS_URL};
pub use overpass::{
    overpass_query, parse_leading_number, Element, OverpassResponse, HEIGHT_TAG, LEVELS_TAG,
};
pub use planner::{FetchPlanner, DEFAULT_FETCH_RADIUS_M};
