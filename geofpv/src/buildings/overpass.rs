//! Overpass API query text and response model.
//!
//! The response is a flat element list: building ways reference nodes by
//! id, and the nodes follow (thanks to `>; out skel qt;`) with only their
//! coordinates. Flattening resolves those references into [`Polygon`]s.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geo::{BoundingBox, Coordinate, Polygon};

/// Tag holding an explicit building height.
pub const HEIGHT_TAG: &str = "height";

/// Tag holding the number of above-ground levels.
pub const LEVELS_TAG: &str = "building:levels";

const BUILDING_TAG: &str = "building";

/// Build the Overpass QL query for all buildings inside `bbox`.
pub fn overpass_query(bbox: &BoundingBox) -> String {
    format!(
        "[out:json];\n\
         (\n  way[\"building\"]({bbox});\n  relation[\"building\"]({bbox});\n);\n\
         out body;\n>;\nout skel qt;\n",
        bbox = bbox
    )
}

/// One element of an Overpass JSON response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node {
        id: u64,
        lat: f64,
        lon: f64,
    },
    Way {
        id: u64,
        #[serde(default)]
        nodes: Vec<u64>,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    Relation {
        id: u64,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    #[serde(other)]
    Other,
}

/// Top-level Overpass JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl OverpassResponse {
    /// Parse a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Resolve every building way into a geographic footprint.
    ///
    /// Node references that are missing from the response are dropped, as
    /// is a closing vertex that repeats the first one. Ways left with fewer
    /// than three vertices are still returned so the projector can report
    /// them. Multipolygon relations are not assembled.
    pub fn building_polygons(&self) -> Vec<Polygon> {
        let nodes: HashMap<u64, Coordinate> = self
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Node { id, lat, lon } => Some((*id, Coordinate::new(*lat, *lon))),
                _ => None,
            })
            .collect();

        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Way { id, nodes: refs, tags } if is_building(tags) => {
                    Some(way_polygon(*id, refs, tags, &nodes))
                }
                _ => None,
            })
            .collect()
    }
}

fn is_building(tags: &BTreeMap<String, String>) -> bool {
    tags.get(BUILDING_TAG)
        .map(|v| !v.is_empty() && v != "no")
        .unwrap_or(false)
}

fn way_polygon(
    id: u64,
    refs: &[u64],
    tags: &BTreeMap<String, String>,
    nodes: &HashMap<u64, Coordinate>,
) -> Polygon {
    let mut vertices: Vec<Coordinate> = refs.iter().filter_map(|r| nodes.get(r).copied()).collect();

    let missing = refs.len() - vertices.len();
    if missing > 0 {
        debug!(way_id = id, missing, "Building references unknown nodes");
    }

    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    Polygon {
        id: Some(id),
        vertices,
        height_m: tags.get(HEIGHT_TAG).and_then(|v| parse_leading_number(v)),
        levels: tags.get(LEVELS_TAG).and_then(|v| parse_leading_number(v)),
        kind: tags.get(BUILDING_TAG).cloned(),
    }
}

/// Parse the numeric prefix of a tag value (`"12 m"` → 12, `"3.5"` → 3.5).
///
/// Returns `None` when the value does not start with a number.
pub fn parse_leading_number(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in value.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    value[..end].trim_end_matches('.').parse().ok()
}
