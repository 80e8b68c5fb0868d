//! Buildings command.
//!
//! Loads building footprints around a position, either live from the
//! Overpass API or from a saved response, and writes them in the local
//! metric frame as JSON.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use geofpv::buildings::{
    BuildingLoader, FetchError, FetchPlanner, OverpassClient, OverpassResponse,
};
use geofpv::config::ConfigFile;
use geofpv::geo::{Coordinate, GeoProjector, ProjectionReport};
use geofpv::provider::ReqwestClient;
use serde_json::json;
use tracing::info;

use super::common::read_all;
use crate::error::CliError;

/// Arguments for the buildings command.
#[derive(Debug, Args)]
pub struct BuildingsArgs {
    /// Observer latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Observer longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Query radius in meters (overrides config)
    #[arg(long)]
    pub radius: Option<f64>,

    /// Saved Overpass JSON response to read instead of querying ("-" for stdin)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Run the buildings command.
pub fn run(args: BuildingsArgs, config: &ConfigFile, out: &mut impl Write) -> Result<(), CliError> {
    let position = Coordinate::new(args.lat, args.lon);
    if !position.is_valid() {
        return Err(CliError::InvalidArgument(format!(
            "position {} is out of range",
            position
        )));
    }

    let projector = config.projector();
    let report = match &args.input {
        Some(path) => {
            let body = read_all(path)?;
            project_response(&body, &position, &projector)?
        }
        None => fetch_and_project(&position, args.radius, config)?,
    };

    info!(
        projected = report.projected.len(),
        rejected = report.rejected.len(),
        "Buildings ready"
    );

    let document = report_json(&position, &report);
    let text = serde_json::to_string_pretty(&document)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    match &args.output {
        Some(path) => fs::write(path, text + "\n").map_err(|error| CliError::FileWrite {
            path: path.display().to_string(),
            error,
        }),
        None => writeln!(out, "{}", text).map_err(|error| CliError::FileWrite {
            path: "<stdout>".to_string(),
            error,
        }),
    }
}

/// Project a saved Overpass response around `position`.
pub fn project_response(
    body: &[u8],
    position: &Coordinate,
    projector: &GeoProjector,
) -> Result<ProjectionReport, CliError> {
    let response = OverpassResponse::from_slice(body).map_err(FetchError::Parse)?;
    let polygons = response.building_polygons();
    Ok(projector.project_all(position, &polygons)?)
}

fn fetch_and_project(
    position: &Coordinate,
    radius: Option<f64>,
    config: &ConfigFile,
) -> Result<ProjectionReport, CliError> {
    let mut planner = config.fetch_planner();
    if let Some(r) = radius {
        if !(r.is_finite() && r > 0.0) {
            return Err(CliError::InvalidArgument(format!(
                "radius must be a positive number of meters, got {}",
                r
            )));
        }
        planner = FetchPlanner::new(r);
    }

    let http = ReqwestClient::with_timeout(config.overpass.timeout_secs)?;
    let client = OverpassClient::new(http, config.overpass.url.clone());
    let mut loader = BuildingLoader::new(client, planner, config.projector());

    loader.update_position(position)?;
    Ok(loader.local_buildings(position)?)
}

/// Build the output document.
pub fn report_json(position: &Coordinate, report: &ProjectionReport) -> serde_json::Value {
    let rejected: Vec<serde_json::Value> = report
        .rejected
        .iter()
        .map(|r| {
            json!({
                "index": r.index,
                "id": r.id,
                "reason": r.error.to_string(),
            })
        })
        .collect();

    json!({
        "reference": position,
        "buildings": report.projected,
        "rejected": rejected,
    })
}
