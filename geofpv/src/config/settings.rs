//! Settings structs and their defaults.

use std::path::PathBuf;

use crate::buildings::{FetchPlanner, DEFAULT_FETCH_RADIUS_M, DEFAULT_OVERPASS_URL};
use crate::geo::{
    AxisConvention, GeoProjector, ProjectorConfig, DEFAULT_BUILDING_HEIGHT_M,
    DEFAULT_METERS_PER_LEVEL,
};
use crate::heading::{HeadingError, HeadingFilter, DEFAULT_SMOOTHING_FACTOR};
use crate::position::{PositionTracker, DEFAULT_ACCURACY_WARNING_M};
use crate::provider::DEFAULT_TIMEOUT_SECS;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "geofpv.log";

/// Default directory for log files.
pub fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("geofpv")
        .join("logs")
}

/// All user-configurable settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub heading: HeadingSettings,
    pub buildings: BuildingSettings,
    pub overpass: OverpassSettings,
    pub position: PositionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadingSettings {
    /// Weight of the newest compass sample, in `[0, 1]`.
    pub smoothing_factor: f64,
}

impl Default for HeadingSettings {
    fn default() -> Self {
        Self {
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildingSettings {
    /// Query radius around the observer in meters.
    pub fetch_radius_m: f64,
    /// Height for untagged buildings in meters.
    pub default_height_m: f64,
    /// Storey height in meters.
    pub meters_per_level: f64,
    pub axis: AxisConvention,
}

impl Default for BuildingSettings {
    fn default() -> Self {
        Self {
            fetch_radius_m: DEFAULT_FETCH_RADIUS_M,
            default_height_m: DEFAULT_BUILDING_HEIGHT_M,
            meters_per_level: DEFAULT_METERS_PER_LEVEL,
            axis: AxisConvention::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverpassSettings {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for OverpassSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_OVERPASS_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionSettings {
    /// Fixes less accurate than this are logged as warnings.
    pub accuracy_warning_m: f64,
}

impl Default for PositionSettings {
    fn default() -> Self {
        Self {
            accuracy_warning_m: DEFAULT_ACCURACY_WARNING_M,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl ConfigFile {
    /// Heading filter with the configured smoothing factor.
    pub fn heading_filter(&self) -> Result<HeadingFilter, HeadingError> {
        HeadingFilter::new(self.heading.smoothing_factor)
    }

    /// Projector with the configured height policy and axis convention.
    pub fn projector(&self) -> GeoProjector {
        GeoProjector::new(ProjectorConfig {
            default_height_m: self.buildings.default_height_m,
            meters_per_level: self.buildings.meters_per_level,
            axis: self.buildings.axis,
        })
    }

    pub fn fetch_planner(&self) -> FetchPlanner {
        FetchPlanner::new(self.buildings.fetch_radius_m)
    }

    pub fn position_tracker(&self) -> PositionTracker {
        PositionTracker::new(self.position.accuracy_warning_m)
    }
}
