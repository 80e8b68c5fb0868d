//! Configuration file for the geofpv tools.
//!
//! Settings live in an INI file (by default `<config dir>/geofpv/config.ini`).
//! A missing file means defaults. Each section maps onto the constructor
//! arguments of one component:
//!
//! - `[heading]` → [`HeadingFilter`](crate::heading::HeadingFilter)
//! - `[buildings]` → [`GeoProjector`](crate::geo::GeoProjector) and
//!   [`FetchPlanner`](crate::buildings::FetchPlanner)
//! - `[overpass]` → [`OverpassClient`](crate::buildings::OverpassClient)
//! - `[position]` → [`PositionTracker`](crate::position::PositionTracker)
//! - `[logging]` → [`init_logging`](crate::logging::init_logging)
//!
//! # Example
//!
//! ```
//! use geofpv::config::ConfigFile;
//!
//! let config = ConfigFile::from_ini_str("[heading]\nsmoothing_factor = 0.5\n").unwrap();
//! assert_eq!(config.heading.smoothing_factor, 0.5);
//! ```

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    default_log_directory, BuildingSettings, ConfigFile, HeadingSettings, LoggingSettings,
    OverpassSettings, PositionSettings, DEFAULT_LOG_FILE,
};
