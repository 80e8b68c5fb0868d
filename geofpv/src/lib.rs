//! geofpv - sensor fusion and projection core for a first-person map view
//!
//! The library turns two noisy inputs into something a 3D scene can use
//! directly:
//!
//! - [`heading`]: compass samples → calibrated, smoothed heading
//! - [`geo`]: building footprints in lat/lon → meters around the observer
//!
//! Supporting modules fetch OpenStreetMap building data ([`buildings`],
//! [`provider`]), track GPS fixes ([`position`]), and load settings
//! ([`config`]) and logging ([`logging`]) for the command-line tool.

pub mod buildings;
pub mod config;
pub mod geo;
pub mod heading;
pub mod logging;
pub mod position;
pub mod provider;
