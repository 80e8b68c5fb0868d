//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`buildings`] - Fetch and project building footprints
//! - [`config`] - Configuration management (init, show, path)
//! - [`distance`] - Great-circle distance between two points
//! - [`heading`] - Smooth a stream of compass samples

pub mod buildings;
pub mod common;
pub mod config;
pub mod distance;
pub mod heading;
