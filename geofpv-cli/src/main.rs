//! GeoFPV CLI - Command-line interface
//!
//! Exposes the geofpv library: distance checks, compass smoothing over
//! recorded samples, and building footprint projection.

mod commands;
mod error;

use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use geofpv::config::ConfigFile;
use geofpv::logging::{init_logging, LoggingGuard};
use tracing::debug;

use commands::buildings::BuildingsArgs;
use commands::common::load_config;
use commands::config::ConfigCommands;
use commands::distance::DistanceArgs;
use commands::heading::HeadingArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "geofpv")]
#[command(version)]
#[command(about = "First-person geo view core: compass smoothing and building projection", long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Great-circle distance in meters between two points
    Distance(DistanceArgs),

    /// Smooth a stream of JSON-lines orientation samples
    Heading(HeadingArgs),

    /// Fetch building footprints and project them around a position
    Buildings(BuildingsArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    let config_path = cli.config.as_deref();

    match cli.command {
        // Config commands must work even when the file is broken
        Commands::Config { command } => commands::config::run(command, config_path, &mut stdout),
        Commands::Distance(args) => {
            let (_config, _guard) = prepare(config_path, cli.verbose)?;
            commands::distance::run(args, &mut stdout)
        }
        Commands::Heading(args) => {
            let (config, _guard) = prepare(config_path, cli.verbose)?;
            commands::heading::run(args, &config, &mut stdout)
        }
        Commands::Buildings(args) => {
            let (config, _guard) = prepare(config_path, cli.verbose)?;
            commands::buildings::run(args, &config, &mut stdout)
        }
    }
}

/// Load settings and start logging for a working command.
fn prepare(
    config_path: Option<&Path>,
    verbose: bool,
) -> Result<(ConfigFile, LoggingGuard), CliError> {
    let config = load_config(config_path)?;
    let guard = start_logging(&config, verbose)?;
    debug!(config = ?config_path, "Configuration loaded");
    Ok((config, guard))
}

fn start_logging(
    config: &ConfigFile,
    verbose: bool,
) -> Result<LoggingGuard, CliError> {
    let level = if verbose { "debug" } else { "info" };
    init_logging(&config.logging.directory, &config.logging.file, level)
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}
