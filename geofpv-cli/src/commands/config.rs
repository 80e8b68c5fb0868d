//! Configuration management CLI commands.
//!
//! Provides `config init`, `config show`, and `config path`.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use geofpv::config::{config_file_path, ConfigFile};

use super::common::load_config;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against `path` (or the default location).
pub fn run(
    command: ConfigCommands,
    path: Option<&Path>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let path: PathBuf = path.map(Path::to_path_buf).unwrap_or_else(config_file_path);

    let text = match command {
        ConfigCommands::Init { force } => run_init(&path, force)?,
        ConfigCommands::Show => load_config(Some(&path))?.to_ini(),
        ConfigCommands::Path => path.display().to_string(),
    };

    writeln!(out, "{}", text.trim_end()).map_err(|error| CliError::FileWrite {
        path: "<stdout>".to_string(),
        error,
    })
}

fn run_init(path: &Path, force: bool) -> Result<String, CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )));
    }

    ConfigFile::default().save_to(path)?;
    Ok(format!("Wrote default configuration to {}", path.display()))
}
