//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::io;
use std::process;

use geofpv::buildings::FetchError;
use geofpv::config::ConfigFileError;
use geofpv::geo::ProjectionError;
use geofpv::heading::HeadingError;
use geofpv::provider::ProviderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Configuration file could not be read or written
    ConfigFile(ConfigFileError),
    /// Bad command-line value
    InvalidArgument(String),
    /// Failed to read an input file or stdin
    Read { path: String, error: io::Error },
    /// Failed to write output file
    FileWrite { path: String, error: io::Error },
    /// Heading filter rejected a setting
    Heading(HeadingError),
    /// HTTP client could not be created
    Provider(ProviderError),
    /// Overpass request or response failed
    Fetch(FetchError),
    /// Observer position could not be used for projection
    Projection(ProjectionError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Fetch(FetchError::Provider(_)) => {
                eprintln!();
                eprintln!("The Overpass API may be busy or unreachable.");
                eprintln!("  1. Retry in a few seconds");
                eprintln!("  2. Set [overpass] url in config.ini to another instance");
                eprintln!("  3. Or pass a saved response with --input");
            }
            CliError::ConfigFile(_) => {
                eprintln!();
                eprintln!("Run 'geofpv config path' to locate the config file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Read { path, error } => {
                write!(f, "Failed to read '{}': {}", path, error)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
            CliError::Heading(e) => write!(f, "Heading filter error: {}", e),
            CliError::Provider(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Fetch(e) => write!(f, "Failed to load buildings: {}", e),
            CliError::Projection(e) => write!(f, "Projection failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Read { error, .. } => Some(error),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Heading(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            CliError::Projection(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<HeadingError> for CliError {
    fn from(e: HeadingError) -> Self {
        CliError::Heading(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}

impl From<ProjectionError> for CliError {
    fn from(e: ProjectionError) -> Self {
        CliError::Projection(e)
    }
}
