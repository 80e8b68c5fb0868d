//! Common types and utilities shared across CLI commands.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use geofpv::config::ConfigFile;
use geofpv::geo::Coordinate;

use crate::error::CliError;

/// Parse a `LAT,LON` pair for clap arguments.
pub fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{}'", value))?;

    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;

    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_valid() {
        return Err(format!("coordinate {} is out of range", coordinate));
    }
    Ok(coordinate)
}

/// Load settings from `--config` or the default location.
///
/// A missing file yields defaults; a malformed one is an error.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(p) => ConfigFile::load_from(p)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Open a file for line reading, or stdin when no path is given.
pub fn open_lines(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>, CliError> {
    match path {
        Some(p) => {
            let file = File::open(p).map_err(|error| CliError::Read {
                path: p.display().to_string(),
                error,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Read a whole file, or stdin when the path is `-`.
pub fn read_all(path: &Path) -> Result<Vec<u8>, CliError> {
    let mut buf = Vec::new();
    let result = if path == Path::new("-") {
        io::stdin().read_to_end(&mut buf).map(|_| ())
    } else {
        File::open(path).and_then(|mut f| f.read_to_end(&mut buf).map(|_| ()))
    };

    result.map_err(|error| CliError::Read {
        path: path.display().to_string(),
        error,
    })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_coordinate() {
        let c = parse_coordinate("52.52,13.405").unwrap();
        assert_eq!(c, Coordinate::new(52.52, 13.405));
    }

    #[test]
    fn test_parse_coordinate_with_spaces() {
        let c = parse_coordinate(" -33.8688 , 151.2093 ").unwrap();
        assert_eq!(c, Coordinate::new(-33.8688, 151.2093));
    }

    #[test]
    fn test_parse_coordinate_rejects_garbage() {
        assert!(parse_coordinate("52.52").is_err());
        assert!(parse_coordinate("north,east").is_err());
        assert!(parse_coordinate("91.0,0.0").is_err());
        assert!(parse_coordinate("0.0,181.0").is_err());
    }

    #[test]
    fn test_load_config_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(Some(&temp.path().join("absent.ini"))).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_config_invalid_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[heading]\nsmoothing_factor = lots\n").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(CliError::ConfigFile(_))));
    }

    #[test]
    fn test_open_lines_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("samples.jsonl");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "first").unwrap();
        writeln!(file, "second").unwrap();

        let lines: Vec<String> = open_lines(Some(&path))
            .unwrap()
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_read_all_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = read_all(&temp.path().join("nope.json"));
        assert!(matches!(result, Err(CliError::Read { .. })));
    }
}
