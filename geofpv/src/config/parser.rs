//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [heading] section
    if let Some(section) = ini.section(Some("heading")) {
        if let Some(v) = section.get("smoothing_factor") {
            config.heading.smoothing_factor = parse_f64(
                "heading",
                "smoothing_factor",
                v,
                |f| (0.0..=1.0).contains(&f),
                "must be a number between 0 and 1",
            )?;
        }
    }

    // [buildings] section
    if let Some(section) = ini.section(Some("buildings")) {
        if let Some(v) = section.get("fetch_radius") {
            config.buildings.fetch_radius_m = parse_f64(
                "buildings",
                "fetch_radius",
                v,
                |f| f > 0.0,
                "must be a positive number of meters",
            )?;
        }
        if let Some(v) = section.get("default_height") {
            config.buildings.default_height_m = parse_f64(
                "buildings",
                "default_height",
                v,
                |f| f >= 0.0,
                "must be a non-negative number of meters",
            )?;
        }
        if let Some(v) = section.get("meters_per_level") {
            config.buildings.meters_per_level = parse_f64(
                "buildings",
                "meters_per_level",
                v,
                |f| f > 0.0,
                "must be a positive number of meters",
            )?;
        }
        if let Some(v) = section.get("axis") {
            config.buildings.axis = v.parse().map_err(|reason| ConfigFileError::InvalidValue {
                section: "buildings".to_string(),
                key: "axis".to_string(),
                value: v.to_string(),
                reason,
            })?;
        }
    }

    // [overpass] section
    if let Some(section) = ini.section(Some("overpass")) {
        if let Some(v) = section.get("url") {
            let v = v.trim();
            if !v.is_empty() {
                if !(v.starts_with("http://") || v.starts_with("https://")) {
                    return Err(ConfigFileError::InvalidValue {
                        section: "overpass".to_string(),
                        key: "url".to_string(),
                        value: v.to_string(),
                        reason: "must be an http:// or https:// URL".to_string(),
                    });
                }
                config.overpass.url = v.to_string();
            }
        }
        if let Some(v) = section.get("timeout") {
            config.overpass.timeout_secs = v
                .trim()
                .parse()
                .ok()
                .filter(|t| *t > 0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "overpass".to_string(),
                    key: "timeout".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer (seconds)".to_string(),
                })?;
        }
    }

    // [position] section
    if let Some(section) = ini.section(Some("position")) {
        if let Some(v) = section.get("accuracy_warning") {
            config.position.accuracy_warning_m = parse_f64(
                "position",
                "accuracy_warning",
                v,
                |f| f >= 0.0,
                "must be a non-negative number of meters",
            )?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

/// Parse a finite float and check it against `valid`.
fn parse_f64(
    section: &str,
    key: &str,
    value: &str,
    valid: impl Fn(f64) -> bool,
    reason: &str,
) -> Result<f64, ConfigFileError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && valid(*f))
        .ok_or_else(|| ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
