//! INI serialization logic for converting `ConfigFile` → INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[heading]
; Weight of the newest compass reading (0 = frozen, 1 = no smoothing)
smoothing_factor = {smoothing}

[buildings]
; Radius in meters of the building query around the current position.
; Data is fetched again after moving more than half this distance.
fetch_radius = {radius}
; Height in meters for buildings without height or building:levels tags
default_height = {default_height}
; Meters per storey when only building:levels is tagged
meters_per_level = {per_level}
; Orientation of the local z axis:
;   north_positive_z - north is +z
;   north_negative_z - north is -z (cameras looking down -z)
axis = {axis}

[overpass]
; Overpass API interpreter endpoint
url = {url}
; Request timeout in seconds
timeout = {timeout}

[position]
; GPS fixes less accurate than this many meters are logged as warnings
accuracy_warning = {accuracy}

[logging]
directory = {log_dir}
file = {log_file}
"#,
        smoothing = config.heading.smoothing_factor,
        radius = config.buildings.fetch_radius_m,
        default_height = config.buildings.default_height_m,
        per_level = config.buildings.meters_per_level,
        axis = config.buildings.axis,
        url = config.overpass.url,
        timeout = config.overpass.timeout_secs,
        accuracy = config.position.accuracy_warning_m,
        log_dir = config.logging.directory.display(),
        log_file = config.logging.file,
    )
}
