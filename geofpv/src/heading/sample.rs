//! Orientation sample types.

use serde::{Deserialize, Serialize};

/// One raw reading from the device orientation sensor.
///
/// Field names follow the DeviceOrientation event so recorded sessions can
/// be replayed as JSON lines.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationSample {
    /// Rotation around the z axis in degrees [0, 360). `None` when the
    /// device cannot provide it.
    #[serde(default)]
    pub alpha: Option<f64>,
    /// Front/back tilt in degrees [-180, 180).
    #[serde(default)]
    pub beta: Option<f64>,
    /// Left/right tilt in degrees [-90, 90).
    #[serde(default)]
    pub gamma: Option<f64>,
    /// Whether alpha is referenced to magnetic north.
    #[serde(default)]
    pub absolute: bool,
    /// Sensor timestamp in milliseconds.
    #[serde(default, alias = "timestamp")]
    pub timestamp_ms: u64,
}

impl OrientationSample {
    /// Sample carrying only a compass angle.
    pub fn from_alpha(alpha: f64) -> Self {
        Self {
            alpha: Some(alpha),
            ..Default::default()
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

/// Smoothed, calibrated orientation handed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Orientation {
    /// Compass heading in degrees [0, 360), 0 = north, clockwise.
    pub heading: f64,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub absolute: bool,
    pub timestamp_ms: u64,
}
