//! Compass heading processing.
//!
//! Raw device orientation samples go through a [`HeadingFilter`] that
//! applies a calibration offset and wraparound-aware exponential smoothing.
//! [`HeadingTracker`] wraps a filter and publishes the result on a watch
//! channel for renderers to poll.
//!
//! # Example
//!
//! ```
//! use geofpv::heading::{HeadingFilter, HeadingTracker, OrientationSample};
//!
//! let mut tracker = HeadingTracker::new(HeadingFilter::new(0.2).unwrap());
//! let rx = tracker.subscribe();
//!
//! tracker.process(&OrientationSample::from_alpha(45.0)).unwrap();
//! let latest = *rx.borrow();
//! assert_eq!(latest.map(|o| o.heading), Some(315.0));
//! ```

mod filter;
mod sample;
mod tracker;

pub use filter::{HeadingError, HeadingFilter, DEFAULT_SMOOTHING_FACTOR};
pub use sample::{Orientation, OrientationSample};
pub use tracker::HeadingTracker;

/// Camera yaw for a compass heading, in radians.
///
/// The scene's camera faces `+x` at yaw 0 and turns counter-clockwise, so
/// heading 90° (east) maps to yaw 0 and heading 0° (north) to π/2.
#[inline]
pub fn camera_yaw_radians(heading: f64) -> f64 {
    (90.0 - heading).to_radians()
}
