//! GPS position fixes.
//!
//! Validates incoming fixes, flags poor accuracy, and publishes the latest
//! fix on a watch channel so the scene can reposition at its own pace.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::geo::Coordinate;

/// Accuracy (meters) above which a fix is logged as imprecise.
pub const DEFAULT_ACCURACY_WARNING_M: f64 = 50.0;

/// A single position report from the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters.
    pub accuracy_m: f64,
    pub altitude_m: Option<f64>,
    /// Direction of travel in degrees, when moving.
    pub heading: Option<f64>,
    pub speed_mps: Option<f64>,
    pub timestamp_ms: u64,
}

impl PositionFix {
    pub fn new(coordinate: Coordinate, accuracy_m: f64) -> Self {
        Self {
            coordinate,
            accuracy_m,
            altitude_m: None,
            heading: None,
            speed_mps: None,
            timestamp_ms: 0,
        }
    }
}

/// Errors produced by [`PositionTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PositionError {
    #[error("Invalid position: {0}")]
    InvalidCoordinate(Coordinate),

    #[error("Invalid accuracy: {0}")]
    InvalidAccuracy(f64),
}

/// Holds the latest valid fix.
#[derive(Debug)]
pub struct PositionTracker {
    tx: watch::Sender<Option<PositionFix>>,
    accuracy_warning_m: f64,
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ACCURACY_WARNING_M)
    }
}

impl PositionTracker {
    pub fn new(accuracy_warning_m: f64) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            tx,
            accuracy_warning_m,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<PositionFix>> {
        self.tx.subscribe()
    }

    /// Accept a fix and publish it.
    ///
    /// Returns `true` when the fix meets the accuracy target. Imprecise
    /// fixes are still published; invalid ones are rejected.
    pub fn update(&self, fix: PositionFix) -> Result<bool, PositionError> {
        if !fix.coordinate.is_valid() {
            return Err(PositionError::InvalidCoordinate(fix.coordinate));
        }
        if !fix.accuracy_m.is_finite() || fix.accuracy_m < 0.0 {
            return Err(PositionError::InvalidAccuracy(fix.accuracy_m));
        }

        let precise = fix.accuracy_m <= self.accuracy_warning_m;
        if !precise {
            warn!(
                accuracy_m = fix.accuracy_m,
                target_m = self.accuracy_warning_m,
                "GPS accuracy above target"
            );
        }
        debug!(position = %fix.coordinate, accuracy_m = fix.accuracy_m, "Position updated");

        self.tx.send_replace(Some(fix));
        Ok(precise)
    }

    pub fn latest(&self) -> Option<PositionFix> {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_publishes_fix() {
        let tracker = PositionTracker::default();
        let rx = tracker.subscribe();

        let fix = PositionFix::new(Coordinate::new(52.52, 13.405), 8.0);
        assert_eq!(tracker.update(fix), Ok(true));
        assert_eq!(*rx.borrow(), Some(fix));
        assert_eq!(tracker.latest(), Some(fix));
    }

    #[test]
    fn test_imprecise_fix_is_still_published() {
        let tracker = PositionTracker::new(50.0);
        let fix = PositionFix::new(Coordinate::new(52.52, 13.405), 120.0);
        assert_eq!(tracker.update(fix), Ok(false));
        assert_eq!(tracker.latest(), Some(fix));
    }

    #[test]
    fn test_invalid_fix_is_rejected() {
        let tracker = PositionTracker::default();

        let bad = PositionFix::new(Coordinate::new(95.0, 13.405), 5.0);
        assert!(matches!(
            tracker.update(bad),
            Err(PositionError::InvalidCoordinate(_))
        ));

        let bad = PositionFix::new(Coordinate::new(52.0, 13.0), f64::NAN);
        assert!(matches!(
            tracker.update(bad),
            Err(PositionError::InvalidAccuracy(_))
        ));

        assert!(tracker.latest().is_none());
    }
}
