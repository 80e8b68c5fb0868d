//! Heading tracker: filter plus a latest-value channel.
//!
//! Replaces a callback list with a [`tokio::sync::watch`] channel. The
//! sensor side pushes samples at whatever rate the device produces them;
//! consumers read the most recent orientation at their own frame rate.

use tokio::sync::watch;
use tracing::{debug, trace};

use super::filter::{HeadingError, HeadingFilter};
use super::sample::{Orientation, OrientationSample};

/// Owns a [`HeadingFilter`] and publishes every accepted reading.
#[derive(Debug)]
pub struct HeadingTracker {
    filter: HeadingFilter,
    tx: watch::Sender<Option<Orientation>>,
    /// Latched once any absolute sample has been seen.
    absolute: bool,
}

impl HeadingTracker {
    pub fn new(filter: HeadingFilter) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            filter,
            tx,
            absolute: false,
        }
    }

    /// Subscribe to orientation updates.
    ///
    /// The receiver starts with the latest value (or `None`).
    pub fn subscribe(&self) -> watch::Receiver<Option<Orientation>> {
        self.tx.subscribe()
    }

    /// Run a sample through the filter and publish the result.
    ///
    /// Rejected samples publish nothing.
    pub fn process(&mut self, sample: &OrientationSample) -> Result<Orientation, HeadingError> {
        let heading = match self.filter.update(sample) {
            Ok(h) => h,
            Err(e) => {
                debug!(error = %e, timestamp_ms = sample.timestamp_ms, "Orientation sample rejected");
                return Err(e);
            }
        };

        if sample.absolute && !self.absolute {
            debug!("Absolute orientation available");
            self.absolute = true;
        }

        let orientation = Orientation {
            heading,
            beta: sample.beta,
            gamma: sample.gamma,
            absolute: sample.absolute || self.absolute,
            timestamp_ms: sample.timestamp_ms,
        };
        trace!(heading, "Heading updated");

        self.tx.send_replace(Some(orientation));
        Ok(orientation)
    }

    /// Calibrate against a known true-north heading and republish.
    pub fn calibrate(&mut self, true_north: f64) -> Result<(), HeadingError> {
        self.filter.set_calibration(true_north)?;
        debug!(
            offset = self.filter.calibration_offset(),
            "Compass calibrated"
        );

        if let (Some(latest), Some(heading)) = (self.latest(), self.filter.current_heading()) {
            self.tx.send_replace(Some(Orientation { heading, ..latest }));
        }
        Ok(())
    }

    /// Most recently published orientation.
    pub fn latest(&self) -> Option<Orientation> {
        *self.tx.borrow()
    }

    pub fn uses_absolute_orientation(&self) -> bool {
        self.absolute
    }

    pub fn filter(&self) -> &HeadingFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut HeadingFilter {
        &mut self.filter
    }
}

impl Default for HeadingTracker {
    fn default() -> Self {
        Self::new(HeadingFilter::default())
    }
}
