//! Calibrated exponential smoothing of compass headings.
//!
//! The sensor's alpha angle runs counter-clockwise, so a heading is derived
//! as `360 - (alpha + offset)` and then folded into `[0, 360)`. Smoothing
//! interpolates along the shorter arc between the previous heading and the
//! new reading, so a 350° → 10° transition moves through north instead of
//! sweeping back across south.

use thiserror::Error;

use super::sample::OrientationSample;
use crate::geo::normalize_degrees;

/// Default weight of the newest sample.
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.2;

/// Errors produced by [`HeadingFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HeadingError {
    /// The sample carried no usable compass angle.
    #[error("Orientation sample has no compass angle")]
    InvalidSample,

    /// Calibration was requested before any sample was processed.
    #[error("No orientation sample available to calibrate against")]
    NoSample,

    /// Smoothing factor outside `[0, 1]`.
    #[error("Smoothing factor {0} is outside [0, 1]")]
    OutOfRange(f64),

    /// Calibration target is not a finite angle.
    #[error("Calibration heading {0} is not a finite angle")]
    InvalidCalibration(f64),
}

/// Heading smoother with calibration offset.
///
/// # Usage
///
/// ```
/// use geofpv::heading::{HeadingFilter, OrientationSample};
///
/// let mut filter = HeadingFilter::new(0.5).unwrap();
/// filter.update(&OrientationSample::from_alpha(90.0)).unwrap();
/// assert_eq!(filter.current_heading(), Some(270.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingFilter {
    calibration_offset: f64,
    smoothing_factor: f64,
    /// Last smoothed output.
    last_heading: Option<f64>,
    /// Last calibrated reading before smoothing.
    last_raw: Option<f64>,
}

impl Default for HeadingFilter {
    fn default() -> Self {
        Self {
            calibration_offset: 0.0,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            last_heading: None,
            last_raw: None,
        }
    }
}

impl HeadingFilter {
    /// Create a filter with the given smoothing factor and no calibration.
    pub fn new(smoothing_factor: f64) -> Result<Self, HeadingError> {
        let mut filter = Self::default();
        filter.set_smoothing_factor(smoothing_factor)?;
        Ok(filter)
    }

    /// Change the smoothing factor.
    ///
    /// 0 freezes the heading after the first sample, 1 disables smoothing.
    /// Values outside `[0, 1]` (and NaN) are rejected and leave the filter
    /// unchanged.
    pub fn set_smoothing_factor(&mut self, factor: f64) -> Result<(), HeadingError> {
        if !(0.0..=1.0).contains(&factor) {
            return Err(HeadingError::OutOfRange(factor));
        }
        self.smoothing_factor = factor;
        Ok(())
    }

    /// Align the filter so the current reading corresponds to `true_north`.
    ///
    /// The offset is chosen so that the same raw alpha, fed again, yields
    /// exactly `true_north`. The smoothed heading jumps to `true_north`
    /// immediately rather than easing towards it.
    pub fn set_calibration(&mut self, true_north: f64) -> Result<(), HeadingError> {
        if !true_north.is_finite() {
            return Err(HeadingError::InvalidCalibration(true_north));
        }
        let raw = self.last_raw.ok_or(HeadingError::NoSample)?;

        let target = normalize_degrees(true_north);
        self.calibration_offset = normalize_degrees(self.calibration_offset + raw - target);
        self.last_raw = Some(target);
        self.last_heading = Some(target);
        Ok(())
    }

    /// Feed one sample and return the new smoothed heading.
    ///
    /// Samples without a finite alpha fail with
    /// [`HeadingError::InvalidSample`] and do not touch the filter state.
    pub fn update(&mut self, sample: &OrientationSample) -> Result<f64, HeadingError> {
        let alpha = sample
            .alpha
            .filter(|a| a.is_finite())
            .ok_or(HeadingError::InvalidSample)?;

        let raw = normalize_degrees(360.0 - (alpha + self.calibration_offset));

        let heading = match self.last_heading {
            None => raw,
            Some(last) => {
                let (mut from, mut to) = (last, raw);
                if (to - from).abs() > 180.0 {
                    if to < from {
                        to += 360.0;
                    } else {
                        from += 360.0;
                    }
                }
                normalize_degrees(from + self.smoothing_factor * (to - from))
            }
        };

        self.last_raw = Some(raw);
        self.last_heading = Some(heading);
        Ok(heading)
    }

    /// Last smoothed heading, or `None` before the first sample.
    pub fn current_heading(&self) -> Option<f64> {
        self.last_heading
    }

    pub fn calibration_offset(&self) -> f64 {
        self.calibration_offset
    }

    pub fn smoothing_factor(&self) -> f64 {
        self.smoothing_factor
    }

    /// Forget the heading history. Calibration and smoothing are kept.
    pub fn reset(&mut self) {
        self.last_heading = None;
        self.last_raw = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed(filter: &mut HeadingFilter, alpha: f64) -> f64 {
        filter.update(&OrientationSample::from_alpha(alpha)).unwrap()
    }

    /// Shortest angular distance between two headings.
    fn arc(a: f64, b: f64) -> f64 {
        let d = (a - b).abs() % 360.0;
        d.min(360.0 - d)
    }

    #[test]
    fn test_first_sample_bypasses_smoothing() {
        let mut filter = HeadingFilter::new(0.1).unwrap();
        assert_eq!(feed(&mut filter, 30.0), 330.0);
        assert_eq!(filter.current_heading(), Some(330.0));
    }

    #[test]
    fn test_no_heading_before_first_sample() {
        let filter = HeadingFilter::default();
        assert_eq!(filter.current_heading(), None);
        assert_eq!(filter.smoothing_factor(), DEFAULT_SMOOTHING_FACTOR);
        assert_eq!(filter.calibration_offset(), 0.0);
    }

    #[test]
    fn test_smoothing_interpolates() {
        let mut filter = HeadingFilter::new(0.3).unwrap();
        feed(&mut filter, 270.0); // heading 90
        let smoothed = feed(&mut filter, 260.0); // raw heading 100
        assert!((smoothed - 93.0).abs() < 1e-9, "got {}", smoothed);
    }

    #[test]
    fn test_wraparound_crosses_north() {
        let mut filter = HeadingFilter::new(0.3).unwrap();
        feed(&mut filter, 10.0); // heading 350
        let smoothed = feed(&mut filter, 350.0); // raw heading 10
        assert!((smoothed - 356.0).abs() < 1e-9, "got {}", smoothed);

        let mut filter = HeadingFilter::new(0.5).unwrap();
        feed(&mut filter, 350.0); // heading 10
        let smoothed = feed(&mut filter, 10.0); // raw heading 350
        assert!(smoothed.abs() < 1e-9, "got {}", smoothed);
    }

    #[test]
    fn test_documented_sequence_is_deterministic() {
        let run = || {
            let mut filter = HeadingFilter::new(0.5).unwrap();
            [10.0, 350.0, 5.0]
                .iter()
                .map(|a| feed(&mut filter, *a))
                .collect::<Vec<_>>()
        };

        let first = run();
        assert_eq!(first, run());

        // raw headings: 350, 10, 355
        assert!((first[0] - 350.0).abs() < 1e-9);
        assert!(first[1].abs() < 1e-9);
        assert!((first[2] - 357.5).abs() < 1e-9);

        for pair in first.windows(2) {
            assert!(arc(pair[0], pair[1]) <= 180.0);
            assert!(arc(pair[0], pair[1]) < 20.0, "jumped {:?}", pair);
        }
    }

    #[test]
    fn test_factor_zero_freezes() {
        let mut filter = HeadingFilter::new(0.0).unwrap();
        feed(&mut filter, 270.0);
        assert_eq!(feed(&mut filter, 0.0), 90.0);
        assert_eq!(feed(&mut filter, 123.0), 90.0);
    }

    #[test]
    fn test_factor_one_snaps() {
        let mut filter = HeadingFilter::new(1.0).unwrap();
        feed(&mut filter, 270.0);
        assert!((feed(&mut filter, 100.0) - 260.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_out_of_range_factor() {
        let mut filter = HeadingFilter::new(0.4).unwrap();
        assert_eq!(
            filter.set_smoothing_factor(1.5),
            Err(HeadingError::OutOfRange(1.5))
        );
        assert!(filter.set_smoothing_factor(-0.1).is_err());
        assert!(filter.set_smoothing_factor(f64::NAN).is_err());
        assert_eq!(filter.smoothing_factor(), 0.4);
        assert!(HeadingFilter::new(2.0).is_err());
    }

    #[test]
    fn test_null_alpha_is_rejected_without_state_change() {
        let mut filter = HeadingFilter::new(0.5).unwrap();
        feed(&mut filter, 90.0);
        let before = filter.clone();

        let sample = OrientationSample {
            alpha: None,
            beta: Some(10.0),
            ..Default::default()
        };
        assert_eq!(filter.update(&sample), Err(HeadingError::InvalidSample));
        assert_eq!(
            filter.update(&OrientationSample::from_alpha(f64::NAN)),
            Err(HeadingError::InvalidSample)
        );
        assert_eq!(filter, before);
    }

    #[test]
    fn test_calibration_requires_sample() {
        let mut filter = HeadingFilter::default();
        assert_eq!(filter.set_calibration(0.0), Err(HeadingError::NoSample));
        assert_eq!(filter.calibration_offset(), 0.0);
    }

    #[test]
    fn test_calibration_rejects_non_finite_target() {
        let mut filter = HeadingFilter::default();
        feed(&mut filter, 10.0);
        assert!(matches!(
            filter.set_calibration(f64::INFINITY),
            Err(HeadingError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn test_calibration_maps_same_reading_to_true_north() {
        let mut filter = HeadingFilter::new(0.2).unwrap();
        feed(&mut filter, 40.0);
        feed(&mut filter, 47.0);

        filter.set_calibration(15.0).unwrap();
        assert_eq!(filter.current_heading(), Some(15.0));

        let next = feed(&mut filter, 47.0);
        assert!((next - 15.0).abs() < 1e-9, "got {}", next);
    }

    #[test]
    fn test_recalibration_accounts_for_existing_offset() {
        let mut filter = HeadingFilter::new(1.0).unwrap();
        feed(&mut filter, 100.0);
        filter.set_calibration(0.0).unwrap();
        feed(&mut filter, 120.0);
        filter.set_calibration(200.0).unwrap();

        let next = feed(&mut filter, 120.0);
        assert!((next - 200.0).abs() < 1e-9, "got {}", next);
    }

    #[test]
    fn test_reset_keeps_calibration() {
        let mut filter = HeadingFilter::new(0.5).unwrap();
        feed(&mut filter, 100.0);
        filter.set_calibration(0.0).unwrap();
        let offset = filter.calibration_offset();

        filter.reset();
        assert_eq!(filter.current_heading(), None);
        assert_eq!(filter.calibration_offset(), offset);
        assert!(filter.set_calibration(10.0).is_err());
    }

    proptest! {
        #[test]
        fn prop_output_is_normalized(
            factor in 0.0f64..=1.0,
            alphas in proptest::collection::vec(-720.0f64..720.0, 1..20),
        ) {
            let mut filter = HeadingFilter::new(factor).unwrap();
            for alpha in alphas {
                let h = filter.update(&OrientationSample::from_alpha(alpha)).unwrap();
                prop_assert!((0.0..360.0).contains(&h), "heading {} out of range", h);
            }
        }

        #[test]
        fn prop_output_on_shorter_arc(
            factor in 0.0f64..=1.0,
            first in 0.0f64..360.0,
            second in 0.0f64..360.0,
        ) {
            let mut filter = HeadingFilter::new(factor).unwrap();
            let h1 = filter.update(&OrientationSample::from_alpha(first)).unwrap();
            let h2 = normalize_degrees(360.0 - second);
            let out = filter.update(&OrientationSample::from_alpha(second)).unwrap();

            let span = arc(h1, h2);
            prop_assert!(
                (arc(h1, out) + arc(out, h2) - span).abs() < 1e-6,
                "{} -> {} gave {} (off the short arc)", h1, h2, out
            );
            prop_assert!((arc(h1, out) - factor * span).abs() < 1e-6);
        }
    }
}
