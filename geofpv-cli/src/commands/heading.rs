//! Heading command.
//!
//! Reads orientation samples as JSON lines and prints one filtered
//! orientation per accepted sample. Lines that fail to parse or carry no
//! usable alpha are reported on stderr and skipped.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use geofpv::config::ConfigFile;
use geofpv::heading::{HeadingTracker, OrientationSample};
use tracing::{info, warn};

use super::common::open_lines;
use crate::error::CliError;

/// Arguments for the heading command.
#[derive(Debug, Args)]
pub struct HeadingArgs {
    /// JSON-lines file of orientation samples (default: stdin)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Smoothing factor in [0, 1] (overrides config)
    #[arg(long)]
    pub smoothing: Option<f64>,

    /// Calibrate after this many accepted samples
    #[arg(long, requires = "true_north")]
    pub calibrate_at: Option<usize>,

    /// Heading in degrees the device faces at calibration time
    #[arg(long, requires = "calibrate_at")]
    pub true_north: Option<f64>,
}

/// Counts reported after a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub accepted: usize,
    pub rejected: usize,
}

/// Run the heading command.
pub fn run(args: HeadingArgs, config: &ConfigFile, out: &mut impl Write) -> Result<(), CliError> {
    let mut filter = config.heading_filter()?;
    if let Some(factor) = args.smoothing {
        filter.set_smoothing_factor(factor)?;
    }
    let mut tracker = HeadingTracker::new(filter);

    let calibration = args.calibrate_at.zip(args.true_north);
    let reader = open_lines(args.input.as_ref())?;
    let summary = process_stream(reader, &mut tracker, calibration, out)?;

    info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        "Heading stream finished"
    );
    Ok(())
}

/// Filter every sample in `reader`, writing one JSON line per result.
///
/// `calibration` is `(after_n_accepted, true_north_degrees)`.
pub fn process_stream(
    reader: impl BufRead,
    tracker: &mut HeadingTracker,
    calibration: Option<(usize, f64)>,
    out: &mut impl Write,
) -> Result<StreamSummary, CliError> {
    let mut summary = StreamSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|error| CliError::Read {
            path: "<input>".to_string(),
            error,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let sample: OrientationSample = match serde_json::from_str(&line) {
            Ok(s) => s,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed sample");
                summary.rejected += 1;
                continue;
            }
        };

        let orientation = match tracker.process(&sample) {
            Ok(o) => o,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping sample");
                summary.rejected += 1;
                continue;
            }
        };
        summary.accepted += 1;

        let json = serde_json::to_string(&orientation)
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
        writeln!(out, "{}", json).map_err(|error| CliError::FileWrite {
            path: "<stdout>".to_string(),
            error,
        })?;

        if let Some((at, true_north)) = calibration {
            if summary.accepted == at {
                tracker.calibrate(true_north)?;
                info!(line = line_no, true_north, "Calibrated");
            }
        }
    }

    Ok(summary)
}
