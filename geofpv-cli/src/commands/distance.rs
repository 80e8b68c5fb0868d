//! Distance command.

use std::io::Write;

use clap::Args;
use geofpv::geo::{distance_meters, Coordinate};

use super::common::parse_coordinate;
use crate::error::CliError;

/// Arguments for the distance command.
#[derive(Debug, Args)]
pub struct DistanceArgs {
    /// Start point as LAT,LON in decimal degrees
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub from: Coordinate,

    /// End point as LAT,LON in decimal degrees
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    pub to: Coordinate,
}

/// Print the great-circle distance in meters.
pub fn run(args: DistanceArgs, out: &mut impl Write) -> Result<(), CliError> {
    let meters = distance_meters(&args.from, &args.to);
    writeln!(out, "{:.3}", meters).map_err(|error| CliError::FileWrite {
        path: "<stdout>".to_string(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prints_meters() {
        let args = DistanceArgs {
            from: Coordinate::new(0.0, 0.0),
            to: Coordinate::new(0.0, 1.0),
        };
        let mut out = Vec::new();
        run(args, &mut out).unwrap();

        let printed: f64 = String::from_utf8(out).unwrap().trim().parse().unwrap();
        assert!((printed - 111_195.0).abs() < 1.0, "got {}", printed);
    }

    #[test]
    fn test_same_point_is_zero() {
        let p = Coordinate::new(52.52, 13.405);
        let mut out = Vec::new();
        run(DistanceArgs { from: p, to: p }, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0.000\n");
    }
}
