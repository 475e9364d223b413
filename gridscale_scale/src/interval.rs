// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate gridline intervals.
//!
//! The generator starts from the interval that would split the range evenly into the requested
//! rows and yields ever wider "nice" intervals: `1`, `2` or `5` times a power of ten, or a
//! power of two for binary units. Intervals are expressed in data units, so they include the
//! magnitude prefix multiplier.

use gridscale_format::{BINARY_BASE, DECIMAL_BASE, prefix_multiplier, truncate_float};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Growth factor between consecutive estimates.
const ESTIMATE_GROWTH: f64 = 1.5;

/// Nice mantissas for decimal intervals.
const DECIMAL_STEPS: [f64; 4] = [1.0, 2.0, 5.0, 10.0];

/// An unbounded, strictly increasing sequence of nice intervals.
///
/// Created by [`scale_intervals`]. Clone it to restart from the current position.
#[derive(Clone, Debug)]
pub struct ScaleIntervals {
    estimate: f64,
    multiplier: f64,
    is_binary: bool,
}

/// Returns the nice intervals for splitting `min..max` into `rows` rows.
///
/// `power` is the magnitude prefix power the axis labels use; intervals are nice in prefixed
/// units (`2 K`, not `2048`). A `rows` of 0 is treated as 1.
pub fn scale_intervals(
    min: f64,
    max: f64,
    is_binary: bool,
    power: u8,
    rows: u32,
) -> ScaleIntervals {
    let base = if is_binary { BINARY_BASE } else { DECIMAL_BASE };
    let multiplier = prefix_multiplier(base, power);
    let rows = f64::from(rows.max(1));

    let seed = truncate_float(max / rows / multiplier - min / rows / multiplier);
    let estimate = if seed.is_finite() && seed > 0.0 {
        seed
    } else {
        1.0
    };

    ScaleIntervals {
        estimate,
        multiplier,
        is_binary,
    }
}

impl Iterator for ScaleIntervals {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let nice = if self.is_binary {
            nice_binary(self.estimate)
        } else {
            nice_decimal(self.estimate)
        };
        self.estimate = truncate_float(nice * ESTIMATE_GROWTH);
        Some(truncate_float(nice * self.multiplier))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Smallest `{1, 2, 5, 10} x 10^e` not below `estimate`.
fn nice_decimal(estimate: f64) -> f64 {
    if !estimate.is_finite() {
        return estimate;
    }
    let exponent = estimate.log10().floor();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "finite f64 exponents are within the i32 range"
    )]
    let magnitude = 10_f64.powi(exponent as i32);
    DECIMAL_STEPS
        .iter()
        .map(|step| truncate_float(step * magnitude))
        .find(|candidate| *candidate >= estimate)
        .unwrap_or_else(|| truncate_float(10.0 * magnitude).max(estimate))
}

/// Smallest power of two not below `estimate`.
fn nice_binary(estimate: f64) -> f64 {
    if !estimate.is_finite() {
        return estimate;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "finite f64 exponents are within the i32 range"
    )]
    let mut nice = 2_f64.powi(estimate.log2().ceil() as i32);
    if nice < estimate {
        nice *= 2.0;
    } else if nice / 2.0 >= estimate {
        nice /= 2.0;
    }
    nice
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;

    #[test]
    fn decimal_intervals_are_nice_and_increasing() {
        let intervals: Vec<f64> = scale_intervals(0.0, 100.0, false, 0, 6).take(6).collect();
        assert_eq!(intervals, [20.0, 50.0, 100.0, 200.0, 500.0, 1000.0]);
    }

    #[test]
    fn decimal_intervals_below_one() {
        let intervals: Vec<f64> = scale_intervals(0.0, 0.9, false, 0, 5).take(3).collect();
        assert_eq!(intervals, [0.2, 0.5, 1.0]);
    }

    #[test]
    fn intervals_include_the_prefix_multiplier() {
        let intervals: Vec<f64> = scale_intervals(0.0, 4_500.0, false, 1, 3).take(2).collect();
        assert_eq!(intervals, [2_000.0, 5_000.0]);
    }

    #[test]
    fn binary_intervals_are_powers_of_two() {
        let intervals: Vec<f64> = scale_intervals(0.0, 3_000.0, true, 1, 4).take(3).collect();
        assert_eq!(intervals, [1_024.0, 2_048.0, 4_096.0]);
    }

    #[test]
    fn empty_or_inverted_ranges_start_at_one() {
        let first = scale_intervals(5.0, 5.0, false, 0, 4).next();
        assert_eq!(first, Some(1.0));
        let first = scale_intervals(5.0, 1.0, false, 0, 0).next();
        assert_eq!(first, Some(1.0));
    }

    #[test]
    fn sequence_is_strictly_increasing() {
        for (min, max, binary) in [(0.0, 1.0, false), (-3.7, 12.1, false), (0.0, 77.0, true)] {
            let values: Vec<f64> = scale_intervals(min, max, binary, 0, 7).take(40).collect();
            assert!(
                values.windows(2).all(|w| w[0] < w[1]),
                "not increasing for {min}..{max}: {values:?}"
            );
        }
    }

    #[test]
    fn clones_restart_from_the_same_position() {
        let mut intervals = scale_intervals(0.0, 10.0, false, 0, 3);
        intervals.next();
        let replay: Vec<f64> = intervals.clone().take(3).collect();
        let original: Vec<f64> = intervals.take(3).collect();
        assert_eq!(replay, original);
    }
}
