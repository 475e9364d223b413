// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis extremes.
//!
//! For every allowed row count the solver walks the nice intervals from narrow to wide and
//! keeps the first one that fits the data with enough clearance to the outer gridlines. Among
//! those per-row candidates, the one wasting the least space (measured in rows) wins.

use gridscale_format::{
    BINARY_BASE, DECIMAL_BASE, decimal_digits, prefix_multiplier, truncate_float,
};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::interval::scale_intervals;

/// Largest magnitude prefix power an axis uses.
pub const MAX_POWER: u8 = 8;

/// Intervals tried per row count before giving up on it.
const MAX_CANDIDATES: usize = 64;

/// Minimum gap between a calculated minimum and the data, in intervals per row.
const MIN_CLEARANCE: f64 = 0.05;

/// Minimum gap between a calculated maximum and the data, in intervals per row.
const MAX_CLEARANCE: f64 = 0.10;

/// Row count preferred by the fallback scale.
const FALLBACK_ROWS: u32 = 2;

/// Factor used to invent the missing side of an empty range.
const DEGENERATE_SPREAD: f64 = 1.25;

/// Largest drift between a candidate's span and its row count, in intervals.
const ROWS_TOLERANCE: f64 = 1e-9;

/// Default row range of [`ScaleExtremesSpec`].
pub const DEFAULT_ROWS: (u32, u32) = (4, 6);

/// A solved axis scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Distance between gridlines.
    pub interval: f64,
    /// Number of rows between `min` and `max`.
    pub rows: u32,
    /// Magnitude prefix power of the labels.
    pub power: u8,
    /// Whether magnitudes scale by 1024.
    pub is_binary: bool,
}

impl Scale {
    /// Returns the magnitude base (1000 or 1024).
    pub fn unit_base(&self) -> u32 {
        if self.is_binary {
            BINARY_BASE
        } else {
            DECIMAL_BASE
        }
    }

    /// Returns the multiplier of the magnitude prefix.
    pub fn multiplier(&self) -> f64 {
        prefix_multiplier(self.unit_base(), self.power)
    }
}

/// Inputs of the extremes solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleExtremesSpec {
    data_min: f64,
    data_max: f64,
    is_binary: bool,
    calc_power: bool,
    calc_min: bool,
    calc_max: bool,
    rows_min: u32,
    rows_max: u32,
}

impl ScaleExtremesSpec {
    /// Creates a spec for data in `data_min..=data_max`.
    ///
    /// Defaults: decimal magnitudes, calculated power and bounds, [`DEFAULT_ROWS`].
    pub fn new(data_min: f64, data_max: f64) -> Self {
        Self {
            data_min,
            data_max,
            is_binary: false,
            calc_power: true,
            calc_min: true,
            calc_max: true,
            rows_min: DEFAULT_ROWS.0,
            rows_max: DEFAULT_ROWS.1,
        }
    }

    /// Uses binary (1024) magnitudes.
    #[must_use]
    pub fn with_binary(mut self, is_binary: bool) -> Self {
        self.is_binary = is_binary;
        self
    }

    /// Enables or disables the magnitude prefix power.
    #[must_use]
    pub fn with_calc_power(mut self, calc_power: bool) -> Self {
        self.calc_power = calc_power;
        self
    }

    /// Whether the lower bound may move away from `data_min`.
    #[must_use]
    pub fn with_calc_min(mut self, calc_min: bool) -> Self {
        self.calc_min = calc_min;
        self
    }

    /// Whether the upper bound may move away from `data_max`.
    #[must_use]
    pub fn with_calc_max(mut self, calc_max: bool) -> Self {
        self.calc_max = calc_max;
        self
    }

    /// Sets the allowed row counts.
    #[must_use]
    pub fn with_rows(mut self, rows_min: u32, rows_max: u32) -> Self {
        self.rows_min = rows_min;
        self.rows_max = rows_max;
        self
    }

    /// Finds the scale, or `None` when the bounds cannot form a range.
    pub fn solve(&self) -> Option<Scale> {
        let mut min = truncate_float(self.data_min);
        let mut max = truncate_float(self.data_max);
        if !min.is_finite() || !max.is_finite() {
            tracing::debug!(min, max, "non-finite data; no scale");
            return None;
        }

        let rows_min = self.rows_min.max(1);
        let rows_max = self.rows_max.max(rows_min);

        if min >= max {
            if self.calc_max && (min >= 0.0 || !self.calc_min) {
                max = if min > 0.0 {
                    truncate_float(min * DEGENERATE_SPREAD)
                } else if min == 0.0 {
                    1.0
                } else {
                    0.0
                };
            } else if self.calc_min {
                min = if max < 0.0 {
                    truncate_float(max * DEGENERATE_SPREAD)
                } else if max == 0.0 {
                    -1.0
                } else {
                    0.0
                };
            } else {
                tracing::debug!(min, max, "empty range with both bounds fixed; no scale");
                return None;
            }
            tracing::debug!(min, max, "synthesized range for empty data");
        }

        let unit_base = if self.is_binary {
            BINARY_BASE
        } else {
            DECIMAL_BASE
        };
        let power = if self.calc_power {
            magnitude_power(min.abs().max(max.abs()), unit_base)
        } else {
            0
        };
        let multiplier = prefix_multiplier(unit_base, power);

        let mut best: Option<(f64, Scale)> = None;
        for rows in rows_min..=rows_max {
            let Some((score, scale)) = self.best_for_rows(min, max, rows, power, multiplier) else {
                continue;
            };
            if best.is_none_or(|(best_score, _)| score < best_score) {
                best = Some((score, scale));
            }
        }

        if let Some((_, scale)) = best {
            return Some(scale);
        }

        let rows = FALLBACK_ROWS.clamp(rows_min, rows_max);
        let interval = even_interval(min, max, f64::from(rows));
        tracing::debug!(min, max, rows, "no nice interval fits; using an even split");
        Some(Scale {
            min,
            max,
            interval,
            rows,
            power,
            is_binary: self.is_binary,
        })
    }

    /// Returns the first acceptable scale with exactly `rows` rows and its score.
    fn best_for_rows(
        &self,
        min: f64,
        max: f64,
        rows: u32,
        power: u8,
        multiplier: f64,
    ) -> Option<(f64, Scale)> {
        let scale = |lo: f64, hi: f64, interval: f64| Scale {
            min: lo,
            max: hi,
            interval,
            rows,
            power,
            is_binary: self.is_binary,
        };
        let rows_f = f64::from(rows);

        if !self.calc_min && !self.calc_max {
            let interval = truncate_float(even_interval(min, max, rows_f));
            if !interval.is_finite()
                || interval <= 0.0
                || !spans_rows(min, max, interval, rows_f)
            {
                return None;
            }
            let score = f64::from(decimal_digits(interval / multiplier));
            return Some((score, scale(min, max, interval)));
        }

        for interval in
            scale_intervals(min, max, self.is_binary, power, rows).take(MAX_CANDIDATES)
        {
            if !interval.is_finite() || interval <= 0.0 {
                break;
            }
            // Wider intervals follow; these vanish next to the bounds at 15 digits.
            if !resolves(min, interval) || !resolves(max, interval) {
                continue;
            }
            let bounds = match (self.calc_min, self.calc_max) {
                (true, true) => fit_both(min, max, interval, rows_f),
                (true, false) => fit_min(min, max, interval, rows_f),
                _ => fit_max(min, max, interval, rows_f),
            };
            let bounds = bounds.filter(|&(lo, hi)| spans_rows(lo, hi, interval, rows_f));
            if let Some((lo, hi)) = bounds {
                let slack = (min - lo) / interval + (hi - max) / interval;
                return Some((slack, scale(lo, hi, interval)));
            }
        }
        None
    }
}

/// Finds the scale for data in `data_min..=data_max`.
///
/// This is [`ScaleExtremesSpec::solve`] in function form.
pub fn solve_scale_extremes(
    data_min: f64,
    data_max: f64,
    is_binary: bool,
    calc_power: bool,
    calc_min: bool,
    calc_max: bool,
    rows_min: u32,
    rows_max: u32,
) -> Option<Scale> {
    ScaleExtremesSpec::new(data_min, data_max)
        .with_binary(is_binary)
        .with_calc_power(calc_power)
        .with_calc_min(calc_min)
        .with_calc_max(calc_max)
        .with_rows(rows_min, rows_max)
        .solve()
}

/// Prefix power for values of the given magnitude, in `0..=MAX_POWER`.
fn magnitude_power(magnitude: f64, unit_base: u32) -> u8 {
    if !magnitude.is_finite() || magnitude < 1.0 {
        return 0;
    }
    let power = truncate_float(magnitude.ln() / f64::from(unit_base).ln())
        .floor()
        .clamp(0.0, f64::from(MAX_POWER));
    #[allow(clippy::cast_possible_truncation, reason = "clamped to 0..=MAX_POWER")]
    {
        power as u8
    }
}

/// `hi - lo` measured in intervals, without overflowing for ranges near the `f64` limits.
fn span_in_intervals(lo: f64, hi: f64, interval: f64) -> f64 {
    let span = hi - lo;
    if span.is_finite() {
        span / interval
    } else {
        hi / interval - lo / interval
    }
}

/// The interval splitting `lo..hi` into `rows` equal rows.
fn even_interval(lo: f64, hi: f64, rows: f64) -> f64 {
    let span = hi - lo;
    if span.is_finite() {
        span / rows
    } else {
        hi / rows - lo / rows
    }
}

/// Whether `lo..hi` is finite and exactly `rows` intervals long.
fn spans_rows(lo: f64, hi: f64, interval: f64, rows: f64) -> bool {
    lo.is_finite()
        && hi.is_finite()
        && (span_in_intervals(lo, hi, interval) - rows).abs() <= ROWS_TOLERANCE
}

/// Whether stepping `interval` away from `value` survives 15-digit truncation.
fn resolves(value: f64, interval: f64) -> bool {
    truncate_float(value + interval) != value
}

fn clearance(interval: f64, rows: f64, factor: f64) -> f64 {
    interval * rows * factor
}

/// Aligns both bounds to the interval and spends leftover rows away from the zero line.
fn fit_both(min: f64, max: f64, interval: f64, rows: f64) -> Option<(f64, f64)> {
    let mut lo = truncate_float((min / interval).floor() * interval);
    let mut hi = truncate_float((max / interval).ceil() * interval);

    if lo != 0.0 && min - lo < clearance(interval, rows, MIN_CLEARANCE) {
        lo = truncate_float(lo - interval);
    }
    if hi != 0.0 && hi - max < clearance(interval, rows, MAX_CLEARANCE) {
        hi = truncate_float(hi + interval);
    }

    let used = span_in_intervals(lo, hi, interval).round();
    if used > rows {
        return None;
    }
    let spare = (rows - used) * interval;
    if hi <= 0.0 && lo < 0.0 {
        lo = truncate_float(lo - spare);
    } else {
        hi = truncate_float(hi + spare);
    }

    // `+ 0.0` turns a negative zero into zero.
    (lo <= min && hi >= max).then_some((lo + 0.0, hi + 0.0))
}

/// Keeps the maximum and hangs `rows` intervals below it.
fn fit_min(min: f64, max: f64, interval: f64, rows: f64) -> Option<(f64, f64)> {
    let lo = truncate_float(max - rows * interval);
    let clear = lo == 0.0 || min - lo >= clearance(interval, rows, MIN_CLEARANCE);
    (lo <= min && clear).then_some((lo, max))
}

/// Keeps the minimum and stacks `rows` intervals above it.
fn fit_max(min: f64, max: f64, interval: f64, rows: f64) -> Option<(f64, f64)> {
    let hi = truncate_float(min + rows * interval);
    let clear = hi == 0.0 || hi - max >= clearance(interval, rows, MAX_CLEARANCE);
    (hi >= max && clear).then_some((min, hi))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn solve(min: f64, max: f64) -> Scale {
        match ScaleExtremesSpec::new(min, max).solve() {
            Some(scale) => scale,
            None => panic!("no scale for {min}..{max}"),
        }
    }

    fn assert_covering(scale: &Scale, min: f64, max: f64, rows: (u32, u32)) {
        assert!(scale.min <= min, "{scale:?} does not cover {min}");
        assert!(scale.max >= max, "{scale:?} does not cover {max}");
        assert!(
            (rows.0..=rows.1).contains(&scale.rows),
            "{scale:?} rows outside {rows:?}"
        );
        assert!(scale.interval.is_finite() && scale.interval > 0.0, "{scale:?} interval");
        let rows_in_span = span_in_intervals(scale.min, scale.max, scale.interval);
        assert!(
            (rows_in_span - f64::from(scale.rows)).abs() < 1e-6,
            "{scale:?} span is not a whole number of rows"
        );
    }

    #[test]
    fn zero_based_data() {
        let scale = solve(10.0, 90.0);
        assert_eq!(scale.min, 0.0);
        assert_eq!(scale.max, 100.0);
        assert_eq!(scale.interval, 20.0);
        assert_eq!(scale.rows, 5);
        assert_eq!(scale.power, 0);
    }

    #[test]
    fn calculated_bounds_always_cover() {
        let cases = [
            (10.0, 90.0),
            (0.0, 100.0),
            (-37.5, 12.25),
            (-120.0, -3.0),
            (0.001, 0.0042),
            (999.0, 1001.0),
            (1.0e9, 7.3e9),
            (-5.0e-7, 5.0e-7),
            (123_456.0, 123_457.0),
        ];
        for rows in [(1, 1), (2, 10), (4, 6), (7, 12)] {
            for (min, max) in cases {
                let scale = ScaleExtremesSpec::new(min, max)
                    .with_rows(rows.0, rows.1)
                    .solve();
                let Some(scale) = scale else {
                    panic!("no scale for {min}..{max} with {rows:?}");
                };
                assert_covering(&scale, min, max, rows);
            }
        }
    }

    #[test]
    fn binary_scales_use_powers_of_two() {
        let scale = ScaleExtremesSpec::new(0.0, 2_700.0)
            .with_binary(true)
            .with_rows(3, 3)
            .solve();
        let Some(scale) = scale else {
            panic!("no binary scale");
        };
        assert_eq!(scale.power, 1);
        assert_eq!(scale.interval, 1_024.0);
        assert_eq!(scale.max, 3_072.0);
        assert_eq!(scale.unit_base(), 1_024);
    }

    #[test]
    fn power_follows_the_largest_magnitude() {
        assert_eq!(solve(0.0, 999.0).power, 0);
        assert_eq!(solve(0.0, 1_000.0).power, 1);
        assert_eq!(solve(-2.0e6, 10.0).power, 2);
        let scale = ScaleExtremesSpec::new(0.0, 2.0e6)
            .with_calc_power(false)
            .solve();
        assert_eq!(scale.map(|s| s.power), Some(0));
    }

    #[test]
    fn negative_data_spends_spare_rows_below() {
        let scale = ScaleExtremesSpec::new(-90.0, -10.0)
            .with_rows(6, 6)
            .solve();
        let Some(scale) = scale else {
            panic!("no scale");
        };
        assert_eq!(scale.max, 0.0);
        assert_covering(&scale, -90.0, -10.0, (6, 6));
    }

    #[test]
    fn pinned_max_hangs_rows_below() {
        let scale = ScaleExtremesSpec::new(10.0, 100.0)
            .with_calc_max(false)
            .with_rows(4, 4)
            .solve();
        let Some(scale) = scale else {
            panic!("no scale");
        };
        assert_eq!(scale.max, 100.0);
        assert_eq!(scale.interval, 50.0);
        assert_eq!(scale.min, -100.0);
    }

    #[test]
    fn pinned_min_stacks_rows_above() {
        let scale = ScaleExtremesSpec::new(0.0, 70.0)
            .with_calc_min(false)
            .with_rows(4, 4)
            .solve();
        let Some(scale) = scale else {
            panic!("no scale");
        };
        assert_eq!(scale.min, 0.0);
        assert_eq!(scale.interval, 20.0);
        assert_eq!(scale.max, 80.0);
    }

    #[test]
    fn pinned_bounds_prefer_round_intervals() {
        let scale = ScaleExtremesSpec::new(0.0, 100.0)
            .with_calc_min(false)
            .with_calc_max(false)
            .with_rows(3, 5)
            .solve();
        let Some(scale) = scale else {
            panic!("no scale");
        };
        assert_eq!((scale.min, scale.max), (0.0, 100.0));
        assert_eq!(scale.rows, 4, "25 beats 33.33 and ties with 20 on digits");
        assert_eq!(scale.interval, 25.0);
    }

    #[test]
    fn empty_ranges_are_widened() {
        let scale = solve(5.0, 5.0);
        assert_covering(&scale, 5.0, 6.25, DEFAULT_ROWS);

        let scale = solve(0.0, 0.0);
        assert_covering(&scale, 0.0, 1.0, DEFAULT_ROWS);

        let scale = solve(-4.0, -4.0);
        assert_covering(&scale, -5.0, -4.0, DEFAULT_ROWS);
    }

    #[test]
    fn empty_range_with_fixed_bounds_fails() {
        let scale = ScaleExtremesSpec::new(5.0, 5.0)
            .with_calc_min(false)
            .with_calc_max(false)
            .solve();
        assert_eq!(scale, None);
        assert_eq!(ScaleExtremesSpec::new(f64::NAN, 1.0).solve(), None);
    }

    #[test]
    fn invalid_row_ranges_are_clamped() {
        let scale = ScaleExtremesSpec::new(0.0, 10.0).with_rows(0, 0).solve();
        assert_eq!(scale.map(|s| s.rows), Some(1));
        let scale = ScaleExtremesSpec::new(0.0, 10.0).with_rows(5, 2).solve();
        assert_eq!(scale.map(|s| s.rows), Some(5));
    }

    #[test]
    fn narrow_ranges_at_large_magnitudes_keep_whole_rows() {
        for (min, max, rows) in [
            (6.496_217_511_647_284e12, 6.496_217_511_647_285e12, (2, 6)),
            (-9.676_740_637_231_686e14, -9.676_740_637_231_685e14, (7, 9)),
            (-4.725_615_565_750_352e16, -4.725_615_565_750_263e16, (3, 6)),
        ] {
            let scale = solve_scale_extremes(min, max, false, true, true, true, rows.0, rows.1);
            let Some(scale) = scale else {
                panic!("no scale for {min}..{max}");
            };
            assert_covering(&scale, truncate_float(min), truncate_float(max), rows);
        }
    }

    #[test]
    fn ranges_near_the_float_limits() {
        for (min, max) in [(0.0, f64::MAX), (-f64::MAX, f64::MAX), (-1e308, 1e308)] {
            let Some(scale) = ScaleExtremesSpec::new(min, max).solve() else {
                panic!("no scale for {min}..{max}");
            };
            assert_covering(&scale, min, max, DEFAULT_ROWS);
        }
    }

    #[test]
    fn function_form_matches_builder() {
        let from_fn = solve_scale_extremes(-3.0, 47.0, false, true, true, true, 3, 8);
        let from_spec = ScaleExtremesSpec::new(-3.0, 47.0).with_rows(3, 8).solve();
        assert_eq!(from_fn, from_spec);
    }
}
