// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Significant-digit aware float formatting.
//!
//! Every value is first measured the way `%.{precision-1}E` would print it: the exponent of the
//! leading digit and the number of significant digits left after trailing zeros are dropped.
//! Rounding then happens in decimal places relative to that exponent, so small values keep
//! their first non-zero decimals and large values never print more digits than the budget.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Significant digits kept when no precision is requested.
pub const DEFAULT_PRECISION: u32 = 15;

/// Largest significant-digit budget an `f64` can carry.
pub const MAX_PRECISION: u32 = 17;

/// Text rendered for positive infinity (negative infinity gets a leading `-`).
pub const INFINITY_MARKER: &str = "Infinity";

/// Exponent at which values always switch to scientific notation.
const FLOAT_DIG: i32 = 15;

/// Rounding deeper than this many places is done on a pre-shifted value.
const MAX_ROUND_PLACES: i32 = 294;

/// Formatting options for [`format_float`].
///
/// `decimals` is the number of first non-zero decimals to keep (or the exact number of
/// decimals when `exact` is set). It is clamped below `precision`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloatFormat {
    /// Maximum number of significant digits.
    pub precision: u32,
    /// Maximum number of decimals to display.
    pub decimals: u32,
    /// Display exactly `decimals` decimals instead of the first non-zero ones.
    pub exact: bool,
}

impl Default for FloatFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl FloatFormat {
    /// Default options: 15 significant digits, no decimals, inexact.
    pub const fn new() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            decimals: 0,
            exact: false,
        }
    }

    /// Sets the significant-digit budget.
    #[must_use]
    pub const fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the decimal budget.
    #[must_use]
    pub const fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Enables or disables exact-decimals mode.
    #[must_use]
    pub const fn with_exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    /// Formats `value` with these options.
    pub fn format(&self, value: f64) -> String {
        if value == 0.0 {
            return "0".to_string();
        }
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 {
                INFINITY_MARKER.to_string()
            } else {
                format!("-{INFINITY_MARKER}")
            };
        }

        let precision = self.precision.clamp(1, MAX_PRECISION);
        let decimals = self.decimals.min(precision - 1);
        let p = to_i32(precision);
        let d = to_i32(decimals);

        let exponent = Scientific::new(value, precision).exponent;

        let rounded = if exponent < 0 {
            let mut attempt = Scientific::new(value, precision);
            for shift in [1, 0] {
                attempt = Scientific::new(round_to(value, d - exponent - shift), precision);
                if attempt.digits - exponent <= p {
                    break;
                }
            }
            attempt
        } else {
            let number = if exponent >= p {
                if exponent >= FLOAT_DIG.min(p + 3) || round_to(value, p - exponent - 1) != value {
                    round_to(value, d - exponent)
                } else {
                    value
                }
            } else {
                round_to(value, d.min(p - exponent - 1))
            };
            Scientific::new(number, precision)
        };

        let number = rounded.value;
        let digits = rounded.digits;

        if number == 0.0 {
            return "0".to_string();
        }

        let exponent = rounded.exponent;
        let scientific_decimals = if self.exact { d } else { (digits - 1).min(d) };

        if exponent < 0 {
            let window = if self.exact { (d + 1).min(p) } else { p };
            if digits - exponent <= window {
                fixed(number, if self.exact { d } else { digits - exponent - 1 })
            } else {
                scientific(number, scientific_decimals)
            }
        } else if exponent >= FLOAT_DIG.min(p + 3) || (exponent >= p && number != value) {
            scientific(number, scientific_decimals)
        } else {
            fixed(
                number,
                if self.exact {
                    d
                } else {
                    (digits - exponent - 1).min(d).max(0)
                },
            )
        }
    }
}

/// Formats `value` with `precision` significant digits and up to `decimals` decimals.
///
/// See [`FloatFormat`] for the meaning of each option.
pub fn format_float(value: f64, precision: u32, decimals: u32, exact: bool) -> String {
    FloatFormat {
        precision,
        decimals,
        exact,
    }
    .format(value)
}

/// Cuts `value` to the default significant-digit budget.
///
/// Use this before comparing derived floats: it cancels binary noise such as
/// `0.1 + 0.2 != 0.3`. The operation is idempotent. Finite values stay finite.
pub fn truncate_float(value: f64) -> f64 {
    Scientific::new(value, DEFAULT_PRECISION).value
}

/// Returns the number of digits after the decimal point needed to show `value` at the
/// default significant-digit budget (0 for integers).
pub fn decimal_digits(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let sci = Scientific::new(value, DEFAULT_PRECISION);
    u32::try_from((sci.digits - 1 - sci.exponent).max(0)).unwrap_or(0)
}

/// Rounds `value` half away from zero at `places` decimal places (negative places round to
/// tens, hundreds, ...).
///
/// The scaled value is pre-rounded to 15 significant digits first, so `1.955` rounds to
/// `1.96` even though its binary value sits just below the midpoint.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    if places > MAX_ROUND_PLACES {
        let shift = pow10(places - MAX_ROUND_PLACES);
        return round_to(value * shift, MAX_ROUND_PLACES) / shift;
    }

    let factor = pow10(places.saturating_abs());
    let scaled = if places >= 0 {
        value * factor
    } else {
        value / factor
    };
    if !scaled.is_finite() {
        return value;
    }

    let rounded = truncate_float(scaled).round();
    let result = if places >= 0 {
        rounded / factor
    } else {
        rounded * factor
    };
    if result.is_finite() { result } else { value }
}

/// `10^n` for `n >= 0`, correctly rounded.
fn pow10(n: i32) -> f64 {
    const EXACT: [f64; 23] = [
        1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15,
        1e16, 1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
    ];
    match usize::try_from(n) {
        Ok(i) if i < EXACT.len() => EXACT[i],
        _ => format!("1e{n}").parse().unwrap_or(f64::INFINITY),
    }
}

pub(crate) fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// A value as `%.{precision-1}E` would print it.
#[derive(Clone, Copy, Debug)]
struct Scientific {
    /// The value parsed back from its scientific rendering.
    value: f64,
    /// Significant digits left after trailing zeros are dropped (at least 1).
    digits: i32,
    /// Decimal exponent of the leading digit.
    exponent: i32,
}

impl Scientific {
    fn new(value: f64, precision: u32) -> Self {
        let text = format!("{value:.prec$e}", prec = (precision.max(1) - 1) as usize);
        let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
        let digits = if precision <= 1 {
            1
        } else {
            let count = mantissa
                .trim_end_matches('0')
                .bytes()
                .filter(u8::is_ascii_digit)
                .count();
            i32::try_from(count).unwrap_or(i32::MAX).max(1)
        };
        // Rounding up near `f64::MAX` overflows; keep the input then.
        let parsed = text.parse().unwrap_or(value);
        Self {
            value: if parsed.is_finite() { parsed } else { value },
            digits,
            exponent: exponent.parse().unwrap_or(0),
        }
    }
}

fn fixed(value: f64, decimals: i32) -> String {
    let decimals = usize::try_from(decimals.max(0)).unwrap_or(0);
    format!("{value:.decimals$}")
}

/// Renders `d.dddE+x` / `d.dddE-x`.
fn scientific(value: f64, decimals: i32) -> String {
    let decimals = usize::try_from(decimals.max(0)).unwrap_or(0);
    let text = format!("{value:.decimals$e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if exponent.starts_with('-') => {
            format!("{mantissa}E{exponent}")
        }
        Some((mantissa, exponent)) => format!("{mantissa}E+{exponent}"),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn zero_and_infinities_use_markers() {
        assert_eq!(format_float(0.0, 15, 0, false), "0");
        assert_eq!(format_float(-0.0, 15, 4, true), "0");
        assert_eq!(format_float(f64::INFINITY, 15, 0, false), "Infinity");
        assert_eq!(format_float(f64::NEG_INFINITY, 15, 0, false), "-Infinity");
        assert_eq!(format_float(f64::NAN, 15, 0, false), "NaN");
    }

    #[test]
    fn largest_finite_values_never_render_as_infinity() {
        assert_eq!(format_float(f64::MAX, 15, 2, false), "1.80E+308");
        assert_eq!(format_float(-f64::MAX, 15, 2, false), "-1.80E+308");
        assert_eq!(truncate_float(f64::MAX), f64::MAX);
        assert_eq!(truncate_float(-f64::MAX), -f64::MAX);
        assert_eq!(truncate_float(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn integers_round_at_requested_decimals() {
        assert_eq!(format_float(1.5, 15, 0, false), "2");
        assert_eq!(format_float(1234.5678, 15, 2, false), "1234.57");
        assert_eq!(format_float(-1234.5678, 15, 2, false), "-1234.57");
        assert_eq!(format_float(100.0, 15, 4, false), "100");
        assert_eq!(format_float(123_456_789.123, 15, 4, false), "123456789.123");
    }

    #[test]
    fn midpoints_round_away_from_zero() {
        assert_eq!(format_float(1.955, 15, 2, false), "1.96");
        assert_eq!(format_float(2.5, 15, 0, false), "3");
        assert_eq!(format_float(-2.5, 15, 0, false), "-3");
    }

    #[test]
    fn small_values_keep_first_non_zero_decimals() {
        assert_eq!(format_float(0.000_123_456, 15, 4, false), "0.0001235");
        assert_eq!(format_float(1.0 / 3.0, 15, 4, false), "0.3333");
        assert_eq!(format_float(0.5, 15, 4, false), "0.5");
        assert_eq!(
            format_float(0.000_123_456, 15, 0, false),
            "0",
            "no decimals requested rounds sub-unit values away"
        );
    }

    #[test]
    fn out_of_window_values_use_scientific_notation() {
        assert_eq!(format_float(1e-20, 15, 4, false), "1E-20");
        assert_eq!(format_float(1e20, 15, 0, false), "1E+20");
        assert_eq!(format_float(1234.0, 3, 0, false), "1E+3");
        assert_eq!(format_float(999.0, 3, 0, false), "999");
    }

    #[test]
    fn exact_mode_pads_decimals() {
        assert_eq!(format_float(2.5, 15, 2, true), "2.50");
        assert_eq!(format_float(0.05, 15, 2, true), "0.05");
        assert_eq!(format_float(0.1, 15, 3, true), "0.100");
    }

    #[test]
    fn builder_matches_free_function() {
        let f = FloatFormat::new().with_decimals(2).with_exact(true);
        assert_eq!(f.format(2.5), format_float(2.5, 15, 2, true));
        assert_eq!(FloatFormat::default(), FloatFormat::new());
    }

    #[test]
    fn out_of_range_options_are_clamped() {
        // decimals >= precision is clamped to precision - 1.
        assert_eq!(format_float(1.23456, 3, 10, false), "1.23");
        // precision 0 behaves as precision 1.
        assert_eq!(format_float(7.0, 0, 0, false), "7");
    }

    #[test]
    fn truncate_cancels_binary_noise_and_is_idempotent() {
        assert_eq!(truncate_float(0.1 + 0.2), 0.3);
        for x in [0.1 + 0.2, 1.0 / 3.0, -123.456e200, 5e-300, 42.0] {
            let once = truncate_float(x);
            assert_eq!(truncate_float(once), once, "truncate must be idempotent for {x}");
        }
    }

    #[test]
    fn decimal_digits_counts_fraction_digits() {
        assert_eq!(decimal_digits(0.25), 2);
        assert_eq!(decimal_digits(0.1), 1);
        assert_eq!(decimal_digits(100.0), 0);
        assert_eq!(decimal_digits(1234.5), 1);
        assert_eq!(decimal_digits(1.5e-5), 6);
        assert_eq!(decimal_digits(-0.75), 2);
        assert_eq!(decimal_digits(0.0), 0);
    }

    #[test]
    fn round_to_handles_negative_and_deep_places() {
        assert_eq!(round_to(1234.0, -1), 1230.0);
        assert_eq!(round_to(1234.0, -3), 1000.0);
        let deep = round_to(1e-300, 303);
        assert!((deep - 1e-300).abs() < 1e-310, "deep rounding must not blow up: {deep}");
    }
}
