// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Duration formatting.
//!
//! Durations are decomposed into calendar-ish units (a month is 30 days, a year 365 days) and
//! only the most significant units are kept:
//! - [`duration_ymd_hms`]: `#y #M #d`, `#M #d #h`, `#d #h #m`, `#h #m #s`, `#m #s #ms`, ...
//! - [`weeks_days_hms`]: `#w #d #h`, `#d #h #m`, `#h #m #s`, ...
//! - [`uptime`]: `N days, HH:MM:SS`
//! - [`duration_single_unit`]: one unit with decimals, for axis labels.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};

use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::float_format::{FloatFormat, format_float, round_to, to_i32};
use crate::units::DECIMALS_SUFFIXED;

/// Seconds per minute.
pub const SEC_PER_MIN: i64 = 60;
/// Seconds per hour.
pub const SEC_PER_HOUR: i64 = 3_600;
/// Seconds per day.
pub const SEC_PER_DAY: i64 = 86_400;
/// Seconds per week.
pub const SEC_PER_WEEK: i64 = 604_800;
/// Seconds per (30 day) month.
pub const SEC_PER_MONTH: i64 = 2_592_000;
/// Seconds per (365 day) year.
pub const SEC_PER_YEAR: i64 = 31_536_000;

/// Text returned by [`uptime`] for a zero duration.
///
/// Callers substitute their own localized text for it.
pub const UPTIME_NEVER: &str = "Never";

/// Year counts above this are too large for the lower units to carry information.
const MAX_DETAILED_YEARS: f64 = 1e15;

/// Integer magnitudes with more digits than this are too coarse for `HH:MM:SS`.
const MAX_UPTIME_DIGITS: usize = 15;

/// Suffixes for the levels of [`duration_ymd_hms`], most significant first.
const YMD_HMS_SUFFIXES: [&str; 7] = ["y", "M", "d", "h", "m", "s", "ms"];

/// Suffixes for the levels of [`weeks_days_hms`], most significant first.
const WEEKS_SUFFIXES: [&str; 5] = ["w", "d", "h", "m", "s"];

/// A single time unit used by [`duration_single_unit`].
#[derive(Clone, Copy, Debug)]
struct TimeUnit {
    suffix: &'static str,
    seconds: f64,
}

const SINGLE_UNITS: [TimeUnit; 7] = [
    TimeUnit {
        suffix: "y",
        seconds: SEC_PER_YEAR as f64,
    },
    TimeUnit {
        suffix: "M",
        seconds: SEC_PER_MONTH as f64,
    },
    TimeUnit {
        suffix: "d",
        seconds: SEC_PER_DAY as f64,
    },
    TimeUnit {
        suffix: "h",
        seconds: SEC_PER_HOUR as f64,
    },
    TimeUnit {
        suffix: "m",
        seconds: SEC_PER_MIN as f64,
    },
    TimeUnit {
        suffix: "s",
        seconds: 1.0,
    },
    TimeUnit {
        suffix: "ms",
        seconds: 0.001,
    },
];

const SECONDS: TimeUnit = SINGLE_UNITS[5];
const MILLISECONDS: TimeUnit = SINGLE_UNITS[6];

/// Formats a duration as its (up to) 3 most significant units out of years, months, days,
/// hours, minutes, seconds and milliseconds.
///
/// Decomposition starts at the most significant non-zero unit and covers 3 consecutive
/// levels; zero levels inside that window are omitted from the text. With
/// `ignore_milliseconds` the fractional second is folded into the seconds (`1.5s`) instead of
/// being shown as `500ms`.
pub fn duration_ymd_hms(seconds: f64, ignore_milliseconds: bool) -> String {
    if !seconds.is_finite() {
        return format_float(seconds, 15, 0, false);
    }

    let value_abs = seconds.abs();
    let mut counts = [0.0_f64; 7];
    let mut start: Option<usize> = None;
    let mut rest = value_abs.floor();

    let years = (rest / SEC_PER_YEAR as f64).floor();
    if years > 0.0 {
        counts[0] = years;
        rest -= years * SEC_PER_YEAR as f64;
        start = Some(0);
    }

    let months = (rest / SEC_PER_MONTH as f64).floor();
    if months == 12.0 {
        counts[0] += 1.0;
        start = Some(0);
    } else if start.is_none() || counts[0] <= MAX_DETAILED_YEARS {
        if months > 0.0 {
            counts[1] = months;
            rest -= months * SEC_PER_MONTH as f64;
            start.get_or_insert(1);
        }

        for (level, unit) in [(2, SEC_PER_DAY), (3, SEC_PER_HOUR), (4, SEC_PER_MIN)] {
            let v = (rest / unit as f64).floor();
            if v > 0.0 {
                counts[level] = v;
                rest -= v * unit as f64;
                start.get_or_insert(level);
            }
            if start.is_some_and(|s| level - s >= 2) {
                break;
            }
        }

        if start.is_none_or(|s| s >= 3) {
            let fraction = value_abs % 1.0;
            if ignore_milliseconds {
                counts[5] = rest + round_to(fraction, to_i32(DECIMALS_SUFFIXED));
            } else {
                counts[5] = rest;
                if start.is_none_or(|s| s >= 4) {
                    counts[6] = fraction * 1000.0;
                }
            }
        }
    }

    let parts: SmallVec<[String; 4]> = counts
        .iter()
        .zip(YMD_HMS_SUFFIXES)
        .filter(|(count, _)| **count > 0.0)
        .map(|(count, suffix)| (format_float(*count, 15, DECIMALS_SUFFIXED, false), suffix))
        // A millisecond count can still round away to nothing.
        .filter(|(text, _)| text != "0")
        .map(|(text, suffix)| format!("{text}{suffix}"))
        .collect();

    if parts.is_empty() {
        return "0".to_string();
    }
    let sign = if seconds < 0.0 { "-" } else { "" };
    format!("{sign}{}", parts.join(" "))
}

/// Formats a whole number of seconds as its (up to) 3 most significant units out of weeks,
/// days, hours, minutes and seconds.
pub fn weeks_days_hms(seconds: i64) -> String {
    let mut rest = seconds.unsigned_abs();
    let mut counts = [0_u64; 5];
    let mut start: Option<usize> = None;

    let weeks = rest / SEC_PER_WEEK.unsigned_abs();
    if weeks > 0 {
        counts[0] = weeks;
        rest -= weeks * SEC_PER_WEEK.unsigned_abs();
        start = Some(0);
    }

    for (level, unit) in [(1, SEC_PER_DAY), (2, SEC_PER_HOUR), (3, SEC_PER_MIN)] {
        let unit = unit.unsigned_abs();
        let v = rest / unit;
        if v > 0 {
            counts[level] = v;
            rest -= v * unit;
            start.get_or_insert(level);
        }
        if start.is_some_and(|s| level - s >= 2) {
            break;
        }
    }

    if start.is_none_or(|s| s >= 2) {
        counts[4] = rest;
    }

    let parts: SmallVec<[String; 3]> = counts
        .iter()
        .zip(WEEKS_SUFFIXES)
        .filter(|(count, _)| **count > 0)
        .map(|(count, suffix)| format!("{count}{suffix}"))
        .collect();

    if parts.is_empty() {
        return "0".to_string();
    }
    let sign = if seconds < 0 { "-" } else { "" };
    format!("{sign}{}", parts.join(" "))
}

/// Formats an uptime as `N day(s), HH:MM:SS`.
///
/// The clock part is dropped when the value is too large for second precision to mean
/// anything. A zero uptime returns [`UPTIME_NEVER`].
pub fn uptime(seconds: f64) -> String {
    if !seconds.is_finite() {
        return format_float(seconds, 15, 0, false);
    }

    let value = seconds.round();
    if value == 0.0 {
        return UPTIME_NEVER.to_string();
    }

    let value_abs = value.abs();
    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }

    let days = (value_abs / SEC_PER_DAY as f64).floor();
    if days != 0.0 {
        let noun = if days == 1.0 { "day" } else { "days" };
        out.push_str(&format!("{} {noun}", format_float(days, 15, 0, false)));
    }

    if format!("{value_abs:.0}").len() <= MAX_UPTIME_DIGITS {
        if days != 0.0 {
            out.push_str(", ");
        }
        let rest = value_abs - days * SEC_PER_DAY as f64;
        let hours = (rest / SEC_PER_HOUR as f64).floor();
        let rest = rest - hours * SEC_PER_HOUR as f64;
        let minutes = (rest / SEC_PER_MIN as f64).floor();
        let secs = rest - minutes * SEC_PER_MIN as f64;
        out.push_str(&format!("{hours:02}:{minutes:02}:{secs:02}"));
    }

    out
}

/// Formats a duration in the single largest unit not exceeding it, with decimals.
///
/// Sub-millisecond values are shown in milliseconds, or in seconds when
/// `ignore_milliseconds` is set.
pub fn duration_single_unit(
    seconds: f64,
    ignore_milliseconds: bool,
    decimals: u32,
    exact: bool,
) -> String {
    if seconds == 0.0 {
        return "0".to_string();
    }

    let magnitude = seconds.abs();
    let mut unit = SINGLE_UNITS
        .iter()
        .copied()
        .find(|unit| magnitude >= unit.seconds)
        .unwrap_or(MILLISECONDS);
    if ignore_milliseconds && unit.suffix == MILLISECONDS.suffix {
        unit = SECONDS;
    }

    let text = FloatFormat::new()
        .with_decimals(decimals)
        .with_exact(exact)
        .format(seconds / unit.seconds);
    format!("{text}{}", unit.suffix)
}
