// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unit conversion.
//!
//! A value with units is scaled by the largest magnitude prefix (`K`, `M`, `G`, ...) that keeps
//! the displayed number below the base, so `1536 B` becomes `1.5 KB`. Byte units scale by 1024,
//! everything else by 1000. A few units delegate to the duration and timestamp formatters
//! instead.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

use crate::datetime::{ChronoDateTimeFormatter, DateTimeFormatter};
use crate::duration::{duration_ymd_hms, uptime};
use crate::float_format::{DEFAULT_PRECISION, FloatFormat};
use crate::parse::parse_number;

/// Magnitude prefixes, indexed by power.
pub const PREFIXES: [&str; 9] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y"];

/// Units that are never scaled by a magnitude prefix.
pub const SCALING_BLACKLIST: [&str; 4] = ["%", "ms", "rpm", "RPM"];

/// Decimals shown by default next to a magnitude prefix.
pub const DECIMALS_SUFFIXED: u32 = 2;

/// Decimals shown by default without a magnitude prefix.
pub const DECIMALS_UNSUFFIXED: u32 = 4;

/// Base for byte-like units.
pub const BINARY_BASE: u32 = 1024;

/// Base for every other unit.
pub const DECIMAL_BASE: u32 = 1000;

/// Prefix that disables magnitude scaling for a unit (`!req/s`).
pub const NO_SCALING_MARKER: char = '!';

/// Whether the units are shown next to the converted value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConvertMode {
    /// Scale only when units are given.
    #[default]
    WithUnits,
    /// Scale even without units; used for axis labels where the units are shown elsewhere.
    NoUnits,
}

/// Options for [`convert_units`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Scaling mode.
    pub mode: ConvertMode,
    /// Fixed prefix power instead of the best fitting one.
    pub power: Option<u8>,
    /// Magnitude base; only 1000 and 1024 are honoured.
    pub unit_base: Option<u32>,
    /// Fold milliseconds into seconds for the `s` unit.
    pub ignore_milliseconds: bool,
    /// Significant digits; defaults to 15.
    pub precision: Option<u32>,
    /// Decimals; defaults to 2 with a prefix and 4 without.
    pub decimals: Option<u32>,
    /// Show exactly `decimals` decimals.
    pub decimals_exact: bool,
}

impl ConvertOptions {
    /// Options with every field at its default.
    pub const fn new() -> Self {
        Self {
            mode: ConvertMode::WithUnits,
            power: None,
            unit_base: None,
            ignore_milliseconds: false,
            precision: None,
            decimals: None,
            decimals_exact: false,
        }
    }

    /// Sets the scaling mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: ConvertMode) -> Self {
        self.mode = mode;
        self
    }

    /// Fixes the prefix power.
    #[must_use]
    pub const fn with_power(mut self, power: u8) -> Self {
        self.power = Some(power);
        self
    }

    /// Sets the magnitude base.
    #[must_use]
    pub const fn with_unit_base(mut self, unit_base: u32) -> Self {
        self.unit_base = Some(unit_base);
        self
    }

    /// Folds milliseconds into seconds for durations.
    #[must_use]
    pub const fn with_ignore_milliseconds(mut self, ignore: bool) -> Self {
        self.ignore_milliseconds = ignore;
        self
    }

    /// Sets the significant-digit budget.
    #[must_use]
    pub const fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Sets the decimal budget.
    #[must_use]
    pub const fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Shows exactly the requested decimals.
    #[must_use]
    pub const fn with_decimals_exact(mut self, exact: bool) -> Self {
        self.decimals_exact = exact;
        self
    }

    fn float_format(&self, default_decimals: u32) -> FloatFormat {
        FloatFormat::new()
            .with_precision(self.precision.unwrap_or(DEFAULT_PRECISION))
            .with_decimals(self.decimals.unwrap_or(default_decimals))
            .with_exact(self.decimals_exact)
    }
}

/// A converted value and its display units.
///
/// `Display` renders the value and units separated by a single space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Converted {
    /// The formatted value.
    pub value: String,
    /// The units, possibly with a magnitude prefix. Empty for time renderings.
    pub units: String,
    /// Whether `value` is a number (as opposed to text like `1d 2h` or a date).
    pub is_numeric: bool,
}

impl Converted {
    fn number(value: String, units: impl Into<String>) -> Self {
        Self {
            value,
            units: units.into(),
            is_numeric: true,
        }
    }

    fn text(value: String) -> Self {
        Self {
            value,
            units: String::new(),
            is_numeric: false,
        }
    }
}

impl fmt::Display for Converted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)?;
        if !self.units.is_empty() {
            write!(f, " {}", self.units)?;
        }
        Ok(())
    }
}

/// Returns the multiplier of prefix `power` for the given base.
pub fn prefix_multiplier(unit_base: u32, power: u8) -> f64 {
    let base = f64::from(unit_base);
    (0..power).fold(1.0, |acc, _| acc * base)
}

/// Returns the magnitude base used for `units`.
///
/// An explicit base is honoured when it is 1000 or 1024; otherwise byte units (`B`, `Bps`)
/// use 1024 and everything else 1000.
pub fn unit_base_for(units: &str, explicit: Option<u32>) -> u32 {
    match explicit {
        Some(base @ (DECIMAL_BASE | BINARY_BASE)) => base,
        _ if is_binary_unit(units) => BINARY_BASE,
        _ => DECIMAL_BASE,
    }
}

/// Whether `units` scale by 1024.
pub fn is_binary_unit(units: &str) -> bool {
    matches!(units, "B" | "Bps")
}

/// Whether `units` may carry a magnitude prefix.
pub fn is_scalable_unit(units: &str) -> bool {
    !units.starts_with(NO_SCALING_MARKER) && !SCALING_BLACKLIST.contains(&units)
}

/// Converts a textual value with units using the default `chrono` timestamp formatter.
///
/// Text that is not a plain number is returned unchanged with `is_numeric` unset.
pub fn convert_units(value: &str, units: &str, options: &ConvertOptions) -> Converted {
    convert_units_with(value, units, options, &ChronoDateTimeFormatter::default())
}

/// Converts a textual value with units, rendering `unixtime` with `date_time`.
pub fn convert_units_with(
    value: &str,
    units: &str,
    options: &ConvertOptions,
    date_time: &dyn DateTimeFormatter,
) -> Converted {
    match parse_number(value) {
        Some(number) => convert_number(number, units, options, date_time),
        None => {
            tracing::trace!(value, "not a number; passing through");
            Converted::text(value.to_string())
        }
    }
}

/// Converts a numeric value with units.
pub fn convert_value(value: f64, units: &str, options: &ConvertOptions) -> Converted {
    convert_number(value, units, options, &ChronoDateTimeFormatter::default())
}

/// Converts a numeric value and joins it with its units.
pub fn convert_plain(value: f64, units: &str, options: &ConvertOptions) -> String {
    convert_value(value, units, options).to_string()
}

fn convert_number(
    value: f64,
    units: &str,
    options: &ConvertOptions,
    date_time: &dyn DateTimeFormatter,
) -> Converted {
    match units {
        "unixtime" => {
            let text = date_time
                .format_timestamp(value)
                .unwrap_or_else(|| options.float_format(DECIMALS_UNSUFFIXED).format(value));
            return Converted::text(text);
        }
        "uptime" => return Converted::text(uptime(value)),
        "s" => return Converted::text(duration_ymd_hms(value, options.ignore_milliseconds)),
        _ => {}
    }

    let scalable = is_scalable_unit(units);
    let units = units.strip_prefix(NO_SCALING_MARKER).unwrap_or(units);
    let scaling_requested = !units.is_empty() || options.mode == ConvertMode::NoUnits;

    if !scalable || !scaling_requested || value.abs() < 1.0 {
        let text = options.float_format(DECIMALS_UNSUFFIXED).format(value);
        return Converted::number(text, units);
    }

    let base = unit_base_for(units, options.unit_base);
    let last = PREFIXES.len() - 1;
    let format_at = |power: usize| {
        let default_decimals = if power == 0 {
            DECIMALS_UNSUFFIXED
        } else {
            DECIMALS_SUFFIXED
        };
        let multiplier = prefix_multiplier(base, u8::try_from(power).unwrap_or(u8::MAX));
        options.float_format(default_decimals).format(value / multiplier)
    };

    let (power, text) = match options.power {
        Some(power) => {
            let power = usize::from(power);
            if power > last {
                tracing::trace!(power, "prefix power out of range; clamping");
            }
            let power = power.min(last);
            (power, format_at(power))
        }
        None => {
            let base = f64::from(base);
            (0..=last)
                .map(|power| (power, format_at(power)))
                .find(|(power, text)| {
                    *power == last || text.parse::<f64>().is_ok_and(|v| v.abs() < base)
                })
                .unwrap_or_else(|| (last, format_at(last)))
        }
    };

    let is_zero = text.parse::<f64>().is_ok_and(|v| v == 0.0);
    let units = if is_zero {
        units.to_string()
    } else {
        format!("{}{units}", PREFIXES[power])
    };
    Converted::number(text, units)
}
