// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable numbers, units and durations for monitoring graphs.
//!
//! This crate turns raw measurements into compact labels:
//! - **Floats** are printed under a significant-digit budget ([`format_float`]), switching to
//!   scientific notation when a value does not fit.
//! - **Units** get a magnitude prefix ([`convert_units`]): `1536 B` becomes `1.5 KB`.
//! - **Durations** keep only their most significant parts ([`duration_ymd_hms`]):
//!   `90061 s` becomes `1d 1h 1m`.
//!
//! Timestamps (the `unixtime` unit) are rendered through a [`DateTimeFormatter`]; the default
//! one uses `chrono`.
//!
//! ```
//! use gridscale_format::{ConvertOptions, convert_units};
//!
//! let converted = convert_units("1536", "B", &ConvertOptions::new());
//! assert_eq!(converted.to_string(), "1.5 KB");
//! ```

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod datetime;
mod duration;
#[cfg(not(feature = "std"))]
mod float;
mod float_format;
mod parse;
mod units;

pub use datetime::{ChronoDateTimeFormatter, DEFAULT_DATE_TIME_PATTERN, DateTimeFormatter};
pub use duration::{
    SEC_PER_DAY, SEC_PER_HOUR, SEC_PER_MIN, SEC_PER_MONTH, SEC_PER_WEEK, SEC_PER_YEAR,
    UPTIME_NEVER, duration_single_unit, duration_ymd_hms, uptime, weeks_days_hms,
};
pub use float_format::{
    DEFAULT_PRECISION, FloatFormat, INFINITY_MARKER, MAX_PRECISION, decimal_digits,
    format_float, truncate_float,
};
pub use parse::{mem_to_str, parse_number, str_to_mem, time_unit_to_seconds};
pub use units::{
    BINARY_BASE, ConvertMode, ConvertOptions, Converted, DECIMAL_BASE, DECIMALS_SUFFIXED,
    DECIMALS_UNSUFFIXED, NO_SCALING_MARKER, PREFIXES, SCALING_BLACKLIST, convert_plain,
    convert_units, convert_units_with, convert_value, is_binary_unit, is_scalable_unit,
    prefix_multiplier, unit_base_for,
};
