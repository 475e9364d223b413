// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timestamp rendering for the `unixtime` unit.
//!
//! The converter does not own a calendar. It asks a [`DateTimeFormatter`] to render the
//! timestamp and falls back to the plain number when the formatter declines.

extern crate alloc;

use alloc::string::String;
use core::fmt::Write;

use chrono::{DateTime, FixedOffset, Offset, Utc};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// The pattern used by [`ChronoDateTimeFormatter::default`].
pub const DEFAULT_DATE_TIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Renders Unix timestamps (seconds) as date/time text.
pub trait DateTimeFormatter {
    /// Formats `seconds` since the Unix epoch.
    ///
    /// Returns `None` if the timestamp cannot be represented.
    fn format_timestamp(&self, seconds: f64) -> Option<String>;
}

impl<F> DateTimeFormatter for F
where
    F: Fn(f64) -> Option<String>,
{
    fn format_timestamp(&self, seconds: f64) -> Option<String> {
        self(seconds)
    }
}

/// A [`DateTimeFormatter`] backed by `chrono`, with a fixed UTC offset and a `strftime`
/// pattern.
#[derive(Clone, Debug)]
pub struct ChronoDateTimeFormatter {
    offset: FixedOffset,
    pattern: String,
}

impl Default for ChronoDateTimeFormatter {
    fn default() -> Self {
        Self::new(Utc.fix(), DEFAULT_DATE_TIME_PATTERN)
    }
}

impl ChronoDateTimeFormatter {
    /// Creates a formatter for the given offset and `strftime` pattern.
    pub fn new(offset: FixedOffset, pattern: impl Into<String>) -> Self {
        Self {
            offset,
            pattern: pattern.into(),
        }
    }

    /// Returns the UTC offset timestamps are shown in.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Returns the `strftime` pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl DateTimeFormatter for ChronoDateTimeFormatter {
    fn format_timestamp(&self, seconds: f64) -> Option<String> {
        if !seconds.is_finite() {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "saturates, and chrono rejects the saturated extremes"
        )]
        let secs = seconds.floor() as i64;
        let utc = DateTime::<Utc>::from_timestamp(secs, 0)?;

        let mut out = String::new();
        // An invalid pattern surfaces as a formatting error, not a panic.
        write!(out, "{}", utc.with_timezone(&self.offset).format(&self.pattern)).ok()?;
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use super::*;

    #[test]
    fn default_is_utc() {
        let formatter = ChronoDateTimeFormatter::default();
        assert_eq!(
            formatter.format_timestamp(0.0).as_deref(),
            Some("1970-01-01 00:00:00")
        );
        assert_eq!(
            formatter.format_timestamp(1_700_000_000.9).as_deref(),
            Some("2023-11-14 22:13:20")
        );
    }

    #[test]
    fn offset_and_pattern_are_applied() {
        let Some(offset) = FixedOffset::east_opt(2 * 3_600) else {
            panic!("valid offset");
        };
        let formatter = ChronoDateTimeFormatter::new(offset, "%H:%M");
        assert_eq!(formatter.format_timestamp(0.0).as_deref(), Some("02:00"));
    }

    #[test]
    fn unrepresentable_timestamps_are_declined() {
        let formatter = ChronoDateTimeFormatter::default();
        assert_eq!(formatter.format_timestamp(f64::NAN), None);
        assert_eq!(formatter.format_timestamp(1e300), None);
        assert_eq!(formatter.format_timestamp(9e18), None);
    }

    #[test]
    fn closures_are_formatters() {
        let formatter = |seconds: f64| Some(seconds.to_string());
        assert_eq!(formatter.format_timestamp(5.0).as_deref(), Some("5"));
    }
}
