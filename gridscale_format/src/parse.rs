// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parsers for numeric text, time suffixes and memory sizes.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use crate::duration::{
    SEC_PER_DAY, SEC_PER_HOUR, SEC_PER_MIN, SEC_PER_MONTH, SEC_PER_WEEK, SEC_PER_YEAR,
};
use crate::float_format::format_float;

const KIBIBYTE: u64 = 1 << 10;
const MEBIBYTE: u64 = 1 << 20;
const GIBIBYTE: u64 = 1 << 30;

/// Parses `text` as a plain decimal number.
///
/// Accepted: optional surrounding whitespace, an optional sign, digits with an optional
/// fraction (either side of the point may be empty, not both) and an optional exponent.
/// Words like `inf` or `nan`, hex and digit separators are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed =
        text.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'));
    let bytes = trimmed.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_digits = count_digits(&bytes[i..]);
    i += int_digits;
    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        frac_digits = count_digits(&bytes[i..]);
        i += frac_digits;
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_digits = count_digits(&bytes[i..]);
        if exp_digits == 0 {
            return None;
        }
        i += exp_digits;
    }

    if i != bytes.len() {
        return None;
    }
    trimmed.parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Converts a time string with an optional unit suffix to seconds.
///
/// Suffixes are `s`, `m`, `h`, `d` and `w`, plus `M` (30 days) and `y` (365 days) when
/// `with_year` is set. A bare integer is already in seconds. Returns `None` for malformed
/// input or on overflow.
pub fn time_unit_to_seconds(text: &str, with_year: bool) -> Option<i64> {
    let (digits, multiplier) = match text.char_indices().last() {
        Some((at, suffix)) if !suffix.is_ascii_digit() => {
            let multiplier = match suffix {
                's' => 1,
                'm' => SEC_PER_MIN,
                'h' => SEC_PER_HOUR,
                'd' => SEC_PER_DAY,
                'w' => SEC_PER_WEEK,
                'M' if with_year => SEC_PER_MONTH,
                'y' if with_year => SEC_PER_YEAR,
                _ => return None,
            };
            (&text[..at], multiplier)
        }
        Some(_) => (text, 1),
        None => return None,
    };

    let unsigned = digits.strip_prefix('-').unwrap_or(digits);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok()?.checked_mul(multiplier)
}

/// Parses a memory size like `128M` into bytes.
///
/// Suffixes `K`, `M` and `G` (case-insensitive) are binary multiples. Returns `None` for
/// malformed input or on overflow.
pub fn str_to_mem(text: &str) -> Option<u64> {
    let text = text.trim();
    let (digits, multiplier) = match text.char_indices().last() {
        Some((at, suffix)) if !suffix.is_ascii_digit() => {
            let multiplier = match suffix.to_ascii_uppercase() {
                'K' => KIBIBYTE,
                'M' => MEBIBYTE,
                'G' => GIBIBYTE,
                _ => return None,
            };
            (text[..at].trim_end(), multiplier)
        }
        Some(_) => (text, 1),
        None => return None,
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok()?.checked_mul(multiplier)
}

/// Formats a byte count with the largest of the `G`, `M` and `K` suffixes it exceeds.
///
/// The scaled value keeps up to 2 decimals; counts of at most 1 KiB print as `<n>B`.
pub fn mem_to_str(bytes: u64) -> String {
    for (unit, suffix) in [(GIBIBYTE, 'G'), (MEBIBYTE, 'M'), (KIBIBYTE, 'K')] {
        if bytes > unit {
            #[allow(clippy::cast_precision_loss, reason = "display value, rounded to 2 places")]
            let scaled = bytes as f64 / unit as f64;
            return format!("{}{suffix}", format_float(scaled, 15, 2, false));
        }
    }
    format!("{bytes}B")
}
