// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick values and labels for a solved scale.
//!
//! Every label of an axis shares one significant-digit budget and one decimal count, so the
//! column of labels lines up. Interior ticks sit on multiples of the interval; the two bounds
//! are always labelled, and interior ticks closer than half an interval to a bound are skipped.

extern crate alloc;

use alloc::string::String;

use gridscale_format::{
    ConvertMode, ConvertOptions, NO_SCALING_MARKER, convert_plain, decimal_digits,
    is_scalable_unit, truncate_float,
};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::extremes::Scale;

/// Smallest significant-digit budget of a label.
const MIN_LABEL_PRECISION: u32 = 3;

/// Decimals of labels on intervals of at least one (prefixed) unit.
const LABEL_DECIMALS: u32 = 2;

/// Divisor applied to both sides of a position when the span overflows.
const OVERFLOW_DIVISOR: f64 = 10.0;

/// A labelled gridline.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Position between the bounds: 0 at the minimum, 1 at the maximum.
    pub relative_pos: f64,
    /// Data value.
    pub value: f64,
    /// Formatted value with units.
    pub label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Min,
    Interior(u32),
    Done,
}

/// The ticks of a scale, from the minimum to the maximum.
///
/// Created by [`scale_ticks`]. Clone it to restart from the current position.
#[derive(Clone, Debug)]
pub struct ScaleTicks<'a> {
    scale: Scale,
    units: &'a str,
    interior: ConvertOptions,
    min_bound: ConvertOptions,
    max_bound: ConvertOptions,
    first_step: f64,
    last_pos: f64,
    stage: Stage,
}

/// Returns the ticks of `scale`.
///
/// `min_calculated` and `max_calculated` tell whether the bounds are nice values chosen by the
/// solver (labelled like the interior ticks) or user values (labelled with every significant
/// digit). `precision_max` is the character budget of a label, units included.
pub fn scale_ticks<'a>(
    scale: &Scale,
    min_calculated: bool,
    max_calculated: bool,
    units: &'a str,
    precision_max: u32,
) -> ScaleTicks<'a> {
    let units_length = units_length(units, scale.power);
    let sign_length = u32::from(scale.min < 0.0);
    let precision = precision_max
        .saturating_sub(units_length)
        .saturating_sub(sign_length)
        .max(MIN_LABEL_PRECISION);

    let scaled_interval = scale.interval / scale.multiplier();
    let (decimals, exact) = if scaled_interval < 1.0 {
        (decimal_digits(scaled_interval).min(precision - 1), true)
    } else {
        (LABEL_DECIMALS.min(precision - 1), false)
    };

    let interior = ConvertOptions::new()
        .with_mode(ConvertMode::NoUnits)
        .with_power(scale.power)
        .with_unit_base(scale.unit_base())
        .with_ignore_milliseconds(scale.min.abs() >= 1.0 || scale.max.abs() >= 1.0)
        .with_precision(precision)
        .with_decimals(decimals)
        .with_decimals_exact(exact);
    let user_bound = interior
        .with_decimals(precision - 1)
        .with_decimals_exact(false);

    ScaleTicks {
        scale: *scale,
        units,
        interior,
        min_bound: if min_calculated { interior } else { user_bound },
        max_bound: if max_calculated { interior } else { user_bound },
        first_step: truncate_float(scale.min / scale.interval + 0.5).ceil(),
        last_pos: 0.0,
        stage: Stage::Min,
    }
}

/// Characters the units take next to a label: prefix, units and a separating space.
///
/// Unit-less axes budget nothing, even when their labels carry a prefix.
fn units_length(units: &str, power: u8) -> u32 {
    let stripped = units.strip_prefix(NO_SCALING_MARKER).unwrap_or(units);
    if stripped.is_empty() {
        return 0;
    }
    let prefix = u32::from(power > 0 && is_scalable_unit(units));
    let chars = u32::try_from(stripped.chars().count()).unwrap_or(u32::MAX);
    prefix.saturating_add(chars).saturating_add(1)
}

impl ScaleTicks<'_> {
    fn tick(&self, value: f64, options: &ConvertOptions) -> Tick {
        self.tick_at(self.relative_pos(value), value, options)
    }

    fn tick_at(&self, relative_pos: f64, value: f64, options: &ConvertOptions) -> Tick {
        Tick {
            relative_pos,
            value,
            label: convert_plain(value, self.units, options),
        }
    }

    fn relative_pos(&self, value: f64) -> f64 {
        let Scale { min, max, .. } = self.scale;
        let span = max - min;
        if span.is_finite() {
            (value - min) / span
        } else {
            (value / OVERFLOW_DIVISOR - min / OVERFLOW_DIVISOR)
                / (max / OVERFLOW_DIVISOR - min / OVERFLOW_DIVISOR)
        }
    }

    /// The `k`-th interior value, or `None` once the values pass the top limit.
    fn interior_value(&self, k: u32) -> Option<f64> {
        if k > self.scale.rows {
            return None;
        }
        let value = truncate_float((self.first_step + f64::from(k)) * self.scale.interval);
        let limit = self.scale.max - self.scale.interval / 2.0;
        (value.is_finite() && value <= limit && value < self.scale.max).then_some(value + 0.0)
    }

    /// Whether an interior value keeps half an interval from the minimum and lands strictly
    /// between the previous tick and the maximum.
    fn accepts(&self, value: f64, relative_pos: f64) -> bool {
        value >= self.scale.min + self.scale.interval / 2.0
            && relative_pos > self.last_pos
            && relative_pos < 1.0
    }
}

impl Iterator for ScaleTicks<'_> {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        match self.stage {
            Stage::Min => {
                self.stage = Stage::Interior(0);
                Some(self.tick(self.scale.min, &self.min_bound))
            }
            Stage::Interior(mut k) => {
                // Values lost to 15-digit truncation at large magnitudes are skipped.
                while let Some(value) = self.interior_value(k) {
                    k += 1;
                    let relative_pos = self.relative_pos(value);
                    if self.accepts(value, relative_pos) {
                        self.stage = Stage::Interior(k);
                        self.last_pos = relative_pos;
                        return Some(self.tick_at(relative_pos, value, &self.interior));
                    }
                }
                self.stage = Stage::Done;
                Some(self.tick(self.scale.max, &self.max_bound))
            }
            Stage::Done => None,
        }
    }
}
