// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical value axes.
//!
//! An [`AxisSpec`] ties the pieces together: it resolves user bounds against the data, derives
//! the magnitude base and prefix policy from the units, solves the extremes and labels the
//! gridlines.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use gridscale_format::{NO_SCALING_MARKER, is_binary_unit};

use crate::extremes::{Scale, ScaleExtremesSpec};
use crate::layout::RowRange;
use crate::ticks::{Tick, scale_ticks};

/// Default character budget of an axis label.
pub const DEFAULT_PRECISION_MAX: u32 = 10;

/// Data used when an axis has no values at all.
const EMPTY_DATA: (f64, f64) = (0.0, 1.0);

/// How an axis bound is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AxisBound {
    /// Chosen by the solver to fit the data.
    #[default]
    Calculated,
    /// Fixed by the user.
    Fixed(f64),
}

impl AxisBound {
    fn is_calculated(self) -> bool {
        matches!(self, Self::Calculated)
    }
}

/// Errors produced while solving an axis.
#[derive(Clone, Debug, PartialEq)]
pub enum AxisError {
    /// The bounds (after applying fixed values) cannot form a scale.
    InvalidBounds {
        /// Resolved lower bound.
        min: f64,
        /// Resolved upper bound.
        max: f64,
    },
}

impl fmt::Display for AxisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBounds { min, max } => {
                write!(f, "axis bounds {min}..{max} cannot form a scale")
            }
        }
    }
}

impl core::error::Error for AxisError {}

/// A vertical value axis description.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSpec {
    /// Units of the values (`B`, `bps`, `%`, `!req`, ...).
    pub units: String,
    /// Lower bound policy.
    pub min: AxisBound,
    /// Upper bound policy.
    pub max: AxisBound,
    /// Whether series are stacked, so the axis should include 0.
    pub stacked: bool,
    /// Allowed row counts.
    pub rows: RowRange,
    /// Character budget of a label, units included.
    pub precision_max: u32,
}

impl AxisSpec {
    /// Creates an axis for values in `units` with calculated bounds.
    pub fn new(units: impl Into<String>) -> Self {
        Self {
            units: units.into(),
            min: AxisBound::Calculated,
            max: AxisBound::Calculated,
            stacked: false,
            rows: RowRange::default(),
            precision_max: DEFAULT_PRECISION_MAX,
        }
    }

    /// Sets the lower bound policy.
    #[must_use]
    pub fn with_min(mut self, min: AxisBound) -> Self {
        self.min = min;
        self
    }

    /// Sets the upper bound policy.
    #[must_use]
    pub fn with_max(mut self, max: AxisBound) -> Self {
        self.max = max;
        self
    }

    /// Marks the axis as stacked.
    #[must_use]
    pub fn with_stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    /// Sets the allowed row counts.
    #[must_use]
    pub fn with_rows(mut self, rows: RowRange) -> Self {
        self.rows = rows;
        self
    }

    /// Sets the label character budget.
    #[must_use]
    pub fn with_precision_max(mut self, precision_max: u32) -> Self {
        self.precision_max = precision_max;
        self
    }

    /// Solves the axis for data in `data_min..=data_max`.
    ///
    /// Missing data is treated as `0..=1`. Fixed bounds replace the data value on their side.
    pub fn solve(
        &self,
        data_min: Option<f64>,
        data_max: Option<f64>,
    ) -> Result<AxisScale, AxisError> {
        let min_calculated = self.min.is_calculated();
        let max_calculated = self.max.is_calculated();

        let mut min = match self.min {
            AxisBound::Fixed(value) => value,
            AxisBound::Calculated => data_min.unwrap_or(EMPTY_DATA.0),
        };
        let max = match self.max {
            AxisBound::Fixed(value) => value,
            AxisBound::Calculated => data_max.unwrap_or(EMPTY_DATA.1),
        };
        if self.stacked && min_calculated {
            min = min.min(0.0);
        }

        let scale = ScaleExtremesSpec::new(min, max)
            .with_binary(is_binary_unit(&self.units))
            .with_calc_power(!self.units.starts_with(NO_SCALING_MARKER))
            .with_calc_min(min_calculated)
            .with_calc_max(max_calculated)
            .with_rows(self.rows.min, self.rows.max)
            .solve()
            .ok_or(AxisError::InvalidBounds { min, max })?;

        let ticks = scale_ticks(
            &scale,
            min_calculated,
            max_calculated,
            &self.units,
            self.precision_max,
        )
        .collect();

        tracing::trace!(
            units = %self.units,
            min = scale.min,
            max = scale.max,
            rows = scale.rows,
            "solved axis"
        );

        Ok(AxisScale {
            scale,
            ticks,
            min_calculated,
            max_calculated,
        })
    }
}

/// A solved axis: its scale and labelled ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisScale {
    /// The solved scale.
    pub scale: Scale,
    /// Ticks from the minimum to the maximum.
    pub ticks: Vec<Tick>,
    min_calculated: bool,
    max_calculated: bool,
}

impl AxisScale {
    /// The row range a second axis must use so its gridlines line up with this one.
    ///
    /// Only axes with both bounds calculated dictate the rows; otherwise `None`.
    pub fn shared_rows(&self) -> Option<RowRange> {
        (self.min_calculated && self.max_calculated).then(|| RowRange::exact(self.scale.rows))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::*;

    fn labels(axis: &AxisScale) -> Vec<&str> {
        axis.ticks.iter().map(|tick| tick.label.as_str()).collect()
    }

    #[test]
    fn byte_axis() {
        let axis = AxisSpec::new("B")
            .with_rows(RowRange::exact(3))
            .solve(Some(0.0), Some(2_700.0));
        let Ok(axis) = axis else {
            panic!("byte axis must solve");
        };
        assert!(axis.scale.is_binary);
        assert_eq!(axis.scale.power, 1);
        assert_eq!(axis.scale.max, 3_072.0);
        assert_eq!(labels(&axis), ["0 B", "1 KB", "2 KB", "3 KB"]);
    }

    #[test]
    fn missing_data_defaults_to_unit_range() {
        let Ok(axis) = AxisSpec::new("").solve(None, None) else {
            panic!("empty axis must solve");
        };
        assert!(axis.scale.min <= 0.0);
        assert!(axis.scale.max >= 1.0);
    }

    #[test]
    fn fixed_bounds_replace_the_data() {
        let spec = AxisSpec::new("%")
            .with_min(AxisBound::Fixed(0.0))
            .with_max(AxisBound::Fixed(100.0));
        let Ok(axis) = spec.solve(Some(12.0), Some(57.0)) else {
            panic!("fixed axis must solve");
        };
        assert_eq!((axis.scale.min, axis.scale.max), (0.0, 100.0));
        assert_eq!(axis.scale.rows, 4, "25 is the roundest even split");
        assert_eq!(axis.shared_rows(), None);
    }

    #[test]
    fn stacked_axes_include_zero() {
        let spec = AxisSpec::new("").with_stacked(true);
        let Ok(axis) = spec.solve(Some(40.0), Some(90.0)) else {
            panic!("stacked axis must solve");
        };
        assert_eq!(axis.scale.min, 0.0);

        let Ok(axis) = AxisSpec::new("").solve(Some(40.0), Some(90.0)) else {
            panic!("axis must solve");
        };
        assert!(axis.scale.min > 0.0, "unstacked axes may start above zero");
    }

    #[test]
    fn marked_units_disable_the_prefix() {
        let Ok(axis) = AxisSpec::new("!req").solve(Some(0.0), Some(25_000.0)) else {
            panic!("axis must solve");
        };
        assert_eq!(axis.scale.power, 0);
        assert_eq!(axis.ticks.last().map(|tick| tick.label.as_str()), Some("30000 req"));
    }

    #[test]
    fn inverted_fixed_bounds_are_an_error() {
        let spec = AxisSpec::new("")
            .with_min(AxisBound::Fixed(10.0))
            .with_max(AxisBound::Fixed(5.0));
        let err = spec.solve(None, None);
        assert_eq!(err, Err(AxisError::InvalidBounds { min: 10.0, max: 5.0 }));
        if let Err(err) = err {
            assert_eq!(err.to_string(), "axis bounds 10..5 cannot form a scale");
        }
    }

    #[test]
    fn shared_rows_pin_the_second_axis() {
        let Ok(first) = AxisSpec::new("").solve(Some(10.0), Some(90.0)) else {
            panic!("axis must solve");
        };
        let Some(rows) = first.shared_rows() else {
            panic!("calculated axes share their rows");
        };
        assert_eq!(rows, RowRange::exact(first.scale.rows));

        let Ok(second) = AxisSpec::new("B")
            .with_rows(rows)
            .solve(Some(0.0), Some(7_000.0))
        else {
            panic!("second axis must solve");
        };
        assert_eq!(second.scale.rows, first.scale.rows);
    }
}
