// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row budgets and tick placement in a plot rectangle.
//!
//! The number of rows an axis may use follows from the plot height: each row needs at least a
//! minimum cell height, and rows more than 1.5 times that tall look sparse.

use kurbo::Rect;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::ticks::Tick;

/// Ratio between the largest and the smallest acceptable row height.
const ROW_HEIGHT_SPREAD: f64 = 1.5;

/// The allowed row counts of an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRange {
    /// Fewest rows.
    pub min: u32,
    /// Most rows.
    pub max: u32,
}

impl Default for RowRange {
    fn default() -> Self {
        let (min, max) = crate::extremes::DEFAULT_ROWS;
        Self { min, max }
    }
}

impl RowRange {
    /// Creates a range, clamping it to `1 <= min <= max`.
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.max(1);
        Self {
            min,
            max: max.max(min),
        }
    }

    /// A range allowing exactly `rows` rows.
    pub fn exact(rows: u32) -> Self {
        Self::new(rows, rows)
    }

    /// Row range for a plot `height` where a row must be at least `min_cell_height` tall.
    pub fn for_height(height: f64, min_cell_height: f64) -> Self {
        let max_rows = height / min_cell_height;
        if !max_rows.is_finite() || max_rows <= 0.0 {
            return Self::exact(1);
        }
        Self::new(rows_from(max_rows / ROW_HEIGHT_SPREAD), rows_from(max_rows))
    }

    /// Row range for the height of `plot`.
    pub fn for_plot(plot: Rect, min_cell_height: f64) -> Self {
        Self::for_height(plot.height(), min_cell_height)
    }
}

fn rows_from(value: f64) -> u32 {
    let value = value.floor().clamp(1.0, f64::from(u32::MAX));
    #[allow(clippy::cast_possible_truncation, reason = "clamped to the u32 range")]
    {
        value as u32
    }
}

impl Tick {
    /// Vertical pixel position of this tick in `plot` (y grows downward).
    pub fn y_in(&self, plot: Rect) -> f64 {
        plot.y1 - plot.height() * self.relative_pos
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::String;

    use super::*;

    #[test]
    fn rows_follow_the_plot_height() {
        assert_eq!(RowRange::for_height(300.0, 30.0), RowRange::new(6, 10));
        assert_eq!(RowRange::for_height(100.0, 30.0), RowRange::new(2, 3));
        assert_eq!(RowRange::for_height(20.0, 30.0), RowRange::exact(1));
        assert_eq!(RowRange::for_height(300.0, 0.0), RowRange::exact(1));
        assert_eq!(RowRange::for_height(-5.0, 30.0), RowRange::exact(1));

        let plot = Rect::new(40.0, 10.0, 640.0, 250.0);
        assert_eq!(RowRange::for_plot(plot, 24.0), RowRange::new(6, 10));
    }

    #[test]
    fn ranges_are_clamped() {
        assert_eq!(RowRange::new(0, 0), RowRange { min: 1, max: 1 });
        assert_eq!(RowRange::new(5, 2), RowRange { min: 5, max: 5 });
    }

    #[test]
    fn ticks_map_bottom_up() {
        let plot = Rect::new(0.0, 20.0, 100.0, 220.0);
        let tick = |relative_pos| Tick {
            relative_pos,
            value: 0.0,
            label: String::new(),
        };
        assert_eq!(tick(0.0).y_in(plot), 220.0);
        assert_eq!(tick(1.0).y_in(plot), 20.0);
        assert_eq!(tick(0.25).y_in(plot), 170.0);
    }
}
