// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nice value axes for monitoring graphs.
//!
//! Given the range of the plotted data, this crate picks axis bounds, a gridline interval and a
//! row count so that:
//! - the data is always covered, with some clearance to the outer gridlines,
//! - gridlines sit on round values (`1`, `2`, `5` times a power of ten, or powers of two for
//!   bytes) in the magnitude the labels are shown in,
//! - every label of the axis shares one precision, so the column of labels lines up.
//!
//! The pieces can be used separately ([`scale_intervals`], [`solve_scale_extremes`],
//! [`scale_ticks`]) or through [`AxisSpec`], which also handles user-fixed bounds.
//!
//! ```
//! use gridscale_scale::AxisSpec;
//!
//! let axis = AxisSpec::new("B").solve(Some(0.0), Some(2_700.0)).unwrap();
//! assert!(axis.scale.max >= 2_700.0);
//! assert_eq!(axis.ticks.first().map(|t| t.label.as_str()), Some("0 B"));
//! ```

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod axis;
mod extremes;
#[cfg(not(feature = "std"))]
mod float;
mod interval;
mod layout;
mod ticks;

pub use axis::{AxisBound, AxisError, AxisScale, AxisSpec, DEFAULT_PRECISION_MAX};
pub use extremes::{DEFAULT_ROWS, MAX_POWER, Scale, ScaleExtremesSpec, solve_scale_extremes};
pub use interval::{ScaleIntervals, scale_intervals};
pub use layout::RowRange;
pub use ticks::{ScaleTicks, Tick, scale_ticks};
