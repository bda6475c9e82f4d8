//! Per-cell point index intervals for point clouds, the index LAStools
//! stores in `.lax` files next to LAS/LAZ files.
//!
//! Points are visited once in file order and tagged with the spatial cell
//! they fall into. An [`IntervalIndex`] records, for each cell, the runs of
//! point indices that belong to it, so that a spatial query only needs to
//! read or decompress those runs.
//!
//! ```rust
//! use lasinterval::{Interval, IntervalIndex};
//!
//! let mut index = IntervalIndex::with_threshold(4);
//! for (point, cell) in [(0, 1), (1, 1), (2, 2), (3, 1), (20, 1), (21, 2)] {
//!     index.add(point, cell).unwrap();
//! }
//!
//! // bound the number of seeks a reader has to do
//! index.merge_intervals(3, false);
//!
//! let selected = index.select_cells(&[1]).unwrap();
//! assert_eq!(selected.intervals().collect::<Vec<_>>(), [Interval::new(0, 20)]);
//! ```

#![forbid(unsafe_code)]
#![warn(unused_extern_crates)]
#![deny(missing_debug_implementations)]

mod cell;
mod error;
mod index;
mod interval;

pub use cell::{Cell, Intervals};
pub use error::{Error, Field, Result};
pub use index::{CellId, CellView, Cells, IntervalIndex, Reduction, Statistics, DEFAULT_THRESHOLD};
pub use interval::Interval;
