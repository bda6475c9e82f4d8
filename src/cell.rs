use core::iter::FusedIterator;
use core::slice;

use crate::interval::{cmp_index_interval, Interval};
use crate::{Error, Result};

/// The interval list of one cell.
///
/// Intervals are kept sorted by start and never overlap. Alongside the list
/// a cell tracks how many points were inserted into it (`full`) and how many
/// point indices its intervals cover (`total`). The two differ when small
/// gaps were absorbed into an interval, or after cells were merged.
///
/// # Examples
///
/// ```rust
/// use lasinterval::{Cell, Interval};
///
/// let mut cell = Cell::new(0);
/// assert_eq!(cell.add(1, 1).unwrap(), false);
/// assert_eq!(cell.add(2, 1).unwrap(), false);
/// assert_eq!(cell.add(100, 1).unwrap(), true);
///
/// assert_eq!(cell.intervals().collect::<Vec<_>>(), [Interval::new(0, 2), Interval::new(100, 100)]);
/// assert_eq!(cell.full(), 4);
/// assert_eq!(cell.total(), 4);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Cell {
    intervals: Vec<Interval>,
    full: u32,
    total: u64,
}

impl Cell {
    /// Creates a cell holding the single point `point_index`.
    pub fn new(point_index: u32) -> Cell {
        Cell { intervals: vec![Interval::new(point_index, point_index)], full: 1, total: 1 }
    }

    /// Builds a cell from already sorted, disjoint intervals. `total` is
    /// derived from the intervals.
    pub(crate) fn from_intervals(intervals: Vec<Interval>, full: u32) -> Cell {
        let mut cell = Cell { intervals, full, total: 0 };
        cell.recompute_total();
        cell
    }

    /// Adds a point to the cell. `point_index` must be greater than the end of
    /// the last interval. A cell without intervals starts one at `point_index`.
    ///
    /// When the distance to the end of the last interval is larger than
    /// `threshold` a new interval is started, otherwise the last interval is
    /// extended over the gap. Returns `true` if a new interval was created.
    ///
    /// # Errors
    ///
    /// [`Error::NonIncreasing`] if `point_index` does not follow the last
    /// interval. The cell is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::{Cell, Interval};
    ///
    /// let mut cell = Cell::new(0);
    /// assert_eq!(cell.add(5, 10).unwrap(), false);
    /// assert_eq!(cell.intervals().collect::<Vec<_>>(), [Interval::new(0, 5)]);
    /// assert_eq!(cell.total(), 6);
    /// assert!(cell.add(5, 10).is_err());
    /// ```
    pub fn add(&mut self, point_index: u32, threshold: u32) -> Result<bool> {
        let Some(last) = self.intervals.last_mut() else {
            self.intervals.push(Interval::new(point_index, point_index));
            self.full += 1;
            self.total += 1;
            return Ok(true);
        };
        if point_index <= last.end {
            return Err(Error::NonIncreasing { point_index, current_end: last.end });
        }
        let diff = point_index - last.end;
        self.full += 1;
        if diff > threshold {
            self.intervals.push(Interval::new(point_index, point_index));
            self.total += 1;
            Ok(true)
        } else {
            last.end = point_index;
            self.total += u64::from(diff);
            Ok(false)
        }
    }

    /// Number of points inserted into this cell.
    pub fn full(&self) -> u32 {
        self.full
    }

    /// Number of point indices covered by the intervals of this cell.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of intervals in this cell.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the cell holds no intervals. Cells reachable from an
    /// [`IntervalIndex`](crate::IntervalIndex) always hold at least one.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn first(&self) -> Interval {
        self.intervals[0]
    }

    pub fn last(&self) -> Interval {
        self.intervals[self.intervals.len() - 1]
    }

    /// Returns `true` if one of the intervals covers `point_index`.
    pub fn contains(&self, point_index: u32) -> bool {
        self.intervals.binary_search_by(|iv| cmp_index_interval(point_index, *iv).reverse()).is_ok()
    }

    /// Iterates the intervals in ascending order.
    pub fn intervals(&self) -> Intervals<'_> {
        Intervals { inner: self.intervals.iter() }
    }

    pub(crate) fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub(crate) fn into_intervals(self) -> Vec<Interval> {
        self.intervals
    }

    pub(crate) fn set_intervals(&mut self, intervals: Vec<Interval>) {
        self.intervals = intervals;
        self.recompute_total();
    }

    pub(crate) fn recompute_total(&mut self) {
        self.total = self.intervals.iter().map(Interval::len).sum();
    }
}

/// An iterator over the intervals of a [`Cell`], in ascending order.
#[derive(Clone, Debug)]
pub struct Intervals<'a> {
    inner: slice::Iter<'a, Interval>,
}

impl Iterator for Intervals<'_> {
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Intervals<'_> {
    fn next_back(&mut self) -> Option<Interval> {
        self.inner.next_back().copied()
    }
}

impl ExactSizeIterator for Intervals<'_> {}

impl FusedIterator for Intervals<'_> {}

impl<'a> IntoIterator for &'a Cell {
    type Item = Interval;
    type IntoIter = Intervals<'a>;

    fn into_iter(self) -> Intervals<'a> {
        self.intervals()
    }
}
