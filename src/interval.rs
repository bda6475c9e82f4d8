use core::cmp::Ordering;
use core::ops::RangeInclusive;

/// A contiguous run of point indices. This interval is inclusive to end.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Hash)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl IntoIterator for Interval {
    type Item = u32;
    type IntoIter = RangeInclusive<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.start..=self.end
    }
}

impl IntoIterator for &'_ Interval {
    type Item = u32;
    type IntoIter = RangeInclusive<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.start..=self.end
    }
}

impl From<RangeInclusive<u32>> for Interval {
    fn from(range: RangeInclusive<u32>) -> Interval {
        Interval::new(*range.start(), *range.end())
    }
}

pub(crate) fn cmp_index_interval(index: u32, iv: Interval) -> Ordering {
    if index < iv.start {
        Ordering::Less
    } else if index > iv.end {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl Interval {
    /// Creates the interval `[start, end]`.
    ///
    /// # Panics
    ///
    /// In debug builds, if `end < start`.
    pub fn new(start: u32, end: u32) -> Interval {
        debug_assert!(start <= end, "interval [{start}, {end}] ends before it starts");
        Interval { start, end }
    }

    pub fn contains_index(&self, value: u32) -> bool {
        self.start <= value && value <= self.end
    }

    pub fn contains_interval(&self, interval: &Interval) -> bool {
        self.start <= interval.start && interval.end <= self.end
    }

    /// Number of point indices covered by this interval.
    pub fn len(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }

    /// Number of point indices strictly between this interval and `next`,
    /// which must start after this one ends.
    pub(crate) fn gap_to(&self, next: &Interval) -> u32 {
        next.start - self.end - 1
    }
}
