use crate::IntervalIndex;

/// Detailed statistics on the composition of an index.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub struct Statistics {
    /// Number of cells in the index
    pub n_cells: u32,
    /// Number of intervals over all cells
    pub n_intervals: u32,
    /// Number of points added to the cells
    pub n_points: u64,
    /// Number of point indices covered by the intervals, skipped ones included
    pub n_covered: u64,
    /// Largest number of intervals in a single cell
    pub max_intervals_per_cell: u32,
    /// Smallest cell index in the index
    pub min_cell_index: Option<i32>,
    /// Largest cell index in the index
    pub max_cell_index: Option<i32>,
}

impl IntervalIndex {
    /// Returns statistics about the composition of an index.
    ///
    /// ```
    /// use lasinterval::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::with_threshold(2);
    /// for (point, cell) in [(0, 1), (2, 1), (3, 4), (9, 1)] {
    ///     index.add(point, cell).unwrap();
    /// }
    /// let statistics = index.statistics();
    ///
    /// assert_eq!(statistics.n_cells, 2);
    /// assert_eq!(statistics.n_intervals, 3);
    /// assert_eq!(statistics.n_points, 4);
    /// assert_eq!(statistics.n_covered, 5);
    /// assert_eq!(statistics.max_intervals_per_cell, 2);
    /// assert_eq!(statistics.min_cell_index, Some(1));
    /// assert_eq!(statistics.max_cell_index, Some(4));
    /// ```
    pub fn statistics(&self) -> Statistics {
        let mut n_intervals = 0;
        let mut n_points = 0;
        let mut n_covered = 0;
        let mut max_intervals_per_cell = 0;

        for cell in self.get_cells() {
            let len = cell.len() as u32;
            n_intervals += len;
            n_points += u64::from(cell.full());
            n_covered += cell.total();
            max_intervals_per_cell = max_intervals_per_cell.max(len);
        }

        Statistics {
            n_cells: self.number_of_cells(),
            n_intervals,
            n_points,
            n_covered,
            max_intervals_per_cell,
            min_cell_index: self.cells.keys().next().copied(),
            max_cell_index: self.cells.keys().next_back().copied(),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::IntervalIndex;

    #[test]
    fn empty_index() {
        let statistics = IntervalIndex::new().statistics();
        assert_eq!(statistics.n_cells, 0);
        assert_eq!(statistics.n_points, 0);
        assert_eq!(statistics.min_cell_index, None);
        assert_eq!(statistics.max_cell_index, None);
    }

    #[test]
    fn intervals_match_the_counter() {
        let mut index = IntervalIndex::with_threshold(0);
        for point in 0..50 {
            index.add(point, (point % 7) as i32 - 3).unwrap();
        }
        let statistics = index.statistics();
        assert_eq!(statistics.n_intervals, index.number_of_intervals());
        assert_eq!(statistics.n_points, 50);
        assert_eq!(statistics.n_covered, 50);
        assert_eq!(statistics.max_intervals_per_cell, 8);
        assert_eq!(statistics.min_cell_index, Some(-3));
        assert_eq!(statistics.max_cell_index, Some(3));
    }
}
