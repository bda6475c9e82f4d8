use core::fmt;

use crate::IntervalIndex;

impl fmt::Debug for IntervalIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.cells.len() < 16 {
            let cells: Vec<_> = self
                .get_cells()
                .map(|cell| (cell.index(), cell.intervals().collect::<Vec<_>>()))
                .collect();
            write!(f, "IntervalIndex<{:?}>", cells)
        } else {
            let statistics = self.statistics();
            write!(
                f,
                "IntervalIndex<{:?} cells between {:?} and {:?} with {:?} intervals>",
                statistics.n_cells,
                statistics.min_cell_index.unwrap_or_default(),
                statistics.max_cell_index.unwrap_or_default(),
                statistics.n_intervals
            )
        }
    }
}
