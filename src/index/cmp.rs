use crate::IntervalIndex;

/// Two indexes are equal when they hold the same cells under the same cell
/// indices. The threshold and the merge state are not compared.
impl PartialEq for IntervalIndex {
    fn eq(&self, other: &IntervalIndex) -> bool {
        self.number_of_intervals == other.number_of_intervals
            && self.cells.len() == other.cells.len()
            && self
                .get_cells()
                .zip(other.get_cells())
                .all(|(a, b)| a.index() == b.index() && a.cell() == b.cell())
    }
}

impl Eq for IntervalIndex {}
