use core::mem;
use std::collections::BTreeMap;

use crate::index::{CellId, IntervalIndex, Merged};
use crate::{Cell, Error, Interval, Result};

impl IntervalIndex {
    /// Adds the cell behind `current` to the merge set. `current` is the
    /// [`id`](crate::CellView::id) of a cell returned by a query.
    ///
    /// Returns `false` if the handle no longer points to a cell.
    pub fn add_current_cell_to_merge_cell_set(&mut self, current: CellId) -> bool {
        if self.slots.get(current).is_none() {
            return false;
        }
        self.merge_set.insert(current);
        true
    }

    /// Adds the cell `cell_index` to the merge set. Returns `false` if there
    /// is no such cell.
    ///
    /// With `erase` the cell is removed from the index and the merge set takes
    /// ownership of it, so that the next [`merge`](IntervalIndex::merge)
    /// consumes it.
    pub fn add_cell_to_merge_cell_set(&mut self, cell_index: i32, erase: bool) -> bool {
        let id = if erase { self.detach(cell_index) } else { self.cells.get(&cell_index).copied() };
        match id {
            Some(id) => {
                self.merge_set.insert(id);
                true
            }
            None => false,
        }
    }

    /// Empties the merge set. Cells that were removed from the index when
    /// they were added are dropped.
    pub fn clear_merge_cell_set(&mut self) {
        for id in mem::take(&mut self.merge_set) {
            self.release(id);
        }
    }

    /// Merges the cells of the merge set into one cell, available through
    /// [`get_merged_cell`](IntervalIndex::get_merged_cell) until the next
    /// merge. The merge set is emptied. Returns `false` if it was empty.
    ///
    /// A single cell is exposed as is. Several cells are combined into a new
    /// cell whose `full` is the sum of theirs and whose intervals are the
    /// union of theirs, where intervals at most `threshold` apart are joined.
    ///
    /// With `erase` every merged cell is removed from the index; cells that
    /// were already removed when added to the merge set are consumed in any
    /// case. A single cell is never consumed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::{Interval, IntervalIndex};
    ///
    /// let mut index = IntervalIndex::with_threshold(5);
    /// index.add(0, 1).unwrap();
    /// index.add(10, 1).unwrap();
    /// index.add(3, 2).unwrap();
    ///
    /// index.add_cell_to_merge_cell_set(1, false);
    /// index.add_cell_to_merge_cell_set(2, false);
    /// assert!(index.merge(false));
    ///
    /// let merged = index.get_merged_cell().unwrap();
    /// assert_eq!(merged.intervals().collect::<Vec<_>>(), [Interval::new(0, 3), Interval::new(10, 10)]);
    /// assert_eq!(merged.full(), 3);
    /// assert_eq!(merged.total(), 5);
    /// assert_eq!(index.number_of_cells(), 2);
    /// ```
    pub fn merge(&mut self, erase: bool) -> bool {
        self.discard_merged();

        let ids: Vec<CellId> = mem::take(&mut self.merge_set)
            .into_iter()
            .filter(|&id| self.slots.get(id).is_some())
            .collect();

        match ids.as_slice() {
            [] => return false,
            [id] => self.merged = Some(Merged::Borrowed(*id)),
            _ => {
                let mut full = 0u32;
                let mut intervals = Vec::new();
                for &id in &ids {
                    if erase || self.is_detached(id) {
                        if let Some(cell) = self.free(id) {
                            full = full.saturating_add(cell.full());
                            intervals.extend(cell.into_intervals());
                        }
                    } else if let Some(cell) = self.slots.get(id) {
                        full = full.saturating_add(cell.full());
                        intervals.extend_from_slice(cell.as_slice());
                    }
                }
                self.merged = Some(Merged::Owned(coalesce(intervals, full, self.threshold)));
            }
        }
        true
    }

    /// Merges the cells `indices` into a single cell stored under
    /// `new_index`. The original cells are removed.
    ///
    /// A single index is simply re-keyed. Indices that do not exist are
    /// skipped; see [`try_merge_cells`](IntervalIndex::try_merge_cells) for a
    /// strict variant. If `new_index` already names a cell that is not part
    /// of `indices`, that cell is merged in as well. Returns `false`, and
    /// leaves the index untouched, if none of `indices` exist.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::{Interval, IntervalIndex};
    ///
    /// let mut index = IntervalIndex::with_threshold(1);
    /// index.add(0, 1).unwrap();
    /// index.add(1, 2).unwrap();
    /// index.add(5, 3).unwrap();
    ///
    /// assert!(index.merge_cells(&[1, 2, 3], 10));
    /// assert_eq!(index.number_of_cells(), 1);
    /// assert_eq!(index.number_of_intervals(), 2);
    ///
    /// let cell = index.get_cell(10).unwrap();
    /// assert_eq!(cell.intervals().collect::<Vec<_>>(), [Interval::new(0, 1), Interval::new(5, 5)]);
    /// assert_eq!(cell.full(), 3);
    /// ```
    pub fn merge_cells(&mut self, indices: &[i32], new_index: i32) -> bool {
        if !indices.iter().any(|cell_index| self.cells.contains_key(cell_index)) {
            return false;
        }
        let absorb_target = !indices.contains(&new_index) && self.cells.contains_key(&new_index);

        if let ([cell_index], false) = (indices, absorb_target) {
            if *cell_index == new_index {
                return self.cells.contains_key(&new_index);
            }
            return match self.detach(*cell_index) {
                Some(id) => {
                    self.attach(new_index, id);
                    true
                }
                None => false,
            };
        }

        self.clear_merge_cell_set();
        for &cell_index in indices.iter().chain(absorb_target.then_some(&new_index)) {
            self.add_cell_to_merge_cell_set(cell_index, true);
        }
        if !self.merge(true) {
            return false;
        }
        match self.merged.take() {
            Some(Merged::Borrowed(id)) => self.attach(new_index, id),
            Some(Merged::Owned(cell)) => {
                self.insert_cell(new_index, cell);
            }
            None => return false,
        }
        true
    }

    /// Like [`merge_cells`](IntervalIndex::merge_cells), but fails without
    /// touching the index if one of `indices` does not exist.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::{Error, IntervalIndex};
    ///
    /// let mut index = IntervalIndex::new();
    /// index.add(0, 1).unwrap();
    /// index.add(1, 2).unwrap();
    ///
    /// assert!(matches!(index.try_merge_cells(&[1, 2, 3], 0), Err(Error::MissingCell(3))));
    /// assert_eq!(index.number_of_cells(), 2);
    /// assert!(index.try_merge_cells(&[1, 2], 0).unwrap());
    /// ```
    pub fn try_merge_cells(&mut self, indices: &[i32], new_index: i32) -> Result<bool> {
        if let Some(&missing) = indices.iter().find(|index| !self.cells.contains_key(index)) {
            return Err(Error::MissingCell(missing));
        }
        Ok(self.merge_cells(indices, new_index))
    }

    /// Merges the cells `indices` without modifying the index and returns
    /// the merged cell. Missing cells are skipped.
    ///
    /// This is how the cells intersecting a query region are turned into
    /// the point intervals that must be read.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::{Interval, IntervalIndex};
    ///
    /// let mut index = IntervalIndex::with_threshold(2);
    /// index.add(0, 1).unwrap();
    /// index.add(2, 2).unwrap();
    /// index.add(9, 3).unwrap();
    ///
    /// let selected = index.select_cells(&[1, 2, 4]).unwrap();
    /// assert_eq!(selected.intervals().collect::<Vec<_>>(), [Interval::new(0, 2)]);
    /// assert!(index.select_cells(&[4]).is_none());
    /// assert_eq!(index.number_of_cells(), 3);
    /// ```
    pub fn select_cells(&mut self, indices: &[i32]) -> Option<&Cell> {
        self.clear_merge_cell_set();
        for &cell_index in indices {
            self.add_cell_to_merge_cell_set(cell_index, false);
        }
        if self.merge(false) {
            self.get_merged_cell()
        } else {
            None
        }
    }

    /// Repeatedly merges groups of sibling cells that hold fewer than
    /// `minimum_points` points into their coarser parent cell.
    ///
    /// `coarsen` maps a cell index to its parent cell index and the indices
    /// of all children of that parent (the cell itself included), or `None`
    /// for a cell that cannot be coarsened. A group is merged only when all
    /// of its children exist. Returns the number of merges done.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::IntervalIndex;
    ///
    /// // cells 1..=4 are the children of cell 0
    /// let parent = |cell: i32| (1..=4).contains(&cell).then(|| (0, vec![1, 2, 3, 4]));
    ///
    /// let mut index = IntervalIndex::new();
    /// for (point, cell) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
    ///     index.add(point, cell).unwrap();
    /// }
    ///
    /// assert_eq!(index.coarsen(10, parent), 1);
    /// assert_eq!(index.number_of_cells(), 1);
    /// assert_eq!(index.get_cell(0).unwrap().full(), 4);
    /// ```
    pub fn coarsen<F>(&mut self, minimum_points: u32, mut coarsen: F) -> usize
    where
        F: FnMut(i32) -> Option<(i32, Vec<i32>)>,
    {
        let mut merges = 0;
        let mut candidates: BTreeMap<i32, u32> =
            self.get_cells().map(|cell| (cell.index(), cell.full())).collect();

        while !candidates.is_empty() {
            let mut coarsened = BTreeMap::new();
            let keys: Vec<i32> = candidates.keys().copied().collect();
            for cell_index in keys {
                if candidates[&cell_index] == 0 {
                    continue;
                }
                let Some((coarser_index, children)) = coarsen(cell_index) else {
                    continue;
                };
                let mut full = 0u32;
                let mut filled = 0;
                for child in &children {
                    if let Some(count) = candidates.get_mut(child) {
                        full = full.saturating_add(mem::take(count));
                        filled += 1;
                    }
                }
                if full < minimum_points && filled == children.len() {
                    self.merge_cells(&children, coarser_index);
                    coarsened.insert(coarser_index, full);
                    merges += 1;
                }
            }
            candidates = coarsened;
        }
        merges
    }

    /// Drops the previous merge result. A borrowed cell is only freed when
    /// nothing else refers to it.
    fn discard_merged(&mut self) {
        if let Some(Merged::Borrowed(id)) = self.merged.take() {
            self.release(id);
        }
    }

    /// Frees a detached cell once neither the merge set nor the merge result
    /// refer to it.
    fn release(&mut self, id: CellId) {
        let borrowed = matches!(self.merged, Some(Merged::Borrowed(merged)) if merged == id);
        if self.is_detached(id) && !borrowed && !self.merge_set.contains(&id) {
            self.slots.remove(id);
        }
    }
}

/// Combines intervals of several cells into the intervals of one cell.
///
/// Intervals are visited by start; the stable sort keeps intervals with the
/// same start in cell order. An interval starting more than `threshold`
/// after the current tail ends opens a new interval, otherwise it extends
/// the tail. `total` only grows by the part reaching beyond the tail.
fn coalesce(mut intervals: Vec<Interval>, full: u32, threshold: u32) -> Cell {
    intervals.sort_by_key(|iv| iv.start);

    let mut iter = intervals.into_iter();
    let mut merged: Vec<Interval> = iter.next().into_iter().collect();
    let mut total = merged.first().map_or(0, Interval::len);

    for iv in iter {
        let Some(tail) = merged.last_mut() else { break };
        if iv.start > tail.end && iv.start - tail.end > threshold {
            total += iv.len();
            merged.push(iv);
        } else if iv.end > tail.end {
            total += u64::from(iv.end - tail.end);
            tail.end = iv.end;
        }
    }

    let cell = Cell::from_intervals(merged, full);
    debug_assert_eq!(cell.total(), total);
    cell
}
