use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::index::{CellId, CellView, IntervalIndex, Slots, DEFAULT_THRESHOLD};
use crate::{Cell, Error, Result};

impl IntervalIndex {
    /// Creates an empty `IntervalIndex` using [`DEFAULT_THRESHOLD`](crate::DEFAULT_THRESHOLD).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::IntervalIndex;
    /// let index = IntervalIndex::new();
    /// assert_eq!(index.threshold(), 1000);
    /// ```
    pub fn new() -> IntervalIndex {
        IntervalIndex::with_threshold(DEFAULT_THRESHOLD)
    }

    /// Creates an empty `IntervalIndex`. Consecutive points of a cell that are
    /// at most `threshold` indices apart end up in the same interval.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::IntervalIndex;
    /// let index = IntervalIndex::with_threshold(0);
    /// assert!(index.is_empty());
    /// ```
    pub fn with_threshold(threshold: u32) -> IntervalIndex {
        IntervalIndex {
            slots: Slots::default(),
            cells: BTreeMap::new(),
            threshold,
            number_of_intervals: 0,
            last_touched: None,
            merge_set: BTreeSet::new(),
            merged: None,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Adds the point `point_index` to the cell `cell_index`, creating the
    /// cell if needed. Returns `true` if a new interval was started.
    ///
    /// Points of the same cell must be added in strictly increasing order.
    /// Adding consecutive points to the same cell skips the map lookup.
    ///
    /// # Errors
    ///
    /// [`Error::NonIncreasing`](crate::Error::NonIncreasing) if
    /// `point_index` does not follow the last interval of the cell.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::with_threshold(1);
    /// assert_eq!(index.add(0, 5).unwrap(), true);
    /// assert_eq!(index.add(1, 5).unwrap(), false);
    /// assert_eq!(index.add(8, 5).unwrap(), true);
    /// assert!(index.add(8, 5).is_err());
    /// ```
    pub fn add(&mut self, point_index: u32, cell_index: i32) -> Result<bool> {
        let id = match self.last_touched {
            Some((index, id)) if index == cell_index => id,
            _ => match self.cells.entry(cell_index) {
                Entry::Vacant(entry) => {
                    let id = self.slots.insert(cell_index, Cell::new(point_index));
                    entry.insert(id);
                    self.last_touched = Some((cell_index, id));
                    self.number_of_intervals += 1;
                    return Ok(true);
                }
                Entry::Occupied(entry) => {
                    let id = *entry.get();
                    self.last_touched = Some((cell_index, id));
                    id
                }
            },
        };

        let cell = self.slots.get_mut(id).ok_or(Error::MissingCell(cell_index))?;
        let created = cell.add(point_index, self.threshold)?;
        if created {
            self.number_of_intervals += 1;
        }
        Ok(created)
    }

    /// Number of cells in the index.
    pub fn number_of_cells(&self) -> u32 {
        self.cells.len() as u32
    }

    /// Number of intervals over all cells of the index.
    pub fn number_of_intervals(&self) -> u32 {
        self.number_of_intervals
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains_cell(&self, cell_index: i32) -> bool {
        self.cells.contains_key(&cell_index)
    }

    /// Looks up the cell `cell_index`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::new();
    /// index.add(4, -1).unwrap();
    ///
    /// let cell = index.get_cell(-1).unwrap();
    /// assert_eq!(cell.index(), -1);
    /// assert_eq!(cell.full(), 1);
    /// assert!(index.get_cell(0).is_none());
    /// ```
    pub fn get_cell(&self, cell_index: i32) -> Option<CellView<'_>> {
        let id = *self.cells.get(&cell_index)?;
        let cell = self.slots.get(id)?;
        Some(CellView::new(cell_index, id, cell))
    }

    /// Returns the cell behind a handle, if it still exists.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.slots.get(id)
    }

    /// Removes all cells and resets the merge state. The threshold is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.cells.clear();
        self.number_of_intervals = 0;
        self.last_touched = None;
        self.merge_set.clear();
        self.merged = None;
    }

    /// Registers `cell` under `cell_index`, which must be vacant.
    pub(crate) fn insert_cell(&mut self, cell_index: i32, cell: Cell) -> CellId {
        debug_assert!(!self.cells.contains_key(&cell_index));
        self.number_of_intervals += cell.len() as u32;
        let id = self.slots.insert(cell_index, cell);
        self.cells.insert(cell_index, id);
        id
    }

    /// Removes `cell_index` from the map but keeps its cell alive.
    pub(crate) fn detach(&mut self, cell_index: i32) -> Option<CellId> {
        let id = self.cells.remove(&cell_index)?;
        self.slots.set_key(id, None);
        self.number_of_intervals -= self.slots.get(id).map_or(0, |cell| cell.len() as u32);
        if matches!(self.last_touched, Some((_, touched)) if touched == id) {
            self.last_touched = None;
        }
        Some(id)
    }

    /// Registers a detached cell under `cell_index`, which must be vacant.
    pub(crate) fn attach(&mut self, cell_index: i32, id: CellId) {
        debug_assert!(!self.cells.contains_key(&cell_index));
        debug_assert!(self.slots.key(id).is_none());
        self.number_of_intervals += self.slots.get(id).map_or(0, |cell| cell.len() as u32);
        self.slots.set_key(id, Some(cell_index));
        self.cells.insert(cell_index, id);
    }

    /// Frees a cell, detaching it first if it is still registered.
    pub(crate) fn free(&mut self, id: CellId) -> Option<Cell> {
        if let Some(cell_index) = self.slots.key(id) {
            self.detach(cell_index);
        }
        self.slots.remove(id)
    }

    pub(crate) fn is_detached(&self, id: CellId) -> bool {
        self.slots.get(id).is_some() && self.slots.key(id).is_none()
    }
}

impl Default for IntervalIndex {
    fn default() -> IntervalIndex {
        IntervalIndex::new()
    }
}
