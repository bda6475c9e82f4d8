use core::iter::FusedIterator;
use core::ops::Deref;
use std::collections::btree_map;

use crate::index::{CellId, IntervalIndex, Merged};
use crate::Cell;

/// A cell of an [`IntervalIndex`] together with its cell index.
///
/// Dereferences to the [`Cell`], so `full`, `total` and `intervals` are
/// directly available.
#[derive(Clone, Copy, Debug)]
pub struct CellView<'a> {
    index: i32,
    id: CellId,
    cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub(crate) fn new(index: i32, id: CellId, cell: &'a Cell) -> CellView<'a> {
        CellView { index, id, cell }
    }

    /// The cell index this cell is registered under.
    pub fn index(&self) -> i32 {
        self.index
    }

    /// A handle on this cell, for
    /// [`add_current_cell_to_merge_cell_set`](IntervalIndex::add_current_cell_to_merge_cell_set).
    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn cell(&self) -> &'a Cell {
        self.cell
    }
}

impl Deref for CellView<'_> {
    type Target = Cell;

    fn deref(&self) -> &Cell {
        self.cell
    }
}

/// An iterator over the cells of an [`IntervalIndex`] in ascending cell
/// index order.
#[derive(Clone, Debug)]
pub struct Cells<'a> {
    inner: btree_map::Iter<'a, i32, CellId>,
    index: &'a IntervalIndex,
}

impl<'a> Iterator for Cells<'a> {
    type Item = CellView<'a>;

    fn next(&mut self) -> Option<CellView<'a>> {
        let (&cell_index, &id) = self.inner.next()?;
        let cell = self.index.slots.get(id)?;
        Some(CellView::new(cell_index, id, cell))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Cells<'_> {}

impl FusedIterator for Cells<'_> {}

impl IntervalIndex {
    /// Iterates all cells in ascending cell index order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::new();
    /// index.add(0, 9).unwrap();
    /// index.add(1, -3).unwrap();
    /// index.add(2, 9).unwrap();
    ///
    /// let summary: Vec<_> = index.get_cells().map(|cell| (cell.index(), cell.full())).collect();
    /// assert_eq!(summary, [(-3, 1), (9, 2)]);
    /// ```
    pub fn get_cells(&self) -> Cells<'_> {
        Cells { inner: self.cells.iter(), index: self }
    }

    /// The cell produced by the last [`merge`](IntervalIndex::merge), if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::with_threshold(0);
    /// index.add(0, 1).unwrap();
    /// index.add(1, 2).unwrap();
    /// assert!(index.get_merged_cell().is_none());
    ///
    /// index.add_cell_to_merge_cell_set(1, false);
    /// index.add_cell_to_merge_cell_set(2, false);
    /// index.merge(false);
    /// assert_eq!(index.get_merged_cell().unwrap().full(), 2);
    /// ```
    pub fn get_merged_cell(&self) -> Option<&Cell> {
        match self.merged.as_ref()? {
            Merged::Borrowed(id) => self.slots.get(*id),
            Merged::Owned(cell) => Some(cell),
        }
    }
}

impl<'a> IntoIterator for &'a IntervalIndex {
    type Item = CellView<'a>;
    type IntoIter = Cells<'a>;

    fn into_iter(self) -> Cells<'a> {
        self.get_cells()
    }
}
