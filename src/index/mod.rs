use std::collections::{BTreeMap, BTreeSet};

use slotmap::{new_key_type, SlotMap};

use crate::Cell;

mod fmt;
#[cfg(feature = "serde")]
mod serde;

// Order of these modules matters as it determines the `impl` blocks order in
// the docs
mod cmp;
mod inherent;
mod iter;
mod merge;
mod reduce;
mod serialization;
mod statistics;

pub use self::iter::{CellView, Cells};
pub use self::reduce::Reduction;
pub use self::statistics::Statistics;

/// The gap threshold used by [`IntervalIndex::new`].
pub const DEFAULT_THRESHOLD: u32 = 1000;

/// Per-cell point index intervals of a point cloud.
///
/// Points are added in one pass in increasing index order, each tagged with
/// the index of the spatial cell it falls into. Every cell records the runs
/// of point indices that belong to it, so that a reader can later seek
/// straight to the points of the cells it is interested in.
///
/// # Examples
///
/// ```rust
/// use lasinterval::{Interval, IntervalIndex};
///
/// let mut index = IntervalIndex::with_threshold(2);
///
/// index.add(0, 7).unwrap();
/// index.add(1, 7).unwrap();
/// index.add(2, 3).unwrap();
/// index.add(3, 7).unwrap();
/// index.add(9, 7).unwrap();
///
/// let cell = index.get_cell(7).unwrap();
/// assert_eq!(cell.intervals().collect::<Vec<_>>(), [Interval::new(0, 3), Interval::new(9, 9)]);
/// assert_eq!(index.number_of_cells(), 2);
/// assert_eq!(index.number_of_intervals(), 3);
/// ```
pub struct IntervalIndex {
    slots: Slots,
    cells: BTreeMap<i32, CellId>,
    threshold: u32,
    number_of_intervals: u32,
    last_touched: Option<(i32, CellId)>,
    merge_set: BTreeSet<CellId>,
    merged: Option<Merged>,
}

new_key_type! {
    /// A handle on a cell of an [`IntervalIndex`].
    ///
    /// Handles are returned by the query methods and stay valid until the cell
    /// is merged away or the index is cleared.
    pub struct CellId;
}

/// The result of the last [`IntervalIndex::merge`].
#[derive(Debug)]
pub(crate) enum Merged {
    /// A single cell was merged, it is exposed as is.
    Borrowed(CellId),
    /// Several cells were merged into a cell that no map entry owns.
    Owned(Cell),
}

#[derive(Debug)]
struct Slot {
    /// The cell index this cell is registered under, `None` once it was
    /// detached from the map.
    key: Option<i32>,
    cell: Cell,
}

/// Storage for the cells of an index. Removed cells leave their handles
/// stale.
#[derive(Debug, Default)]
struct Slots(SlotMap<CellId, Slot>);

impl Slots {
    fn insert(&mut self, key: i32, cell: Cell) -> CellId {
        self.0.insert(Slot { key: Some(key), cell })
    }

    fn get(&self, id: CellId) -> Option<&Cell> {
        self.0.get(id).map(|slot| &slot.cell)
    }

    fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.0.get_mut(id).map(|slot| &mut slot.cell)
    }

    fn key(&self, id: CellId) -> Option<i32> {
        self.0.get(id).and_then(|slot| slot.key)
    }

    fn set_key(&mut self, id: CellId, key: Option<i32>) {
        if let Some(slot) = self.0.get_mut(id) {
            slot.key = key;
        }
    }

    fn remove(&mut self, id: CellId) -> Option<Cell> {
        self.0.remove(id).map(|slot| slot.cell)
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}
