use core::cmp::Reverse;
use core::fmt;
use std::collections::BinaryHeap;

use crate::index::{CellId, IntervalIndex};
use crate::Interval;

/// What a call to [`IntervalIndex::merge_intervals`] did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub struct Reduction {
    /// How many gaps between intervals were allowed to remain. One interval
    /// per cell is always kept, so this is the requested maximum minus the
    /// number of cells.
    pub maximum_gaps: u32,
    /// Number of gaps before the reduction.
    pub gaps: u32,
    /// Number of gaps that were closed.
    pub closed: u32,
    /// The largest gap that was closed, `None` if no gap was closed.
    pub largest_gap_closed: Option<u32>,
    /// The smallest gap left open, `None` if no gap is left.
    pub smallest_gap_left: Option<u32>,
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.largest_gap_closed {
            Some(gap) => write!(
                f,
                "closed {} of {} interval gaps, largest interval gap increased to {gap}",
                self.closed, self.gaps
            ),
            None => {
                write!(f, "maximum gaps: {} number of interval gaps: {}", self.maximum_gaps, self.gaps)?;
                match self.smallest_gap_left {
                    Some(gap) => write!(f, " next largest interval gap {gap}"),
                    None => Ok(()),
                }
            }
        }
    }
}

/// A node of the linked interval lists the reduction works on. Nodes that
/// were absorbed by their predecessor are no longer `live`; gap entries
/// that still point to them are skipped.
struct Node {
    interval: Interval,
    next: Option<usize>,
    live: bool,
}

/// A gap between `node` and its successor. Entries with the same gap are
/// popped in the order they were pushed.
type GapEntry = Reverse<(u32, u64, usize)>;

impl IntervalIndex {
    /// Reduces the number of intervals over all cells to at most
    /// `maximum_intervals`, or to one interval per cell if there are more
    /// cells than that.
    ///
    /// Neighbouring intervals of the same cell are joined, always closing
    /// the smallest gap first. Each cell's `total` is recomputed afterwards.
    /// With `verbose` the returned [`Reduction`] is also printed to stderr.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::{Interval, IntervalIndex};
    ///
    /// let mut index = IntervalIndex::with_threshold(0);
    /// // gaps of 5, 1 and 3 between the intervals
    /// for point in [0, 6, 8, 12] {
    ///     index.add(point, 0).unwrap();
    /// }
    ///
    /// let reduction = index.merge_intervals(3, false);
    /// assert_eq!(reduction.largest_gap_closed, Some(1));
    ///
    /// let cell = index.get_cell(0).unwrap();
    /// assert_eq!(
    ///     cell.intervals().collect::<Vec<_>>(),
    ///     [Interval::new(0, 0), Interval::new(6, 8), Interval::new(12, 12)],
    /// );
    /// assert_eq!(cell.total(), 5);
    /// assert_eq!(index.number_of_intervals(), 3);
    /// ```
    pub fn merge_intervals(&mut self, maximum_intervals: u32, verbose: bool) -> Reduction {
        // each cell keeps at least one interval
        let maximum_gaps = maximum_intervals.saturating_sub(self.number_of_cells());

        let mut nodes = Vec::with_capacity(self.number_of_intervals as usize);
        let mut heads: Vec<(CellId, usize)> = Vec::with_capacity(self.cells.len());
        let mut heap: BinaryHeap<GapEntry> = BinaryHeap::new();
        let mut sequence = 0u64;

        for &id in self.cells.values() {
            let Some(cell) = self.slots.get(id) else { continue };
            heads.push((id, nodes.len()));
            let intervals = cell.as_slice();
            for (i, &interval) in intervals.iter().enumerate() {
                let node = nodes.len();
                let next = intervals.get(i + 1);
                nodes.push(Node { interval, next: next.map(|_| node + 1), live: true });
                if let Some(next) = next {
                    heap.push(Reverse((interval.gap_to(next), sequence, node)));
                    sequence += 1;
                }
            }
        }

        let gaps = heap.len() as u32;
        let mut size = gaps;
        let mut largest_gap_closed = None;

        while size > maximum_gaps {
            let Some(Reverse((gap, _, node))) = heap.pop() else { break };
            let (true, Some(absorbed)) = (nodes[node].live, nodes[node].next) else { continue };
            nodes[node].interval.end = nodes[absorbed].interval.end;
            nodes[node].next = nodes[absorbed].next;
            nodes[absorbed].live = false;
            if let Some(next) = nodes[node].next {
                let gap = nodes[node].interval.gap_to(&nodes[next].interval);
                heap.push(Reverse((gap, sequence, node)));
                sequence += 1;
            }
            self.number_of_intervals -= 1;
            largest_gap_closed = Some(gap);
            size -= 1;
        }

        let smallest_gap_left = loop {
            match heap.peek() {
                Some(&Reverse((gap, _, node))) if nodes[node].live => break Some(gap),
                Some(_) => {
                    heap.pop();
                }
                None => break None,
            }
        };

        if largest_gap_closed.is_some() {
            for (id, head) in heads {
                let mut intervals = Vec::new();
                let mut current = Some(head);
                while let Some(node) = current {
                    intervals.push(nodes[node].interval);
                    current = nodes[node].next;
                }
                if let Some(cell) = self.slots.get_mut(id) {
                    cell.set_intervals(intervals);
                }
            }
        }

        let reduction =
            Reduction { maximum_gaps, gaps, closed: gaps - size, largest_gap_closed, smallest_gap_left };
        if verbose {
            eprintln!("{reduction}");
        }
        reduction
    }

    /// Like [`merge_intervals`](IntervalIndex::merge_intervals) with a budget
    /// of `per_cell` intervals for every cell of the index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::with_threshold(0);
    /// for point in 0..10 {
    ///     index.add(point * 2, (point % 2) as i32).unwrap();
    /// }
    /// assert_eq!(index.number_of_intervals(), 10);
    ///
    /// index.merge_intervals_per_cell(2, false);
    /// assert_eq!(index.number_of_intervals(), 4);
    /// ```
    pub fn merge_intervals_per_cell(&mut self, per_cell: u32, verbose: bool) -> Reduction {
        self.merge_intervals(per_cell.saturating_mul(self.number_of_cells()), verbose)
    }
}
