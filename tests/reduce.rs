extern crate lasinterval;

use lasinterval::IntervalIndex;

fn intervals(index: &IntervalIndex, cell_index: i32) -> Vec<(u32, u32)> {
    index.get_cell(cell_index).unwrap().intervals().map(|iv| (iv.start, iv.end)).collect()
}

/// Cells of four points each, spread over a range of gap sizes.
fn scattered_cells() -> IntervalIndex {
    let mut index = IntervalIndex::with_threshold(0);
    let mut point = 0;
    for round in 1..=4 {
        for cell in 0..4 {
            index.add(point, cell).unwrap();
            point += round * (cell as u32 + 1);
        }
    }
    index
}

#[test]
fn reduction_bounds_the_interval_count() {
    for maximum_intervals in [0, 4, 5, 8, 11, 16, 100] {
        let mut index = scattered_cells();
        let before = index.number_of_intervals();
        index.merge_intervals(maximum_intervals, false);

        let after = index.number_of_intervals();
        assert!(after <= maximum_intervals.max(index.number_of_cells()));
        assert!(after <= before);
        for cell in &index {
            let covered: u64 = cell.intervals().map(|iv| iv.len()).sum();
            assert_eq!(cell.total(), covered);
            assert_eq!(cell.full(), 4);
        }
    }
}

#[test]
fn reduction_is_idempotent() {
    let mut index = scattered_cells();
    index.merge_intervals(9, false);
    let once: Vec<_> = (0..4).map(|cell| intervals(&index, cell)).collect();

    let reduction = index.merge_intervals(9, false);
    assert_eq!(reduction.closed, 0);
    let twice: Vec<_> = (0..4).map(|cell| intervals(&index, cell)).collect();
    assert_eq!(once, twice);
}

#[test]
fn per_cell_budget() {
    let mut index = scattered_cells();
    assert_eq!(index.number_of_intervals(), 16);

    let reduction = index.merge_intervals_per_cell(2, false);
    assert_eq!(reduction.maximum_gaps, 4);
    assert_eq!(index.number_of_intervals(), 8);
}

#[test]
fn reduction_report() {
    let mut index = IntervalIndex::with_threshold(0);
    for point in [0, 6, 8, 12] {
        index.add(point, 0).unwrap();
    }
    let reduction = index.merge_intervals(2, true);
    assert_eq!(reduction.gaps, 3);
    assert_eq!(reduction.closed, 2);
    assert_eq!(reduction.largest_gap_closed, Some(3));
    assert_eq!(reduction.smallest_gap_left, Some(5));
    assert_eq!(reduction.to_string(), "closed 2 of 3 interval gaps, largest interval gap increased to 3");
}

#[test]
fn reduction_then_merge() {
    let mut index = scattered_cells();
    index.merge_intervals(4, false);
    assert!(index.merge_cells(&[0, 1, 2, 3], 0));
    assert_eq!(index.number_of_cells(), 1);
    assert_eq!(index.get_cell(0).unwrap().full(), 16);
    assert_eq!(index.number_of_intervals(), index.get_cell(0).unwrap().len() as u32);
}
