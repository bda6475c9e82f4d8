extern crate lasinterval;

use lasinterval::{Cell, Error, Interval, IntervalIndex, DEFAULT_THRESHOLD};

#[test]
fn smoke() {
    let mut index = IntervalIndex::new();
    assert!(index.is_empty());
    assert_eq!(index.threshold(), DEFAULT_THRESHOLD);
    assert_eq!(index.number_of_cells(), 0);
    assert_eq!(index.number_of_intervals(), 0);

    index.add(0, 0).unwrap();
    index.add(500, 0).unwrap();
    index.add(1501, 0).unwrap();
    assert!(!index.is_empty());
    assert!(index.contains_cell(0));
    assert_eq!(index.number_of_intervals(), 2);

    index.clear();
    assert!(index.is_empty());
    assert_eq!(index.threshold(), DEFAULT_THRESHOLD);
}

#[test]
fn threshold_coalescing() {
    let mut cell = Cell::new(0);
    for point in [1, 2, 100] {
        cell.add(point, 1).unwrap();
    }
    assert_eq!(cell.intervals().collect::<Vec<_>>(), [Interval::new(0, 2), Interval::new(100, 100)]);
    assert_eq!(cell.full(), 4);
    assert_eq!(cell.total(), 4);
}

#[test]
fn gap_absorption_counting() {
    let mut index = IntervalIndex::with_threshold(10);
    index.add(0, 3).unwrap();
    index.add(5, 3).unwrap();

    let cell = index.get_cell(3).unwrap();
    assert_eq!(cell.intervals().collect::<Vec<_>>(), [Interval::new(0, 5)]);
    assert_eq!(cell.full(), 2);
    assert_eq!(cell.total(), 6);
    assert!(cell.contains(3));
}

#[test]
fn points_must_increase_per_cell() {
    let mut index = IntervalIndex::with_threshold(0);
    index.add(10, 1).unwrap();
    // other cells are independent
    index.add(3, 2).unwrap();

    let error = index.add(10, 1).unwrap_err();
    assert!(matches!(error, Error::NonIncreasing { point_index: 10, current_end: 10 }));
    assert_eq!(error.to_string(), "point index 10 does not follow the end 10 of the last interval");
}

#[test]
fn iterate_cells_and_intervals() {
    let mut index = IntervalIndex::with_threshold(1);
    for (point, cell) in [(0, 2), (1, 2), (2, -1), (5, 2), (6, 2), (7, -1)] {
        index.add(point, cell).unwrap();
    }

    let mut seen = Vec::new();
    for cell in &index {
        for interval in cell.intervals() {
            seen.push((cell.index(), interval.start, interval.end));
        }
    }
    assert_eq!(seen, [(-1, 2, 2), (-1, 7, 7), (2, 0, 1), (2, 5, 6)]);

    let last = index.get_cell(2).unwrap();
    assert_eq!(last.intervals().rev().next(), Some(Interval::new(5, 6)));
    assert_eq!(last.intervals().len(), 2);
}

#[test]
fn large_point_indices() {
    let mut index = IntervalIndex::with_threshold(u32::MAX);
    index.add(0, 0).unwrap();
    index.add(u32::MAX, 0).unwrap();

    let cell = index.get_cell(0).unwrap();
    assert_eq!(cell.len(), 1);
    assert_eq!(cell.total(), 1 << 32);
}

#[test]
fn index_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<IntervalIndex>();
}
