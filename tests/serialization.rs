extern crate lasinterval;

use std::io;

use lasinterval::{Error, Field, Interval, IntervalIndex};

// cells -3, 5 and 7 written in ascending order
static THREE_CELLS: &[u8] = include_bytes!("three_cells.bin");

fn test_data_index() -> IntervalIndex {
    let mut index = IntervalIndex::with_threshold(2);
    for (point, cell) in [(0, 5), (1, 5), (2, -3), (3, 5), (10, 5), (11, -3), (12, 7)] {
        index.add(point, cell).unwrap();
    }
    index
}

fn serialize_and_deserialize(index: &IntervalIndex) -> IntervalIndex {
    let mut buffer = vec![];
    index.serialize_into(&mut buffer).unwrap();
    assert_eq!(buffer.len(), index.serialized_size());
    IntervalIndex::deserialize_from(&buffer[..]).unwrap()
}

#[test]
fn test_deserialize_from_provided_data() {
    let index = IntervalIndex::deserialize_from(THREE_CELLS).unwrap();
    assert_eq!(index, test_data_index());

    let cell = index.get_cell(5).unwrap();
    assert_eq!(cell.intervals().collect::<Vec<_>>(), [Interval::new(0, 3), Interval::new(10, 10)]);
    assert_eq!(cell.full(), 4);
    assert_eq!(cell.total(), 5);
}

#[test]
fn test_serialize_into_provided_data() {
    let index = test_data_index();
    let mut buffer = vec![];
    index.serialize_into(&mut buffer).unwrap();
    assert!(THREE_CELLS == &buffer[..]);
}

#[test]
fn test_empty() {
    let original = IntervalIndex::new();
    let new = serialize_and_deserialize(&original);
    assert_eq!(original, new);
    assert_eq!(original.serialized_size(), 12);
}

#[test]
fn test_one_point() {
    let mut original = IntervalIndex::new();
    original.add(u32::MAX, i32::MIN).unwrap();
    let new = serialize_and_deserialize(&original);
    assert_eq!(original, new);
    assert_eq!(new.get_cell(i32::MIN).unwrap().total(), 1);
}

#[test]
fn test_many_cells_and_intervals() {
    let mut original = IntervalIndex::with_threshold(3);
    for point in 0..100_000u32 {
        let cell = ((point / 7) % 97) as i32 - 48;
        original.add(point, cell).unwrap();
    }
    let new = serialize_and_deserialize(&original);
    assert_eq!(original, new);
    assert_eq!(original.statistics(), new.statistics());
}

#[test]
fn test_reduced_index() {
    let mut original = test_data_index();
    original.merge_intervals(3, false);
    let new = serialize_and_deserialize(&original);
    assert_eq!(original, new);
    assert_eq!(new.number_of_intervals(), 3);
}

#[test]
fn test_read_into_existing_index() {
    let mut index = IntervalIndex::with_threshold(1);
    index.add(50, 1).unwrap();
    index.add(51, 2).unwrap();

    index.read(THREE_CELLS).unwrap();
    assert_eq!(index, test_data_index());
    assert_eq!(index.threshold(), 1);
    assert!(!index.contains_cell(1));
}

#[test]
fn test_truncated_data() {
    for len in 0..THREE_CELLS.len() {
        let error = IntervalIndex::deserialize_from(&THREE_CELLS[..len]).unwrap_err();
        match error {
            Error::Read { source, .. } => assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error {other}"),
        }
    }

    let error = IntervalIndex::deserialize_from(&THREE_CELLS[..13]).unwrap_err();
    assert!(matches!(error, Error::Read { field: Field::CellIndex, .. }));
    assert_eq!(error.to_string(), "reading cell index");
}

#[test]
fn test_failing_writer() {
    struct Full;

    impl io::Write for Full {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let error = test_data_index().serialize_into(Full).unwrap_err();
    assert!(matches!(error, Error::Write { field: Field::Signature, .. }));
}
