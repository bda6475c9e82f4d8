extern crate lasinterval;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use lasinterval::IntervalIndex;

/// Points of a scan line pattern: runs of points fall into the same cell
/// and the cells repeat every few hundred points.
fn scan_lines(points: u32) -> impl Iterator<Item = (u32, i32)> {
    (0..points).map(|point| (point, ((point / 16) % 64) as i32))
}

fn populated(threshold: u32, points: u32) -> IntervalIndex {
    let mut index = IntervalIndex::with_threshold(threshold);
    for (point, cell) in scan_lines(points) {
        index.add(point, cell).unwrap();
    }
    index
}

fn create(c: &mut Criterion) {
    c.bench_function("create", |b| {
        b.iter(|| {
            IntervalIndex::new();
        })
    });
}

fn add(c: &mut Criterion) {
    c.bench_function("add same cell", |b| {
        b.iter(|| {
            let mut index = IntervalIndex::new();
            for point in 0..10_000 {
                index.add(point, 0).unwrap();
            }
            index
        });
    });

    c.bench_function("add scan lines", |b| {
        b.iter(|| populated(0, 100_000));
    });
}

fn merge(c: &mut Criterion) {
    c.bench_function("select cells", |b| {
        let mut index = populated(100, 100_000);
        let indices: Vec<i32> = (0..64).step_by(3).collect();
        b.iter(|| black_box(index.select_cells(&indices).map(|cell| cell.len())))
    });

    c.bench_function("merge cells", |b| {
        b.iter_batched(
            || populated(100, 100_000),
            |mut index| {
                let indices: Vec<i32> = (0..64).collect();
                index.merge_cells(&indices, -1);
                index
            },
            BatchSize::SmallInput,
        )
    });
}

fn merge_intervals(c: &mut Criterion) {
    c.bench_function("merge intervals", |b| {
        b.iter_batched(
            || populated(0, 100_000),
            |mut index| {
                index.merge_intervals(1_000, false);
                index
            },
            BatchSize::SmallInput,
        )
    });
}

fn serialization(c: &mut Criterion) {
    let index = populated(0, 100_000);

    c.bench_function("serialize", |b| {
        let mut buffer = Vec::with_capacity(index.serialized_size());
        b.iter(|| {
            buffer.clear();
            index.serialize_into(&mut buffer).unwrap();
            black_box(buffer.len())
        })
    });

    c.bench_function("deserialize", |b| {
        let mut buffer = Vec::new();
        index.serialize_into(&mut buffer).unwrap();
        b.iter(|| black_box(IntervalIndex::deserialize_from(&buffer[..]).unwrap()))
    });
}

criterion_group!(benches, create, add, merge, merge_intervals, serialization);
criterion_main!(benches);
