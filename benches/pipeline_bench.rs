//! Benchmark for composed optic pipelines.
//!
//! Measures reads and writes through nested index lenses and traversals over
//! grids of increasing size.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lensing::optics::standard_optics::{each, index, recur};
use lensing::{TypeKey, Value};
use std::hint::black_box;

fn grid(size: i64) -> Value {
    Value::list((0..size).map(|row| Value::list((0..size).map(|column| row * size + column))))
}

// =============================================================================
// get / set Benchmark
// =============================================================================

fn benchmark_nested_index(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("nested_index");
    let cell = index(-1).compose(&index(0)).expect("lenses compose");

    for size in [10, 100, 1000] {
        let state = grid(size);

        group.bench_with_input(BenchmarkId::new("get", size), &state, |bencher, state| {
            bencher.iter(|| black_box(cell.get(black_box(state))));
        });

        group.bench_with_input(BenchmarkId::new("set", size), &state, |bencher, state| {
            bencher.iter(|| black_box(cell.set(black_box(state), Value::from(0))));
        });
    }

    group.finish();
}

// =============================================================================
// modify Benchmark
// =============================================================================

fn benchmark_traversal_modify(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("traversal_modify");
    let cells = each().compose(&each()).expect("traversals compose");
    let ints = recur(TypeKey::Int);

    for size in [10, 100] {
        let state = grid(size);

        group.bench_with_input(BenchmarkId::new("each_each", size), &state, |bencher, state| {
            bencher.iter(|| {
                black_box(cells.modify(black_box(state), |focus| {
                    Value::from(focus.as_int().unwrap_or_default() + 1)
                }))
            });
        });

        group.bench_with_input(BenchmarkId::new("recur", size), &state, |bencher, state| {
            bencher.iter(|| {
                black_box(ints.modify(black_box(state), |focus| {
                    Value::from(focus.as_int().unwrap_or_default() + 1)
                }))
            });
        });
    }

    group.finish();
}

// =============================================================================
// collect Benchmark
// =============================================================================

fn benchmark_collect(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("collect");
    let cells = each().compose(&each()).expect("traversals compose");

    for size in [10, 100] {
        let state = grid(size);
        group.bench_with_input(BenchmarkId::new("each_each", size), &state, |bencher, state| {
            bencher.iter(|| black_box(cells.collect(black_box(state))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_nested_index,
    benchmark_traversal_modify,
    benchmark_collect
);
criterion_main!(benches);
