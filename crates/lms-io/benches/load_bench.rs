//! Criterion benchmarks for grid description loading.

use criterion::{Criterion, criterion_group, criterion_main};
use lms_core::test_utils::line_description;
use lms_io::load_str;
use std::hint::black_box;

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    group.sample_size(50);

    // Benchmark: one line with 8 belts on a range-9 hexagon (271 cells).
    let small = line_description("iron", 8);
    group.bench_function("line_8_belts", |b| {
        b.iter(|| load_str(black_box(&small)).unwrap());
    });

    // Benchmark: one line with 64 belts on a range-65 hexagon.
    let large = line_description("iron", 64);
    group.bench_function("line_64_belts", |b| {
        b.iter(|| load_str(black_box(&large)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_load);
criterion_main!(benches);
