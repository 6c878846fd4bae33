//! Criterion micro-benchmarks for the transition rule.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use spore_bench::wrapped_pair;
use spore_rule::{next_state, Neighbourhood};

/// Benchmark: next_state() on every cell of a 16³ grid.
fn bench_next_state_16(c: &mut Criterion) {
    let pair = wrapped_pair(16, 0.3, 42);
    let grid = pair.current();

    c.bench_function("next_state_16_cubed", |b| {
        b.iter(|| {
            for x in 1..=16 {
                for y in 0..16 {
                    for z in 0..16 {
                        black_box(next_state(grid, x, y, z));
                    }
                }
            }
        });
    });
}

/// Benchmark: neighbourhood census alone, dense grid.
fn bench_gather_dense(c: &mut Criterion) {
    let pair = wrapped_pair(16, 1.0, 7);
    let grid = pair.current();

    c.bench_function("gather_dense_4k", |b| {
        b.iter(|| {
            for x in 1..=16 {
                for y in 0..16 {
                    for z in 0..16 {
                        black_box(Neighbourhood::gather(grid, x, y, z).most_common());
                    }
                }
            }
        });
    });
}

criterion_group!(benches, bench_next_state_16, bench_gather_dense);
criterion_main!(benches);
