//! Criterion micro-benchmarks for arena allocation, finalizers, and reuse.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use zonal::Arena;
use zonal_bench::decode_profile;
use zonal_test_utils::DropCounter;

/// Benchmark: 1K small bump allocations into a warm arena, then clear.
fn bench_bump_alloc_1k(c: &mut Criterion) {
    let mut arena = Arena::new(64 * 1024).unwrap();
    c.bench_function("bump_alloc_1k", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                black_box(arena.allocate(16).unwrap());
            }
            arena.clear().unwrap();
        });
    });
}

/// Benchmark: allocations that overflow a small baseline and force expansion.
fn bench_expand(c: &mut Criterion) {
    let mut arena = Arena::new(256).unwrap();
    c.bench_function("expand_64x200", |b| {
        b.iter(|| {
            for _ in 0..64 {
                black_box(arena.allocate(200).unwrap());
            }
            arena.clear().unwrap();
        });
    });
}

/// Benchmark: register and run 256 finalizers that each own a value.
fn bench_finalizers_256(c: &mut Criterion) {
    let counter = DropCounter::new();
    let mut arena = Arena::new(1024).unwrap();
    c.bench_function("finalizers_256", |b| {
        b.iter(|| {
            for _ in 0..256 {
                let guard = counter.guard();
                arena.register_finalizer(move || drop(guard)).unwrap();
            }
            arena.clear().unwrap();
        });
    });
    black_box(counter.dropped());
}

/// Benchmark: full decode-style cycle on a reused arena.
fn bench_decode_cycle(c: &mut Criterion) {
    let mut arena = Arena::new(8192).unwrap();
    c.bench_function("decode_cycle_512", |b| {
        b.iter(|| {
            black_box(decode_profile(&mut arena, 512, true).unwrap());
            arena.clear().unwrap();
        });
    });
}

/// Benchmark: fresh arena per message (create + destroy) for comparison.
fn bench_decode_fresh_arena(c: &mut Criterion) {
    c.bench_function("decode_fresh_arena_512", |b| {
        b.iter(|| {
            let mut arena = Arena::new(8192).unwrap();
            black_box(decode_profile(&mut arena, 512, false).unwrap());
            arena.destroy().unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_bump_alloc_1k,
    bench_expand,
    bench_finalizers_256,
    bench_decode_cycle,
    bench_decode_fresh_arena
);
criterion_main!(benches);
