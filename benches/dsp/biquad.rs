//! Benchmarks for the biquad transform structures.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_phaser::dsp::biquad::{
    Canonical, CanonicalTranspose, Coefficients, Direct, DirectTranspose,
};

use crate::BLOCK_SIZES;

pub fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/biquad");
    let coefficients = Coefficients::apf1(48_000.0, 1_000.0);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = Direct::new(coefficients);
        group.bench_with_input(BenchmarkId::new("direct", size), &size, |b, _| {
            b.iter(|| {
                for &sample in &input {
                    black_box(filter.transform(black_box(sample)));
                }
            })
        });

        let mut filter = Canonical::new(coefficients);
        group.bench_with_input(BenchmarkId::new("canonical", size), &size, |b, _| {
            b.iter(|| {
                for &sample in &input {
                    black_box(filter.transform(black_box(sample)));
                }
            })
        });

        let mut filter = DirectTranspose::new(coefficients);
        group.bench_with_input(BenchmarkId::new("direct_transpose", size), &size, |b, _| {
            b.iter(|| {
                for &sample in &input {
                    black_box(filter.transform(black_box(sample)));
                }
            })
        });

        let mut filter = CanonicalTranspose::new(coefficients);
        group.bench_with_input(
            BenchmarkId::new("canonical_transpose", size),
            &size,
            |b, _| {
                b.iter(|| {
                    for &sample in &input {
                        black_box(filter.transform(black_box(sample)));
                    }
                })
            },
        );
    }

    group.finish();
}
