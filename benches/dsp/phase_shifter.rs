//! Benchmarks for the six-band phase shifter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_phaser::dsp::phase_shifter::{PhaseShifter, IDEAL};

use crate::BLOCK_SIZES;

pub fn bench_phase_shifter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/phase_shifter");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.02).sin() * 0.5)
            .collect();

        // Coefficient refresh every 10 samples, the engine default.
        let mut shifter = PhaseShifter::new(&IDEAL, 48_000.0, 0.7, 10);
        group.bench_with_input(BenchmarkId::new("update_every_10", size), &size, |b, _| {
            b.iter(|| {
                for (i, &sample) in input.iter().enumerate() {
                    let modulation = (i as f32 / size as f32) * 2.0 - 1.0;
                    black_box(shifter.process(black_box(modulation), black_box(sample)));
                }
            })
        });

        // Textbook rate: recompute the coefficients every sample.
        let mut shifter = PhaseShifter::new(&IDEAL, 48_000.0, 0.7, 1);
        group.bench_with_input(BenchmarkId::new("update_every_1", size), &size, |b, _| {
            b.iter(|| {
                for (i, &sample) in input.iter().enumerate() {
                    let modulation = (i as f32 / size as f32) * 2.0 - 1.0;
                    black_box(shifter.process(black_box(modulation), black_box(sample)));
                }
            })
        });
    }

    group.finish();
}
