//! Benchmarks for the LFO tick.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_phaser::dsp::lfo::{Lfo, Waveform};

use crate::BLOCK_SIZES;

pub fn bench_lfo(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/lfo");

    for &size in BLOCK_SIZES {
        for (name, waveform) in [
            ("triangle", Waveform::Triangle),
            ("sine", Waveform::Sine),
            ("sawtooth", Waveform::Sawtooth),
        ] {
            let mut lfo = Lfo::new(48_000.0);
            lfo.set_waveform(waveform);
            lfo.set_frequency(5.0);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for _ in 0..size {
                        black_box(lfo.value_and_increment());
                    }
                })
            });
        }

        // The render loop's actual access pattern: both taps, then tick.
        let mut lfo = Lfo::new(48_000.0);
        lfo.set_frequency(5.0);
        group.bench_with_input(BenchmarkId::new("quadrature_pair", size), &size, |b, _| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(lfo.value());
                    black_box(lfo.quad_phase_value());
                    lfo.increment();
                }
            })
        });
    }

    group.finish();
}
