//! Full render-path benchmark: stereo engine, parameter events mid-block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_phaser::engine::{PhaserEngine, PhaserKernel, RenderEvent};
use saavy_phaser::params::ParamAddress;
use saavy_phaser::RenderFormat;

use crate::BLOCK_SIZES;

fn stereo_engine(max_frames: usize) -> PhaserEngine {
    let mut processor = PhaserEngine::new(PhaserKernel::new());
    processor
        .set_rendering_format(RenderFormat {
            sample_rate: 48_000.0,
            channel_count: 2,
            max_frames,
            samples_per_filter_update: 10,
        })
        .unwrap();
    let kernel = processor.kernel_mut();
    kernel.set_parameter_value(ParamAddress::Rate.as_raw(), 1.0);
    kernel.set_parameter_value(ParamAddress::Depth.as_raw(), 100.0);
    kernel.set_parameter_value(ParamAddress::Intensity.as_raw(), 75.0);
    kernel.set_parameter_value(ParamAddress::Dry.as_raw(), 30.0);
    kernel.set_parameter_value(ParamAddress::Wet.as_raw(), 70.0);
    kernel.set_parameter_value(ParamAddress::Odd90.as_raw(), 1.0);
    processor
}

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/render");

    for &size in BLOCK_SIZES {
        let source: Vec<f32> = (0..size).map(|i| (i as f32 * 0.031).sin() * 0.5).collect();

        // Steady state: no events inside the block.
        let mut processor = stereo_engine(size);
        let mut output = vec![vec![0.0; size]; 2];
        group.bench_with_input(BenchmarkId::new("eventless", size), &size, |b, _| {
            b.iter(|| {
                processor
                    .process_and_render(
                        0,
                        size,
                        0,
                        Some(&mut output),
                        &[],
                        |_, frames, _, input| {
                            for channel in input.iter_mut() {
                                channel[..frames].copy_from_slice(&source[..frames]);
                            }
                            Ok(())
                        },
                    )
                    .unwrap();
                black_box(&output);
            })
        });

        // Automation burst: four events force four render segments.
        let mut processor = stereo_engine(size);
        let mut output = vec![vec![0.0; size]; 2];
        let quarter = (size / 4) as i64;
        let events = [
            RenderEvent::parameter(quarter, ParamAddress::Wet, 40.0),
            RenderEvent::parameter(quarter * 2, ParamAddress::Depth, 60.0),
            RenderEvent::parameter_ramp(quarter * 3, ParamAddress::Intensity, 20.0, 64),
            RenderEvent::parameter(quarter * 3, ParamAddress::Odd90, 0.0),
        ];
        group.bench_with_input(BenchmarkId::new("four_events", size), &size, |b, _| {
            b.iter(|| {
                processor
                    .process_and_render(
                        0,
                        size,
                        0,
                        Some(&mut output),
                        &events,
                        |_, frames, _, input| {
                            for channel in input.iter_mut() {
                                channel[..frames].copy_from_slice(&source[..frames]);
                            }
                            Ok(())
                        },
                    )
                    .unwrap();
                black_box(&output);
            })
        });
    }

    group.finish();
}
