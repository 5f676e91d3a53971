//! Offline render: push noise through the stereo engine for a few seconds
//! and print a coarse per-channel level trace, so the sweep is visible
//! without an audio device.

use saavy_phaser::engine::{PhaserEngine, PhaserKernel};
use saavy_phaser::params::ParamAddress;
use saavy_phaser::RenderFormat;

const SAMPLE_RATE: f64 = 44_100.0;
const BLOCK_SIZE: usize = 512;
const SECONDS: usize = 3;

fn main() {
    let mut engine = PhaserEngine::new(PhaserKernel::new());
    engine
        .set_rendering_format(RenderFormat {
            sample_rate: SAMPLE_RATE,
            channel_count: 2,
            max_frames: BLOCK_SIZE,
            samples_per_filter_update: 10,
        })
        .expect("valid format");
    {
        let kernel = engine.kernel_mut();
        kernel.set_parameter_value(ParamAddress::Rate.as_raw(), 0.5);
        kernel.set_parameter_value(ParamAddress::Depth.as_raw(), 100.0);
        kernel.set_parameter_value(ParamAddress::Intensity.as_raw(), 85.0);
        kernel.set_parameter_value(ParamAddress::Dry.as_raw(), 0.0);
        kernel.set_parameter_value(ParamAddress::Wet.as_raw(), 100.0);
        kernel.set_parameter_value(ParamAddress::Odd90.as_raw(), 1.0);
    }

    let mut noise_state = 0x9E37_79B9u32;
    let mut noise = move || {
        noise_state ^= noise_state << 13;
        noise_state ^= noise_state >> 17;
        noise_state ^= noise_state << 5;
        (noise_state >> 9) as f32 / 8_388_608.0 - 1.0
    };

    let mut output = vec![vec![0.0f32; BLOCK_SIZE]; 2];
    let total_blocks = SECONDS * SAMPLE_RATE as usize / BLOCK_SIZE;
    let blocks_per_row = SAMPLE_RATE as usize / BLOCK_SIZE / 10; // ~100ms

    println!("time      left RMS   right RMS");
    let mut accumulator = [0.0f64; 2];
    let mut accumulated_frames = 0usize;

    for block_index in 0..total_blocks {
        let clock = (block_index * BLOCK_SIZE) as i64;
        engine
            .process_and_render(
                clock,
                BLOCK_SIZE,
                0,
                Some(&mut output),
                &[],
                |_, frames, _, input| {
                    for frame in 0..frames {
                        let sample = noise() * 0.5;
                        input[0][frame] = sample;
                        input[1][frame] = sample;
                    }
                    Ok(())
                },
            )
            .expect("offline pull cannot fail");

        for (channel, buffer) in output.iter().enumerate() {
            accumulator[channel] += buffer
                .iter()
                .map(|&s| (s as f64) * (s as f64))
                .sum::<f64>();
        }
        accumulated_frames += BLOCK_SIZE;

        if (block_index + 1) % blocks_per_row == 0 {
            let seconds = (block_index + 1) as f64 * BLOCK_SIZE as f64 / SAMPLE_RATE;
            let left = (accumulator[0] / accumulated_frames as f64).sqrt();
            let right = (accumulator[1] / accumulated_frames as f64).sqrt();
            println!("{seconds:7.2}s  {left:9.5}  {right:9.5}");
            accumulator = [0.0; 2];
            accumulated_frames = 0;
        }
    }
}
