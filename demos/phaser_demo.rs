//! Live phaser demo: a sawtooth drone through the stereo engine, with the
//! LFO rate and wet mix driven from the main thread over the lock-free
//! event channel.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use saavy_phaser::engine::{event_channel, PhaserEngine, PhaserKernel, RenderEvent};
use saavy_phaser::params::ParamAddress;
use saavy_phaser::RenderFormat;
use std::{thread, time::Duration};

const BLOCK_SIZE: usize = 256;

fn main() {
    if let Err(err) = run() {
        eprintln!("phaser demo error: {err}");
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or("no default output device available")?;
    let config = device.default_output_config()?;

    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err("phaser demo currently supports only f32 output".into());
    }

    let sample_rate = config.sample_rate().0 as f64;
    let channels = config.channels() as usize;
    let engine_channels = channels.min(2);

    let mut engine = PhaserEngine::new(PhaserKernel::new());
    engine.set_rendering_format(RenderFormat {
        sample_rate,
        channel_count: engine_channels,
        max_frames: BLOCK_SIZE,
        samples_per_filter_update: 10,
    })?;
    {
        let kernel = engine.kernel_mut();
        kernel.set_parameter_value(ParamAddress::Rate.as_raw(), 0.3);
        kernel.set_parameter_value(ParamAddress::Depth.as_raw(), 100.0);
        kernel.set_parameter_value(ParamAddress::Intensity.as_raw(), 80.0);
        kernel.set_parameter_value(ParamAddress::Dry.as_raw(), 40.0);
        kernel.set_parameter_value(ParamAddress::Wet.as_raw(), 60.0);
        kernel.set_parameter_value(ParamAddress::Odd90.as_raw(), 1.0);
    }

    let (mut producer, mut consumer) = event_channel(64);

    // Drone source state lives in the callback.
    let mut saw_phase = 0.0f32;
    let saw_increment = 98.0 / sample_rate as f32; // G2
    let mut clock: i64 = 0;
    let mut block = vec![vec![0.0f32; BLOCK_SIZE]; engine_channels];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(BLOCK_SIZE);
                let events = consumer.drain();

                engine
                    .process_and_render(
                        clock,
                        frames,
                        0,
                        Some(&mut block),
                        events,
                        |_, frame_count, _, input| {
                            for frame in 0..frame_count {
                                let sample = (saw_phase * 2.0 - 1.0) * 0.25;
                                saw_phase += saw_increment;
                                if saw_phase >= 1.0 {
                                    saw_phase -= 1.0;
                                }
                                for channel in input.iter_mut() {
                                    channel[frame] = sample;
                                }
                            }
                            Ok(())
                        },
                    )
                    .expect("demo pull cannot fail");

                let base = frames_written * channels;
                for frame in 0..frames {
                    for channel in 0..channels {
                        data[base + frame * channels + channel] =
                            block[channel.min(engine_channels - 1)][frame];
                    }
                }

                clock += frames as i64;
                frames_written += frames;
            }
        },
        move |err| eprintln!("stream error: {err}"),
        None,
    )?;

    stream.play()?;
    println!("Phasing a sawtooth drone. Sweeping rate and wet mix; Ctrl+C to stop.");

    // Slowly wander the knobs from the control thread. Stale timestamps
    // are fine: the processor applies them at the next block start.
    let mut step = 0u32;
    loop {
        let rate = 0.1 + 0.9 * ((step % 20) as f32 / 20.0);
        let wet = 30.0 + 40.0 * (((step / 20) % 2) as f32);
        let _ = producer.push(RenderEvent::parameter(0, ParamAddress::Rate, rate));
        let _ = producer.push(RenderEvent::parameter(0, ParamAddress::Wet, wet));
        step += 1;
        thread::sleep(Duration::from_millis(500));
    }
}
