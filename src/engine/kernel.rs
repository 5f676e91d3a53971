use std::sync::Arc;

use super::processor::RenderKernel;
use crate::dsp::lfo::{Lfo, Waveform};
use crate::dsp::phase_shifter::{PhaseShifter, IDEAL};
use crate::params::{
    ParamAddress, ParamHandle, RampedValue, SharedParams, DEFAULTS, DEFAULT_RAMP_FRAMES,
};
use crate::RenderFormat;

/*
Phaser Kernel
=============

One LFO, six parameters, and one phase shifter per output channel. Stereo
is nothing more than independent per-channel shifters driven from the same
LFO; with `odd90` set, odd channels take the quadrature tap instead.

The render loop walks frames in the outer loop and channels in the inner
loop. That order matters twice over:

  - the LFO ticks exactly once per frame and every channel of that frame
    sees the same modulation, with no state save/restore dance;
  - parameter ramps advance once per frame, so a host ramp is
    sample-accurate across all channels at once.

Per frame:

    depth, intensity   <- ramp step
    even = lfo.value(); odd = odd90 ? lfo.quad_phase_value() : even
    lfo.increment()
    dry, wet           <- ramp step
    for each channel:
        m        = (channel odd ? odd : even) * depth
        filtered = shifter[channel].process(m, x)
        out      = wet * filtered + dry * x

Parameter traffic arrives three ways, all meeting in the ramps here:
timestamped render events (dispatched by the processor mid-block), direct
immediate sets on the render thread, and control-thread pending values
claimed at block starts (which glide over DEFAULT_RAMP_FRAMES). Rate and
odd90 switch instantly - the rate feeds the LFO, and neither benefits
from interpolation.
*/

/// The audio processing kernel that gives samples the phased effect.
#[derive(Debug)]
pub struct PhaserKernel {
    lfo: Lfo,
    rate: RampedValue,
    depth: RampedValue,
    intensity: RampedValue,
    dry: RampedValue,
    wet: RampedValue,
    odd90: bool,
    phase_shifters: Vec<PhaseShifter>,
    shared: Arc<SharedParams>,
    sample_rate: f64,
    samples_per_filter_update: u32,
}

impl PhaserKernel {
    pub fn new() -> Self {
        let mut lfo = Lfo::new(RenderFormat::default().sample_rate);
        lfo.set_waveform(Waveform::Triangle);
        lfo.set_frequency(DEFAULTS[ParamAddress::Rate.as_raw() as usize] as f64);
        Self {
            lfo,
            rate: RampedValue::new(DEFAULTS[0]),
            depth: RampedValue::new(DEFAULTS[1]),
            intensity: RampedValue::new(DEFAULTS[2]),
            dry: RampedValue::new(DEFAULTS[3]),
            wet: RampedValue::new(DEFAULTS[4]),
            odd90: DEFAULTS[5] > 0.5,
            phase_shifters: Vec::new(),
            shared: Arc::new(SharedParams::with_defaults()),
            sample_rate: RenderFormat::default().sample_rate,
            samples_per_filter_update: RenderFormat::default().samples_per_filter_update,
        }
    }

    /// Control-thread handle to the pending parameter cells.
    pub fn handle(&self) -> ParamHandle {
        ParamHandle::new(Arc::clone(&self.shared))
    }

    /// Immediate parameter change (render thread), host units. Unknown
    /// addresses are silently ignored.
    pub fn set_parameter_value(&mut self, address: u64, value: f32) {
        let Some(address) = ParamAddress::from_raw(address) else {
            return;
        };
        match address {
            ParamAddress::Rate => {
                self.rate.set(value);
                self.lfo.set_frequency(value as f64);
            }
            ParamAddress::Depth => self.depth.set(address.to_internal(value)),
            ParamAddress::Intensity => self.intensity.set(address.to_internal(value)),
            ParamAddress::Dry => self.dry.set(address.to_internal(value)),
            ParamAddress::Wet => self.wet.set(address.to_internal(value)),
            ParamAddress::Odd90 => self.odd90 = value > 0.5,
            ParamAddress::Bypass => {} // processor concern
        }
    }

    /// Ramped parameter change (render thread), host units.
    pub fn set_ramped_parameter_value(&mut self, address: u64, value: f32, duration: u32) {
        let Some(address) = ParamAddress::from_raw(address) else {
            return;
        };
        match address {
            ParamAddress::Depth => self.depth.begin(address.to_internal(value), duration),
            ParamAddress::Intensity => self.intensity.begin(address.to_internal(value), duration),
            ParamAddress::Dry => self.dry.begin(address.to_internal(value), duration),
            ParamAddress::Wet => self.wet.begin(address.to_internal(value), duration),
            // Switches and the LFO rate do not glide.
            _ => self.set_parameter_value(address.as_raw(), value),
        }
    }

    /// Current immediate value, host units. Unknown addresses read 0.
    pub fn get_parameter_value(&self, address: u64) -> f32 {
        let Some(address) = ParamAddress::from_raw(address) else {
            return 0.0;
        };
        match address {
            ParamAddress::Rate => self.rate.value(),
            ParamAddress::Depth => address.to_external(self.depth.value()),
            ParamAddress::Intensity => address.to_external(self.intensity.value()),
            ParamAddress::Dry => address.to_external(self.dry.value()),
            ParamAddress::Wet => address.to_external(self.wet.value()),
            ParamAddress::Odd90 => {
                if self.odd90 {
                    1.0
                } else {
                    0.0
                }
            }
            ParamAddress::Bypass => 0.0,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.phase_shifters.len()
    }

    fn halt_ramps(&mut self) {
        self.rate.halt();
        self.depth.halt();
        self.intensity.halt();
        self.dry.halt();
        self.wet.halt();
    }
}

impl Default for PhaserKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderKernel for PhaserKernel {
    fn do_format_change(&mut self, format: &RenderFormat) {
        self.sample_rate = format.sample_rate;
        self.samples_per_filter_update = format.samples_per_filter_update;
        self.lfo.set_sample_rate(format.sample_rate);

        // Fresh shifters: filter state from the previous channel layout
        // must not leak into the new one.
        self.phase_shifters.clear();
        for _ in 0..format.channel_count {
            self.phase_shifters.push(PhaseShifter::new(
                &IDEAL,
                format.sample_rate,
                self.intensity.value(),
                format.samples_per_filter_update,
            ));
        }
    }

    fn do_block_start(&mut self) {
        // Claim control-thread values. Depth/intensity/dry/wet glide so a
        // knob grab does not click; rate and odd90 switch instantly.
        if let Some(value) = self.shared.take_changed(ParamAddress::Rate) {
            self.rate.set(value);
            self.lfo.set_frequency(value as f64);
        }
        if let Some(value) = self.shared.take_changed(ParamAddress::Depth) {
            self.depth.begin(value, DEFAULT_RAMP_FRAMES);
        }
        if let Some(value) = self.shared.take_changed(ParamAddress::Intensity) {
            self.intensity.begin(value, DEFAULT_RAMP_FRAMES);
        }
        if let Some(value) = self.shared.take_changed(ParamAddress::Dry) {
            self.dry.begin(value, DEFAULT_RAMP_FRAMES);
        }
        if let Some(value) = self.shared.take_changed(ParamAddress::Wet) {
            self.wet.begin(value, DEFAULT_RAMP_FRAMES);
        }
        if let Some(value) = self.shared.take_changed(ParamAddress::Odd90) {
            self.odd90 = value > 0.5;
        }
    }

    fn do_rendering(&mut self, io: &mut [Vec<f32>], offset: usize, frames: usize) {
        let channels = self.phase_shifters.len().min(io.len());

        // Frames outer, channels inner: the LFO ticks once per frame and
        // every channel sees the same modulation.
        for frame in 0..frames {
            let depth = self.depth.frame_value();
            let intensity = self.intensity.frame_value();

            let even_mod = self.lfo.value();
            let odd_mod = if self.odd90 {
                self.lfo.quad_phase_value()
            } else {
                even_mod
            };

            self.lfo.increment();

            let dry = self.dry.frame_value();
            let wet = self.wet.frame_value();

            for (channel, shifter) in self.phase_shifters[..channels].iter_mut().enumerate() {
                let buffer = &mut io[channel];
                let input_sample = buffer[offset + frame];
                shifter.set_intensity(intensity);
                let modulation = if channel & 1 == 1 { odd_mod } else { even_mod } * depth;
                let filtered = shifter.process(modulation, input_sample);
                buffer[offset + frame] = dry * input_sample + wet * filtered;
            }
        }
    }

    fn do_parameter_event(&mut self, address: u64, value: f32, ramp_frames: u32) {
        if ramp_frames == 0 {
            self.set_parameter_value(address, value);
        } else {
            self.set_ramped_parameter_value(address, value, ramp_frames);
        }
    }

    fn do_midi_event(&mut self, _bytes: &[u8]) {}

    fn do_rendering_state_changed(&mut self, rendering: bool) {
        if !rendering {
            // Ramps must not survive a stop: the next start begins from
            // settled values.
            self.halt_ramps();
        }
    }
}
