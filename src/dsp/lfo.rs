#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Low Frequency Oscillator
========================

The LFO sweeps the phase-shifter bands. It is a plain phase accumulator:

    phase     Normalized position in the cycle, 0.0 to 1.0.
    increment How far phase advances per sample:

                  increment = frequency / sample_rate

              At 1 Hz and 44.1 kHz: 1/44100 per sample, so after exactly
              44100 samples the phase is back where it started.

Phase wraps by subtracting 1.0 when it reaches 1.0, never by resetting to
zero, so no fraction of a cycle is ever lost.

Reading and advancing are separate operations. `value()` looks at the
waveform without moving; `increment()` moves. The render loop needs this
split because all channels of one frame must see the same phase.

Quadrature
----------

`quad_phase_value()` reads the waveform a quarter cycle ahead:

    quad = waveform((phase + 0.25) mod 1)

With the stereo `odd90` switch on, odd channels take the quadrature tap
and the phaser notches sweep 90 degrees apart between left and right.

Waveforms
---------

All shapes are bipolar, -1.0 to +1.0 over one cycle:

    TRIANGLE  4x - 1        for x < 0.5      (-1 up to +1)
              3 - 4x        otherwise        (+1 back down to -1)

    SINE      sin(tau * x)

    SAWTOOTH  2x - 1        (rises, snaps back at the wrap)

Triangle is the classic phaser sweep: constant rate of change in both
directions, no stationary point at the extremes.
*/

/// The shape of the modulation cycle.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

/// Snapshot of the oscillator position, restorable with
/// [`Lfo::restore_state`].
#[derive(Debug, Clone, Copy)]
pub struct LfoState {
    phase: f64,
}

/// Triangle/sine/sawtooth oscillator with a quadrature tap.
///
/// Phase and increment are kept in f64 so that long renders stay
/// phase-accurate; samples come out as f32.
#[derive(Debug, Clone)]
pub struct Lfo {
    sample_rate: f64,
    frequency: f64,
    waveform: Waveform,
    phase: f64,
    increment: f64,
}

impl Lfo {
    pub fn new(sample_rate: f64) -> Self {
        let mut lfo = Self {
            sample_rate,
            frequency: 1.0,
            waveform: Waveform::Triangle,
            phase: 0.0,
            increment: 0.0,
        };
        lfo.update_increment();
        lfo
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
        self.update_increment();
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Rewind to the start of the cycle.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Current waveform sample in [-1, 1]. Does not advance the phase.
    #[inline]
    pub fn value(&self) -> f32 {
        wave_at(self.waveform, self.phase)
    }

    /// Waveform sample a quarter cycle ahead of the current phase.
    #[inline]
    pub fn quad_phase_value(&self) -> f32 {
        wave_at(self.waveform, (self.phase + 0.25).rem_euclid(1.0))
    }

    /// Advance one sample and wrap back into [0, 1).
    #[inline]
    pub fn increment(&mut self) {
        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
    }

    /// Read the current sample and advance in one call.
    #[inline]
    pub fn value_and_increment(&mut self) -> f32 {
        let value = self.value();
        self.increment();
        value
    }

    /// Capture the oscillator position so a caller that walks channels in
    /// an outer loop can rewind between channels.
    pub fn save_state(&self) -> LfoState {
        LfoState { phase: self.phase }
    }

    pub fn restore_state(&mut self, state: LfoState) {
        self.phase = state.phase;
    }

    fn update_increment(&mut self) {
        self.increment = self.frequency / self.sample_rate;
    }
}

#[inline]
fn wave_at(waveform: Waveform, phase: f64) -> f32 {
    match waveform {
        Waveform::Sine => (std::f64::consts::TAU * phase).sin() as f32,
        Waveform::Triangle => {
            if phase < 0.5 {
                (4.0 * phase - 1.0) as f32
            } else {
                (3.0 - 4.0 * phase) as f32
            }
        }
        Waveform::Sawtooth => (2.0 * phase - 1.0) as f32,
    }
}
