use crate::dsp::biquad::{CanonicalTranspose, Coefficients};
use crate::dsp::modulation::bipolar_modulation;

/*
Phase Shifter
=============

Six first-order all-pass filters in series, with one global feedback path
closed around the whole cascade:

            +--------------------- intensity * weighted state sum
            |
            v
    x ---> (+) --> 1/(1 + K*gamma6) --> APF0 -> APF1 -> ... -> APF5 ---> y

Each all-pass leaves magnitude untouched and rotates phase around its
corner frequency. Where the rotated copy lands out of phase with the dry
signal, mixing produces notches; sweeping the corners with the LFO moves
the notches and makes the characteristic "whoosh".

The feedback cannot simply read the cascade output (that sample does not
exist yet). Instead each filter's transposed-canonical state exposes its
delayed-input term (the storage component), and the closed-loop input is
solved algebraically:

    gamma[0] = 1
    gamma[k] = gain(filters[6-k]) * gamma[k-1]          k = 1..6
    sum      = sum over i of gamma[5-i] * storage(filters[i])
    y0       = (x + K * sum) / (1 + K * gamma[6])

with K the intensity in [0, 1]. This is the Pirkle phaser topology; gain()
is the a0 coefficient, which for APF1 equals alpha.

Band tables
-----------

Each filter sweeps its own frequency band. Two classic six-band tables are
provided: "ideal", and the National Semiconductor application-note values.
Only the ideal table is used by the engine; both are process-wide
constants.

Coefficient update rate
-----------------------

Recomputing six tan() calls per sample is the textbook behavior
(samples_per_update == 1) but rarely audible. The shifter recomputes
every `samples_per_update` samples (10-20 typical) and reuses the
coefficients in between. At construction the coefficients are computed
with modulation 0, parking each filter at its band midpoint.
*/

/// One filter's sweep range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min_hz: f32,
    pub max_hz: f32,
}

/// Number of all-pass stages in the cascade.
pub const NUM_BANDS: usize = 6;

/// Evenly spread sweep ranges covering the audible spectrum.
pub static IDEAL: [Band; NUM_BANDS] = [
    Band { min_hz: 16.0, max_hz: 1_600.0 },
    Band { min_hz: 33.0, max_hz: 3_300.0 },
    Band { min_hz: 48.0, max_hz: 4_800.0 },
    Band { min_hz: 98.0, max_hz: 9_800.0 },
    Band { min_hz: 160.0, max_hz: 16_000.0 },
    Band { min_hz: 260.0, max_hz: 20_480.0 },
];

/// Sweep ranges from the National Semiconductor phaser application note.
pub static NATIONAL_SEMICONDUCTOR: [Band; NUM_BANDS] = [
    Band { min_hz: 32.0, max_hz: 1_500.0 },
    Band { min_hz: 68.0, max_hz: 3_400.0 },
    Band { min_hz: 96.0, max_hz: 4_800.0 },
    Band { min_hz: 212.0, max_hz: 10_000.0 },
    Band { min_hz: 320.0, max_hz: 16_000.0 },
    Band { min_hz: 636.0, max_hz: 20_480.0 },
];

type AllPassFilter = CanonicalTranspose;

/// Six-band all-pass cascade with feedback. One instance per channel.
#[derive(Debug, Clone)]
pub struct PhaseShifter {
    bands: &'static [Band; NUM_BANDS],
    sample_rate: f64,
    intensity: f32,
    samples_per_update: u32,
    sample_counter: u32,
    filters: [AllPassFilter; NUM_BANDS],
    gammas: [f32; NUM_BANDS + 1],
}

impl PhaseShifter {
    pub fn new(
        bands: &'static [Band; NUM_BANDS],
        sample_rate: f64,
        intensity: f32,
        samples_per_update: u32,
    ) -> Self {
        let mut shifter = Self {
            bands,
            sample_rate,
            intensity,
            samples_per_update: samples_per_update.max(1),
            sample_counter: 0,
            filters: Default::default(),
            gammas: [1.0; NUM_BANDS + 1],
        };
        shifter.update_coefficients(0.0);
        shifter
    }

    /// Feedback amount in [0, 1]. Takes effect on the next sample.
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    /// Zero all filter state and restart the coefficient update counter.
    pub fn reset(&mut self) {
        self.sample_counter = 0;
        for filter in &mut self.filters {
            filter.reset();
        }
    }

    /// Process one sample. `modulation` is the LFO value scaled by depth,
    /// in [-1, 1]; zero holds every filter at its band midpoint.
    pub fn process(&mut self, modulation: f32, input: f32) -> f32 {
        if self.sample_counter >= self.samples_per_update {
            self.update_coefficients(modulation);
            self.sample_counter = 1;
        } else {
            self.sample_counter += 1;
        }

        // Cumulative gain products from the tail of the cascade.
        for index in 1..=NUM_BANDS {
            self.gammas[index] =
                self.filters[NUM_BANDS - index].gain_value() * self.gammas[index - 1];
        }

        // Weighted sum of the per-filter storage components.
        let mut weighted_sum = 0.0;
        for index in 0..NUM_BANDS {
            weighted_sum +=
                self.gammas[NUM_BANDS - index - 1] * self.filters[index].storage_component();
        }

        // Solve the closed loop, then run the cascade in series.
        let mut output = (input + self.intensity * weighted_sum)
            / (1.0 + self.intensity * self.gammas[NUM_BANDS]);
        for filter in &mut self.filters {
            output = filter.transform(output);
        }

        output
    }

    fn update_coefficients(&mut self, modulation: f32) {
        for (filter, band) in self.filters.iter_mut().zip(self.bands.iter()) {
            let frequency = bipolar_modulation(modulation, band.min_hz, band.max_hz);
            filter.set_coefficients(Coefficients::apf1(self.sample_rate, frequency as f64));
        }
    }
}
