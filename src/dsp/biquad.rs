use std::f64::consts::PI;
use std::marker::PhantomData;

/*
Biquad Filters
==============

A biquad is a two-pole, two-zero IIR filter defined by five coefficients.
The naming follows "Designing Audio Effect Plugins in C++" by Will C.
Pirkle (2019): 'a' coefficients sit in the numerator of the H(z) transfer
function, 'b' coefficients in the denominator.

    H(z) = (a0 + a1*z^-1 + a2*z^-2) / (1 + b1*z^-1 + b2*z^-2)

Vocabulary
----------

  coefficients   The five scalars (a0, a1, a2, b1, b2). Immutable after
                 construction; a frequency change replaces them wholesale.

  state          The filter's memory: one- and two-sample-delayed input
                 and output values. Exactly one state per filter instance.

  transform      One of four structures that realize the same H(z) with
                 different state layouts: Direct, Canonical,
                 DirectTranspose, CanonicalTranspose. All are numerically
                 equivalent for the same coefficients; they differ in
                 which intermediate values live in the state.

  storage        A transform-specific read of the state. For the
  component      canonical-transposed form it is exactly `x_z1`, the value
                 the phase-shifter feedback equation needs. That is why
                 the phase shifter mandates that form.

  APF1           First-order all-pass: unity magnitude at every frequency,
                 phase shifted from 0 to -180 degrees around the corner
                 frequency. Coefficients are (alpha, 1, 0, alpha, 0) with

                     alpha = (tan(pi*f/s) - 1) / (tan(pi*f/s) + 1)

Denormals
---------

IIR state decays exponentially toward zero and eventually lands in the
subnormal float range, where arithmetic can be orders of magnitude slower.
Every transform therefore forces any output smaller in magnitude than the
smallest normalized f32 to exactly zero before it is stored or returned.

NaN and infinity are not filtered: garbage from the host propagates
unchanged.
*/

/// Filter coefficients, Pirkle naming. Generator math runs in f64 and is
/// rounded to f32 at the end.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coefficients {
    pub a0: f32,
    pub a1: f32,
    pub a2: f32,
    pub b1: f32,
    pub b2: f32,
}

impl Coefficients {
    pub fn new(a0: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> Self {
        Self { a0, a1, a2, b1, b2 }
    }

    /// 1-pole low-pass.
    pub fn lpf1(sample_rate: f64, frequency: f64) -> Self {
        let theta = 2.0 * PI * frequency / sample_rate;
        let gamma = theta.cos() / (1.0 + theta.sin());
        Self::from_f64((1.0 - gamma) / 2.0, (1.0 - gamma) / 2.0, 0.0, -gamma, 0.0)
    }

    /// 1-pole high-pass.
    pub fn hpf1(sample_rate: f64, frequency: f64) -> Self {
        let theta = 2.0 * PI * frequency / sample_rate;
        let gamma = theta.cos() / (1.0 + theta.sin());
        Self::from_f64((1.0 + gamma) / 2.0, (1.0 + gamma) / -2.0, 0.0, -gamma, 0.0)
    }

    /// 2-pole low-pass with resonance.
    pub fn lpf2(sample_rate: f64, frequency: f64, resonance: f64) -> Self {
        let theta = 2.0 * PI * frequency / sample_rate;
        let d = 1.0 / resonance;
        let beta = 0.5 * (1.0 - d / 2.0 * theta.sin()) / (1.0 + d / 2.0 * theta.sin());
        let gamma = (0.5 + beta) * theta.cos();
        let alpha = (0.5 + beta - gamma) / 2.0;
        Self::from_f64(alpha, 2.0 * alpha, alpha, -2.0 * gamma, 2.0 * beta)
    }

    /// 2-pole high-pass with resonance.
    pub fn hpf2(sample_rate: f64, frequency: f64, resonance: f64) -> Self {
        let theta = 2.0 * PI * frequency / sample_rate;
        let d = 1.0 / resonance;
        let beta = 0.5 * (1.0 - d / 2.0 * theta.sin()) / (1.0 + d / 2.0 * theta.sin());
        let gamma = (0.5 + beta) * theta.cos();
        Self::from_f64(
            (0.5 + beta + gamma) / 2.0,
            -1.0 * (0.5 + beta + gamma),
            (0.5 + beta + gamma) / 2.0,
            -2.0 * gamma,
            2.0 * beta,
        )
    }

    /// 1-pole all-pass. The phase shifter builds its cascade from these.
    pub fn apf1(sample_rate: f64, frequency: f64) -> Self {
        let tangent = (PI * frequency / sample_rate).tan();
        let alpha = (tangent - 1.0) / (tangent + 1.0);
        Self::from_f64(alpha, 1.0, 0.0, alpha, 0.0)
    }

    /// 2-pole all-pass. The tangent argument is clamped short of pi/2 so a
    /// narrow bandwidth near Nyquist cannot blow up the coefficients.
    pub fn apf2(sample_rate: f64, frequency: f64, resonance: f64) -> Self {
        let bandwidth = frequency / resonance;
        let mut arg_tan = PI * bandwidth / sample_rate;
        if arg_tan >= 0.95 * PI / 2.0 {
            arg_tan = 0.95 * PI / 2.0;
        }
        let tangent = arg_tan.tan();
        let alpha = (tangent - 1.0) / (tangent + 1.0);
        let beta = -(2.0 * PI * frequency / sample_rate).cos();
        Self::from_f64(
            -alpha,
            beta * (1.0 - alpha),
            1.0,
            beta * (1.0 - alpha),
            -alpha,
        )
    }

    fn from_f64(a0: f64, a1: f64, a2: f64, b1: f64, b2: f64) -> Self {
        Self {
            a0: a0 as f32,
            a1: a1 as f32,
            a2: a2 as f32,
            b1: b1 as f32,
            b2: b2 as f32,
        }
    }
}

/// Mutable filter state: delayed input and output values.
#[derive(Debug, Clone, Copy, Default)]
pub struct State {
    pub x_z1: f32,
    pub x_z2: f32,
    pub y_z1: f32,
    pub y_z2: f32,
}

/// If the value is too small to be a normalized f32, force it to zero.
#[inline]
pub fn flush_denormal(value: f32) -> f32 {
    if value != 0.0 && value.abs() < f32::MIN_POSITIVE {
        0.0
    } else {
        value
    }
}

/// One realization of the biquad difference equation. Implementations are
/// zero-sized; the filter picks one at compile time.
pub trait Transform {
    fn transform(input: f32, state: &mut State, coefficients: &Coefficients) -> f32;

    /// Transform-specific read of the state used by feedback topologies.
    fn storage_component(state: &State, coefficients: &Coefficients) -> f32;
}

pub mod transform {
    use super::{flush_denormal, Coefficients, State, Transform};

    /// Direct structure: remembers raw inputs and outputs.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Direct;

    impl Transform for Direct {
        #[inline]
        fn transform(input: f32, state: &mut State, coefficients: &Coefficients) -> f32 {
            let output = coefficients.a0 * input
                + coefficients.a1 * state.x_z1
                + coefficients.a2 * state.x_z2
                - coefficients.b1 * state.y_z1
                - coefficients.b2 * state.y_z2;
            let output = flush_denormal(output);
            state.x_z2 = state.x_z1;
            state.x_z1 = input;
            state.y_z2 = state.y_z1;
            state.y_z1 = output;
            output
        }

        #[inline]
        fn storage_component(state: &State, coefficients: &Coefficients) -> f32 {
            coefficients.a1 * state.x_z1 + coefficients.a2 * state.x_z2
                - coefficients.b1 * state.y_z1
                - coefficients.b2 * state.y_z2
        }
    }

    /// Canonical structure: minimum state, two delays.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Canonical;

    impl Transform for Canonical {
        #[inline]
        fn transform(input: f32, state: &mut State, coefficients: &Coefficients) -> f32 {
            let theta = input - coefficients.b1 * state.x_z1 - coefficients.b2 * state.x_z2;
            let output = coefficients.a0 * theta
                + coefficients.a1 * state.x_z1
                + coefficients.a2 * state.x_z2;
            let output = flush_denormal(output);
            state.x_z2 = state.x_z1;
            state.x_z1 = theta;
            output
        }

        #[inline]
        fn storage_component(_state: &State, _coefficients: &Coefficients) -> f32 {
            0.0
        }
    }

    /// Transposed direct structure.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct DirectTranspose;

    impl Transform for DirectTranspose {
        #[inline]
        fn transform(input: f32, state: &mut State, coefficients: &Coefficients) -> f32 {
            let theta = input + state.y_z1;
            let output = coefficients.a0 * theta + state.x_z1;
            let output = flush_denormal(output);
            state.y_z1 = state.y_z2 - coefficients.b1 * theta;
            state.y_z2 = -coefficients.b2 * theta;
            state.x_z1 = state.x_z2 + coefficients.a1 * theta;
            state.x_z2 = coefficients.a2 * theta;
            output
        }

        #[inline]
        fn storage_component(_state: &State, _coefficients: &Coefficients) -> f32 {
            0.0
        }
    }

    /// Transposed canonical structure: minimum state, and `x_z1` holds the
    /// delayed-input term the phase-shifter feedback equation reads.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct CanonicalTranspose;

    impl Transform for CanonicalTranspose {
        #[inline]
        fn transform(input: f32, state: &mut State, coefficients: &Coefficients) -> f32 {
            let output = flush_denormal(coefficients.a0 * input + state.x_z1);
            state.x_z1 = coefficients.a1 * input - coefficients.b1 * output + state.x_z2;
            state.x_z2 = coefficients.a2 * input - coefficients.b2 * output;
            output
        }

        #[inline]
        fn storage_component(state: &State, _coefficients: &Coefficients) -> f32 {
            state.x_z1
        }
    }
}

/// Generic biquad filter: a coefficient set plus one state, specialized
/// over a transform structure. Only knows how to reset its state and to
/// transform values.
#[derive(Debug, Clone, Default)]
pub struct Filter<T: Transform> {
    coefficients: Coefficients,
    state: State,
    _structure: PhantomData<T>,
}

impl<T: Transform> Filter<T> {
    pub fn new(coefficients: Coefficients) -> Self {
        Self {
            coefficients,
            state: State::default(),
            _structure: PhantomData,
        }
    }

    /// Swap in a new coefficient set. State is kept; the filter keeps
    /// running through a frequency change.
    pub fn set_coefficients(&mut self, coefficients: Coefficients) {
        self.coefficients = coefficients;
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Zero the internal state.
    pub fn reset(&mut self) {
        self.state = State::default();
    }

    /// Apply the filter to one sample.
    #[inline]
    pub fn transform(&mut self, input: f32) -> f32 {
        T::transform(input, &mut self.state, &self.coefficients)
    }

    /// The feed-forward gain `a0` (equals alpha for APF1).
    #[inline]
    pub fn gain_value(&self) -> f32 {
        self.coefficients.a0
    }

    /// Transform-specific state read used by feedback topologies.
    #[inline]
    pub fn storage_component(&self) -> f32 {
        T::storage_component(&self.state, &self.coefficients)
    }
}

pub type Direct = Filter<transform::Direct>;
pub type Canonical = Filter<transform::Canonical>;
pub type DirectTranspose = Filter<transform::DirectTranspose>;
pub type CanonicalTranspose = Filter<transform::CanonicalTranspose>;

#[cfg(test)]
mod tests {
    use super::*;

    /// |H(e^jw)| evaluated in f64 from the stored f32 coefficients.
    fn magnitude_at(coefficients: &Coefficients, normalized_freq: f64) -> f64 {
        let w = 2.0 * PI * normalized_freq;
        let (sin1, cos1) = w.sin_cos();
        let (sin2, cos2) = (2.0 * w).sin_cos();
        let num_re =
            coefficients.a0 as f64 + coefficients.a1 as f64 * cos1 + coefficients.a2 as f64 * cos2;
        let num_im = -(coefficients.a1 as f64 * sin1 + coefficients.a2 as f64 * sin2);
        let den_re = 1.0 + coefficients.b1 as f64 * cos1 + coefficients.b2 as f64 * cos2;
        let den_im = -(coefficients.b1 as f64 * sin1 + coefficients.b2 as f64 * sin2);
        (num_re * num_re + num_im * num_im).sqrt() / (den_re * den_re + den_im * den_im).sqrt()
    }

    #[test]
    fn test_apf1_coefficient_shape() {
        let c = Coefficients::apf1(44_100.0, 1_000.0);
        assert_eq!(c.a1, 1.0);
        assert_eq!(c.a2, 0.0);
        assert_eq!(c.b2, 0.0);
        assert_eq!(c.a0, c.b1, "APF1 requires a0 == b1 == alpha");
    }

    #[test]
    fn test_apf1_unity_magnitude() {
        // All-pass means |H| == 1 at every frequency, for every corner.
        for &sample_rate in &[44_100.0, 48_000.0, 96_000.0] {
            for &corner in &[16.0, 440.0, 4_800.0, 20_000.0_f64.min(sample_rate * 0.45)] {
                let c = Coefficients::apf1(sample_rate, corner);
                for &probe in &[0.001, 0.01, 0.1, 0.25, 0.45] {
                    let magnitude = magnitude_at(&c, probe);
                    assert!(
                        (magnitude - 1.0).abs() < 1e-5,
                        "APF1 magnitude {magnitude} at probe {probe} (sr {sample_rate}, corner {corner})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_apf2_unity_magnitude() {
        let c = Coefficients::apf2(48_000.0, 1_000.0, 0.707);
        for &probe in &[0.01, 0.1, 0.25, 0.4] {
            let magnitude = magnitude_at(&c, probe);
            assert!(
                (magnitude - 1.0).abs() < 1e-5,
                "APF2 magnitude {magnitude} at probe {probe}"
            );
        }
    }

    #[test]
    fn test_lpf1_dc_gain() {
        let mut filter = Direct::new(Coefficients::lpf1(48_000.0, 500.0));
        let mut output = 0.0;
        for _ in 0..8_192 {
            output = filter.transform(1.0);
        }
        assert!(
            (output - 1.0).abs() < 1e-3,
            "LPF1 should pass DC at unity gain, settled at {output}"
        );
    }

    #[test]
    fn test_hpf1_blocks_dc() {
        let mut filter = Direct::new(Coefficients::hpf1(48_000.0, 500.0));
        let mut output = 1.0;
        for _ in 0..8_192 {
            output = filter.transform(1.0);
        }
        assert!(
            output.abs() < 1e-3,
            "HPF1 should reject DC, settled at {output}"
        );
    }

    #[test]
    fn test_transforms_are_equivalent() {
        // All four structures realize the same H(z); their impulse
        // responses must agree for the same coefficients.
        let coefficients = Coefficients::lpf2(48_000.0, 1_200.0, 0.9);
        let mut direct = Direct::new(coefficients);
        let mut canonical = Canonical::new(coefficients);
        let mut direct_transpose = DirectTranspose::new(coefficients);
        let mut canonical_transpose = CanonicalTranspose::new(coefficients);

        for sample in 0..256 {
            let input = if sample == 0 { 1.0 } else { 0.0 };
            let reference = direct.transform(input);
            for (name, value) in [
                ("canonical", canonical.transform(input)),
                ("direct transpose", direct_transpose.transform(input)),
                ("canonical transpose", canonical_transpose.transform(input)),
            ] {
                assert!(
                    (value - reference).abs() < 1e-5,
                    "{name} diverged from direct at sample {sample}: {value} vs {reference}"
                );
            }
        }
    }

    #[test]
    fn test_canonical_transpose_storage_component() {
        let coefficients = Coefficients::apf1(48_000.0, 440.0);
        let mut filter = CanonicalTranspose::new(coefficients);
        let input = 0.5;
        let output = filter.transform(input);
        // After one step x_z1 = a1*x - b1*y (x_z2 was zero).
        let expected = coefficients.a1 * input - coefficients.b1 * output;
        assert!(
            (filter.storage_component() - expected).abs() < 1e-7,
            "storage component should expose the delayed-input term"
        );
    }

    #[test]
    fn test_denormal_output_flushed_to_zero() {
        let mut filter = Direct::new(Coefficients::new(1.0e-39, 0.0, 0.0, 0.0, 0.0));
        let output = filter.transform(1.0);
        assert_eq!(output, 0.0, "subnormal output must be forced to zero");
        assert_eq!(output.to_bits(), 0, "flush must produce exact +0.0");
    }

    #[test]
    fn test_reset_clears_state() {
        let mut filter = CanonicalTranspose::new(Coefficients::apf1(48_000.0, 440.0));
        filter.transform(1.0);
        assert!(filter.storage_component() != 0.0);
        filter.reset();
        assert_eq!(filter.storage_component(), 0.0);
        // A reset filter behaves like a fresh one.
        let mut fresh = CanonicalTranspose::new(Coefficients::apf1(48_000.0, 440.0));
        assert_eq!(filter.transform(0.25), fresh.transform(0.25));
    }

    #[test]
    fn test_nan_propagates() {
        let mut filter = CanonicalTranspose::new(Coefficients::apf1(48_000.0, 440.0));
        assert!(filter.transform(f32::NAN).is_nan());
    }
}
