//! Low-level DSP primitives used by the phaser engine.
//!
//! These components are allocation-free and realtime-safe, making them safe
//! to embed directly inside the render kernel. They intentionally stay
//! focused on the signal-processing math so the engine layer can handle
//! buffer plumbing, events, and parameter ramps.

/// Biquad coefficients, filter state, and the four transform structures.
pub mod biquad;
/// Low frequency oscillator with a quadrature tap.
pub mod lfo;
/// Bipolar/unipolar mapping helpers for modulation signals.
pub mod modulation;
/// Six-band modulated all-pass cascade with feedback.
pub mod phase_shifter;
