pub mod biquad;
pub mod lfo;
pub mod phase_shifter;

pub use biquad::bench_biquad;
pub use lfo::bench_lfo;
pub use phase_shifter::bench_phase_shifter;
