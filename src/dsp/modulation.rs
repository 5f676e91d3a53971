//! Bipolar/unipolar mapping helpers for modulation signals.

/*
Modulation Ranges
=================

Control signals in this crate are bipolar: -1.0 to +1.0, centered on zero.
Frequencies are not. The bridge between the two is a linear map from the
bipolar range onto a frequency band:

    bipolar   fraction of band   mapped frequency
    -1.0      0.0                min
     0.0      0.5                midpoint
    +1.0      1.0                max

The phase shifter uses this per band: an LFO value of zero parks every
all-pass filter at its band midpoint, which is also how the filters are
initialized before the first modulation value arrives.

Conversions:

    unipolar = (bipolar + 1.0) / 2.0
    bipolar  = unipolar * 2.0 - 1.0
*/

/// Map a bipolar modulation value in [-1, 1] onto [min, max].
#[inline]
pub fn bipolar_modulation(modulation: f32, min: f32, max: f32) -> f32 {
    min + (modulation + 1.0) / 2.0 * (max - min)
}

/// Convert a bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Convert a unipolar signal (0.0 to 1.0) to bipolar (-1.0 to +1.0).
#[inline]
pub fn unipolar_to_bipolar(unipolar: f32) -> f32 {
    (unipolar * 2.0) - 1.0
}
