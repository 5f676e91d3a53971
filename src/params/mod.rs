//! The dual-thread parameter model.
//!
//! Every knob has two homes. The *pending* value lives in an atomic cell
//! ([`shared::SharedParams`]) that the control thread writes without ever
//! blocking the render thread. The *immediate* value lives in a
//! render-owned [`ramp::RampedValue`] that glides linearly toward new
//! targets so discontinuous host automation does not click.
//!
//! Pending values are claimed by the render thread at block boundaries
//! only; mid-block changes are possible solely through timestamped render
//! events.

/// Render-owned value with a linear per-frame ramp.
pub mod ramp;
/// Atomic pending-value cells shared with the control thread.
pub mod shared;

pub use ramp::RampedValue;
pub use shared::{ParamHandle, SharedParams};

/// Stable parameter identifiers exposed to the host.
///
/// `Bypass` is routed to the block processor rather than the kernel: it
/// has no ramp and no pending cell, and is normally driven through a
/// timestamped event so engaging it is sample-accurate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum ParamAddress {
    Rate = 0,
    Depth = 1,
    Intensity = 2,
    Dry = 3,
    Wet = 4,
    Odd90 = 5,
    Bypass = 6,
}

/// Number of kernel-owned (ramped/pending) parameters: everything except
/// `Bypass`.
pub const KERNEL_PARAM_COUNT: usize = 6;

/// Ramp length applied when a pending value is picked up at a block
/// boundary and the host supplied no explicit duration.
pub const DEFAULT_RAMP_FRAMES: u32 = 50;

/// Engine defaults in internal units, indexed by address.
pub(crate) const DEFAULTS: [f32; KERNEL_PARAM_COUNT] = [
    1.0,  // rate, Hz
    1.0,  // depth
    0.75, // intensity
    0.5,  // dry
    0.5,  // wet
    0.0,  // odd90 off
];

impl ParamAddress {
    /// Decode a raw host address. Unknown addresses are never sent by a
    /// well-formed host; callers ignore `None`.
    pub fn from_raw(raw: u64) -> Option<Self> {
        match raw {
            0 => Some(Self::Rate),
            1 => Some(Self::Depth),
            2 => Some(Self::Intensity),
            3 => Some(Self::Dry),
            4 => Some(Self::Wet),
            5 => Some(Self::Odd90),
            6 => Some(Self::Bypass),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u64 {
        self as u64
    }

    /// Percentage-valued parameters are exposed in [0, 100] and stored
    /// normalized in [0, 1].
    pub fn is_percentage(self) -> bool {
        matches!(self, Self::Depth | Self::Intensity | Self::Dry | Self::Wet)
    }

    /// Host units to internal units.
    pub fn to_internal(self, external: f32) -> f32 {
        if self.is_percentage() {
            external / 100.0
        } else {
            external
        }
    }

    /// Internal units to host units.
    pub fn to_external(self, internal: f32) -> f32 {
        if self.is_percentage() {
            internal * 100.0
        } else {
            internal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_roundtrip() {
        for address in [
            ParamAddress::Rate,
            ParamAddress::Depth,
            ParamAddress::Intensity,
            ParamAddress::Dry,
            ParamAddress::Wet,
            ParamAddress::Odd90,
            ParamAddress::Bypass,
        ] {
            assert_eq!(ParamAddress::from_raw(address.as_raw()), Some(address));
        }
    }

    #[test]
    fn test_unknown_raw_address() {
        assert_eq!(ParamAddress::from_raw(7), None);
        assert_eq!(ParamAddress::from_raw(u64::MAX), None);
    }

    #[test]
    fn test_percentage_conversion() {
        assert_eq!(ParamAddress::Depth.to_internal(100.0), 1.0);
        assert_eq!(ParamAddress::Wet.to_internal(25.0), 0.25);
        assert_eq!(ParamAddress::Intensity.to_external(0.75), 75.0);
        // Rate passes through unscaled.
        assert_eq!(ParamAddress::Rate.to_internal(4.5), 4.5);
        assert_eq!(ParamAddress::Rate.to_external(4.5), 4.5);
    }
}
