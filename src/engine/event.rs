use crate::params::ParamAddress;

/// What a render event carries. The set is closed: parameter changes
/// (instant or ramped) and raw MIDI for the kernel's hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventBody {
    Parameter {
        address: u64,
        value: f32,
    },
    ParameterRamp {
        address: u64,
        value: f32,
        ramp_frames: u32,
    },
    Midi {
        bytes: [u8; 3],
        len: u8,
    },
}

/// A timestamped event. `sample_time` is absolute (same clock as the
/// block timestamp); the host hands the processor a slice sorted by it,
/// and events sharing a sample time are applied in slice order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderEvent {
    pub sample_time: i64,
    pub body: EventBody,
}

impl RenderEvent {
    /// Instant parameter change in host units.
    pub fn parameter(sample_time: i64, address: ParamAddress, value: f32) -> Self {
        Self {
            sample_time,
            body: EventBody::Parameter {
                address: address.as_raw(),
                value,
            },
        }
    }

    /// Parameter change gliding over `ramp_frames` frames.
    pub fn parameter_ramp(
        sample_time: i64,
        address: ParamAddress,
        value: f32,
        ramp_frames: u32,
    ) -> Self {
        Self {
            sample_time,
            body: EventBody::ParameterRamp {
                address: address.as_raw(),
                value,
                ramp_frames,
            },
        }
    }

    /// Parameter change by raw host address (may be unknown; the engine
    /// ignores addresses it does not recognize).
    pub fn parameter_raw(sample_time: i64, address: u64, value: f32) -> Self {
        Self {
            sample_time,
            body: EventBody::Parameter { address, value },
        }
    }

    /// Short MIDI message; anything past three bytes is dropped.
    pub fn midi(sample_time: i64, data: &[u8]) -> Self {
        let mut bytes = [0u8; 3];
        let len = data.len().min(3);
        bytes[..len].copy_from_slice(&data[..len]);
        Self {
            sample_time,
            body: EventBody::Midi {
                bytes,
                len: len as u8,
            },
        }
    }
}
