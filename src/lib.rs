//! Realtime stereo phaser engine.
//!
//! The crate is split the same way the audio path is: `dsp` holds the
//! per-sample primitives (biquad all-pass filters, the LFO, the six-band
//! phase shifter), `params` holds the dual-thread parameter model (atomic
//! pending values plus render-owned linear ramps), and `engine` ties them
//! together with an event-interleaved block processor that applies
//! parameter changes on the exact frame they are timestamped for.
//!
//! Everything reachable from `EventProcessor::process_and_render` is
//! allocation-free and lock-free; buffers are sized once in
//! `EventProcessor::set_rendering_format`, which runs off the render
//! thread.

use thiserror::Error;

pub mod dsp;
pub mod engine;
pub mod params;

/// Default block capacity used when the host does not specify one.
pub const DEFAULT_MAX_FRAMES: usize = 512;

/// Rendering format negotiated with the host before processing starts.
///
/// `samples_per_filter_update` is the coefficient recomputation period of
/// the phase shifter: 1 recomputes every sample, 10-20 is the usual
/// CPU/fidelity tradeoff.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFormat {
    pub sample_rate: f64,
    pub channel_count: usize,
    pub max_frames: usize,
    pub samples_per_filter_update: u32,
}

impl Default for RenderFormat {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            channel_count: 2,
            max_frames: DEFAULT_MAX_FRAMES,
            samples_per_filter_update: 10,
        }
    }
}

/// Rejection reasons for [`RenderFormat::validate`]. These are host
/// configuration mistakes and are reported before rendering is entered;
/// nothing on the render path can raise them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("channel count must be at least 1")]
    NoChannels,
    #[error("sample rate must be positive")]
    BadSampleRate,
    #[error("max frames must be at least 1")]
    ZeroMaxFrames,
    #[error("samples per filter update must be at least 1")]
    ZeroFilterUpdate,
}

impl RenderFormat {
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.channel_count == 0 {
            return Err(FormatError::NoChannels);
        }
        if !(self.sample_rate > 0.0) {
            return Err(FormatError::BadSampleRate);
        }
        if self.max_frames == 0 {
            return Err(FormatError::ZeroMaxFrames);
        }
        if self.samples_per_filter_update == 0 {
            return Err(FormatError::ZeroFilterUpdate);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_is_valid() {
        assert!(RenderFormat::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_channels() {
        let format = RenderFormat {
            channel_count: 0,
            ..RenderFormat::default()
        };
        assert_eq!(format.validate(), Err(FormatError::NoChannels));
    }

    #[test]
    fn test_rejects_bad_sample_rate() {
        for rate in [0.0, -44_100.0, f64::NAN] {
            let format = RenderFormat {
                sample_rate: rate,
                ..RenderFormat::default()
            };
            assert_eq!(
                format.validate(),
                Err(FormatError::BadSampleRate),
                "sample rate {rate} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_zero_max_frames() {
        let format = RenderFormat {
            max_frames: 0,
            ..RenderFormat::default()
        };
        assert_eq!(format.validate(), Err(FormatError::ZeroMaxFrames));
    }
}
