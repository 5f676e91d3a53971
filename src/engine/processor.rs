use log::debug;
use thiserror::Error;

use super::event::{EventBody, RenderEvent};
use crate::params::ParamAddress;
use crate::{FormatError, RenderFormat};

/*
Event-Interleaved Block Rendering
=================================

The host asks for N frames at a time and hands over a list of events
timestamped in sample time. A parameter change at sample T must be audible
at frame T - not at the block boundary before it, not one frame late. The
processor gets this right by splitting the block at event times:

    render up to the next event's timestamp
    apply every event that is now due, in order
    repeat until the block is exhausted

Buffer plumbing
---------------

Input is pulled from upstream into a processor-owned buffer sized at
format time, so the render loop never touches host input memory. Output
goes one of two ways:

    out-of-place   the pulled input is copied into the host's output
                   buffers, then the kernel processes those buffers as
                   combined input/output (it reads each frame before
                   overwriting it)

    in-place       the kernel processes the pulled-input buffer itself;
                   the host reads the result back with `rendered()`

Both paths run the identical kernel loop on identical samples, so they
produce identical output.

Bypass fits the same scheme: a bypassed segment is simply left as the
copied input (out-of-place) or untouched (in-place). Because bypass can be
flipped by a timestamped event, engaging it is sample-accurate too.
*/

/// Capability set the processor needs from a kernel. Implementations are
/// called directly through the monomorphized generic - no vtable.
pub trait RenderKernel {
    /// Adopt a new rendering format. Runs off the render thread; may
    /// allocate.
    fn do_format_change(&mut self, format: &RenderFormat);

    /// Called once at the top of every render block, before any events or
    /// frames. This is where pending control-thread values are claimed.
    fn do_block_start(&mut self);

    /// Process `frames` frames starting at `offset`. Each channel buffer
    /// holds input samples on entry and must hold output samples on exit;
    /// read the frame before overwriting it.
    fn do_rendering(&mut self, io: &mut [Vec<f32>], offset: usize, frames: usize);

    /// A parameter event from the render event list. `ramp_frames` of
    /// zero means jump.
    fn do_parameter_event(&mut self, address: u64, value: f32, ramp_frames: u32);

    /// MIDI pass-through hook.
    fn do_midi_event(&mut self, bytes: &[u8]);

    /// The host started (`true`) or stopped (`false`) rendering.
    fn do_rendering_state_changed(&mut self, rendering: bool);
}

/// Upstream input-pull failure. The engine returns the host status
/// unmodified and produces no output.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("input pull failed with host status {0}")]
pub struct PullError(pub i32);

/// Block processor: pulls input, interleaves events with rendering, and
/// handles bypass and in-place buffer plumbing.
#[derive(Debug)]
pub struct EventProcessor<K: RenderKernel> {
    kernel: K,
    format: RenderFormat,
    input: Vec<Vec<f32>>,
    bypassed: bool,
    configured: bool,
}

impl<K: RenderKernel> EventProcessor<K> {
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            format: RenderFormat::default(),
            input: Vec::new(),
            bypassed: false,
            configured: false,
        }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn kernel_mut(&mut self) -> &mut K {
        &mut self.kernel
    }

    pub fn format(&self) -> &RenderFormat {
        &self.format
    }

    /// Adopt a new rendering format and size every render-path buffer.
    /// Must be called before the first render and runs off the render
    /// thread.
    pub fn set_rendering_format(&mut self, format: RenderFormat) -> Result<(), FormatError> {
        format.validate()?;
        debug!(
            "rendering format: {} channel(s) at {} Hz, up to {} frames, filter update every {} samples",
            format.channel_count,
            format.sample_rate,
            format.max_frames,
            format.samples_per_filter_update
        );
        self.input = vec![vec![0.0; format.max_frames]; format.channel_count];
        self.format = format;
        self.kernel.do_format_change(&format);
        self.configured = true;
        Ok(())
    }

    /// Copy input to output instead of processing.
    pub fn set_bypass(&mut self, bypass: bool) {
        self.bypassed = bypass;
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Immediate parameter change on the render thread, host units.
    /// `Bypass` is handled here; everything else goes to the kernel.
    /// `ramp_frames` of zero jumps.
    pub fn set_parameter_value(&mut self, address: u64, value: f32, ramp_frames: u32) {
        if address == ParamAddress::Bypass.as_raw() {
            self.bypassed = value > 0.5;
        } else {
            self.kernel.do_parameter_event(address, value, ramp_frames);
        }
    }

    /// Forwarded host start/stop notification.
    pub fn rendering_state_changed(&mut self, rendering: bool) {
        self.kernel.do_rendering_state_changed(rendering);
    }

    /// After an in-place render, the processed samples live here.
    pub fn rendered(&self) -> &[Vec<f32>] {
        &self.input
    }

    /// Process events and render one block.
    ///
    /// `timestamp` is the sample time of the first frame. `events` must be
    /// sorted by `sample_time`; ties are applied in slice order. `output`
    /// of `None` renders in place (see [`rendered`](Self::rendered)).
    /// `pull_input` fills the processor-owned per-channel input buffers
    /// with `frame_count` frames from `input_bus`; its error is returned
    /// unmodified and no output is produced.
    pub fn process_and_render<P>(
        &mut self,
        timestamp: i64,
        frame_count: usize,
        input_bus: usize,
        output: Option<&mut [Vec<f32>]>,
        events: &[RenderEvent],
        pull_input: P,
    ) -> Result<(), PullError>
    where
        P: FnOnce(i64, usize, usize, &mut [Vec<f32>]) -> Result<(), PullError>,
    {
        debug_assert!(self.configured, "set_rendering_format must run first");
        debug_assert!(
            frame_count <= self.format.max_frames,
            "block of {frame_count} frames exceeds negotiated max {}",
            self.format.max_frames
        );

        pull_input(timestamp, frame_count, input_bus, &mut self.input)?;

        self.kernel.do_block_start();

        let Self {
            kernel,
            input,
            bypassed,
            ..
        } = self;

        match output {
            Some(host_output) => {
                // Seed the host buffers with the input so the kernel can
                // treat them as combined input/output, and so bypassed
                // segments are already correct.
                for (out, pulled) in host_output.iter_mut().zip(input.iter()) {
                    out[..frame_count].copy_from_slice(&pulled[..frame_count]);
                }
                Self::render(kernel, host_output, timestamp, frame_count, events, bypassed);
            }
            None => {
                Self::render(kernel, input, timestamp, frame_count, events, bypassed);
            }
        }

        Ok(())
    }

    /// Walk the block, splitting at event timestamps.
    fn render(
        kernel: &mut K,
        io: &mut [Vec<f32>],
        timestamp: i64,
        frame_count: usize,
        events: &[RenderEvent],
        bypassed: &mut bool,
    ) {
        let mut now = timestamp;
        let mut frames_remaining = frame_count;
        let mut next_event = 0;

        while frames_remaining > 0 {
            // No more events to interleave: finish the block in one go.
            if next_event >= events.len() {
                if !*bypassed {
                    kernel.do_rendering(io, frame_count - frames_remaining, frames_remaining);
                }
                return;
            }

            // Render up to the next event time (events already due give a
            // zero-length segment and are applied immediately).
            let delta = (events[next_event].sample_time - now).max(0) as usize;
            let segment = delta.min(frames_remaining);
            if segment > 0 {
                if !*bypassed {
                    kernel.do_rendering(io, frame_count - frames_remaining, segment);
                }
                frames_remaining -= segment;
                now += segment as i64;
            }

            // Apply everything that is due now, in list order.
            while next_event < events.len() && events[next_event].sample_time <= now {
                Self::dispatch(kernel, bypassed, &events[next_event]);
                next_event += 1;
            }
        }
    }

    fn dispatch(kernel: &mut K, bypassed: &mut bool, event: &RenderEvent) {
        match event.body {
            EventBody::Parameter { address, value } => {
                if address == ParamAddress::Bypass.as_raw() {
                    *bypassed = value > 0.5;
                } else {
                    kernel.do_parameter_event(address, value, 0);
                }
            }
            EventBody::ParameterRamp {
                address,
                value,
                ramp_frames,
            } => {
                if address == ParamAddress::Bypass.as_raw() {
                    // A switch has nothing to glide.
                    *bypassed = value > 0.5;
                } else {
                    kernel.do_parameter_event(address, value, ramp_frames);
                }
            }
            EventBody::Midi { bytes, len } => {
                kernel.do_midi_event(&bytes[..(len as usize).min(3)]);
            }
        }
    }
}
