//! The render engine: event records, the block processor, and the phaser
//! kernel it drives.
//!
//! The processor owns the kernel and dispatches to it through the
//! [`RenderKernel`] trait; the generic is monomorphized, so there is no
//! virtual dispatch anywhere on the render path.

/// Timestamped render events.
pub mod event;
/// The phaser kernel: LFO, parameters, one phase shifter per channel.
pub mod kernel;
/// Event-interleaved block rendering with bypass and in-place support.
pub mod processor;
/// Lock-free event channel from the control thread to the render thread.
#[cfg(feature = "rtrb")]
pub mod queue;

pub use event::{EventBody, RenderEvent};
pub use kernel::PhaserKernel;
pub use processor::{EventProcessor, PullError, RenderKernel};
#[cfg(feature = "rtrb")]
pub use queue::{event_channel, EventConsumer, EventProducer};

/// The fully wired engine: block processor around the phaser kernel.
pub type PhaserEngine = EventProcessor<PhaserKernel>;
