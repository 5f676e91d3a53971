use rtrb::{Consumer, Producer, RingBuffer};

use super::event::RenderEvent;

/*
Control-to-render event channel
===============================

Hosts that schedule events on the render call pass a slice straight to
`process_and_render`. A standalone control thread has no such slice, so
this channel bridges the gap: a fixed-capacity SPSC ring buffer carries
events across, and the render side drains it into a pre-allocated scratch
vector right before each block.

Events must be pushed in nondecreasing sample-time order; the drain does
not sort (sorting could allocate, and the processor already tolerates
late events by applying them immediately).
*/

/// Create a channel with room for `capacity` in-flight events.
pub fn event_channel(capacity: usize) -> (EventProducer, EventConsumer) {
    let (producer, consumer) = RingBuffer::new(capacity);
    (
        EventProducer { producer },
        EventConsumer {
            consumer,
            scratch: Vec::with_capacity(capacity),
        },
    )
}

/// Control-thread side: push timestamped events, oldest first.
pub struct EventProducer {
    producer: Producer<RenderEvent>,
}

impl EventProducer {
    /// Push an event; returns it back if the channel is full.
    pub fn push(&mut self, event: RenderEvent) -> Result<(), RenderEvent> {
        self.producer.push(event).map_err(|error| match error {
            rtrb::PushError::Full(event) => event,
        })
    }
}

/// Render-thread side: drain pending events into a reusable slice.
pub struct EventConsumer {
    consumer: Consumer<RenderEvent>,
    scratch: Vec<RenderEvent>,
}

impl EventConsumer {
    /// Collect everything currently queued. The returned slice borrows a
    /// scratch vector whose capacity was fixed at construction, so this
    /// never allocates.
    pub fn drain(&mut self) -> &[RenderEvent] {
        self.scratch.clear();
        while let Ok(event) = self.consumer.pop() {
            self.scratch.push(event);
        }
        &self.scratch
    }
}
