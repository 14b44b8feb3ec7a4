//! Presentation event sinks.
//!
//! A session pushes every observable change through an [`EventSink`]. Sinks
//! must not block: `emit` is called from the typed-text effect and the
//! question timer as well as from session operations.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cloudsolver_core::clock::Clock;
use cloudsolver_core::event::{DomainEvent, EventMetadata};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::domain::events::{PresentationEvent, PresentationEventKind};

/// Receives presentation events.
pub trait EventSink: Send + Sync {
    /// Delivers one event.
    fn emit(&self, event: PresentationEvent);
}

/// Forwards events into an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<PresentationEvent>,
}

impl ChannelEventSink {
    /// Creates a sink and the receiver a presentation layer reads from.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PresentationEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: PresentationEvent) {
        // A dropped receiver means nobody is watching; the session carries on.
        let _ = self.sender.send(event);
    }
}

/// Logs each event at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: PresentationEvent) {
        info!(
            event_type = event.event_type(),
            correlation_id = %event.metadata.correlation_id,
            sequence = event.metadata.sequence_number,
            payload = %event.to_payload(),
            "presentation event"
        );
    }
}

/// Stamps payloads with metadata and hands them to a sink. Sequence numbers
/// start at 1 and are unique per session.
pub(crate) struct EventEmitter {
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    correlation_id: Uuid,
    sequence: AtomicU64,
}

impl EventEmitter {
    pub(crate) fn new(
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
        correlation_id: Uuid,
    ) -> Self {
        Self {
            sink,
            clock,
            correlation_id,
            sequence: AtomicU64::new(0),
        }
    }

    pub(crate) fn emit(&self, kind: PresentationEventKind) {
        let sequence_number = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let event = PresentationEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                correlation_id: self.correlation_id,
                sequence_number,
                occurred_at: self.clock.now(),
            },
            kind,
        };
        self.sink.emit(event);
    }
}
