//! Engine event abstractions.
//!
//! The engine never renders anything itself; it emits discrete events that a
//! presentation layer subscribes to. Each event carries [`EventMetadata`] so
//! a subscriber can order, correlate and deduplicate them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every emitted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name for routing on the subscriber side.
    pub event_type: String,
    /// The session (or command) this event belongs to.
    pub correlation_id: Uuid,
    /// Monotonically increasing position within the emitting session.
    pub sequence_number: u64,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Trait that all engine events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name (used for serialization routing).
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}
