//! Wall-clock access.
//!
//! Event metadata and saved snapshots are stamped through [`Clock`] so tests
//! can pin every timestamp. Elapsed answer time is measured separately with
//! the async runtime's monotonic clock.

use chrono::{DateTime, Utc};

/// Source of `occurred_at` and `saved_at` timestamps.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
