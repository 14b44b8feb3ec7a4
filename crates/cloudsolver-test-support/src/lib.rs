//! Shared test mocks and utilities for the Cloud Solver engine.

mod advisory;
mod clock;
mod repository;
mod rng;

pub use advisory::{
    FailingAdvisoryService, HangingAdvisoryService, MalformedAdvisoryService,
    StubAdvisoryService,
};
pub use clock::{FixedClock, SteppingClock};
pub use repository::{
    EmptyProgressRepository, FailingProgressRepository, RecordingProgressRepository,
};
pub use rng::{MockRng, SequenceRng};
