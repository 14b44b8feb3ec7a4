//! Cloud Solver Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the scoring,
//! progression, hint and dialogue crates depend on: the error taxonomy,
//! deterministic time and randomness, and the ports to external
//! collaborators (persistence and the remote advisory service). It contains
//! no infrastructure code.

pub mod advisory;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod repository;
pub mod rng;
