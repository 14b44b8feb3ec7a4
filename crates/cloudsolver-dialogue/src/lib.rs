//! Cloud Solver — Dialogue.
//!
//! A per-NPC dialogue session: greeting, question, hints, answer reaction,
//! repeat. Every line is revealed through a cancellable typed-text effect
//! and every observable change is emitted as a presentation event; this crate
//! never renders anything itself.

pub mod application;
pub mod domain;
