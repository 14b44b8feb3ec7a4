//! Cloud Solver — Hints.
//!
//! Resolves a hint for a question on behalf of an NPC. The remote advisory
//! service is tried first under a strict timeout; every failure falls back to
//! a local, category-specific hint phrased in the NPC's voice. Resolution
//! itself never fails.

pub mod application;
pub mod domain;
pub mod http_advisory;
