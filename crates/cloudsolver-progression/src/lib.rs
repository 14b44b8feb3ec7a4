//! Cloud Solver — Progression.
//!
//! Responsible for experience, levels, ranks, answer streaks and achievement
//! badges, and for the application-level flow that scores an answer against
//! a player's persisted progression.

pub mod application;
pub mod domain;
