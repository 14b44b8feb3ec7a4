//! Cloud Solver — Scoring.
//!
//! Owns the read-only question model, the player's answer submission and the
//! pure score calculation that turns the two into a [`domain::score::ScoreResult`].

pub mod domain;
