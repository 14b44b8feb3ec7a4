//! Domain model for progression.

pub mod achievements;
pub mod commands;
pub mod levels;
pub mod state;
