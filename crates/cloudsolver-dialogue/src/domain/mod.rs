//! Domain model for dialogue sessions.

pub mod config;
pub mod events;
pub mod phase;
pub mod summary;
