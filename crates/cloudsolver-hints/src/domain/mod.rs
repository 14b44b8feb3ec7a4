//! Domain model for hints.

pub mod fallback;
pub mod hint;
pub mod offer;
