//! Application services for hints.

pub mod resolver;
