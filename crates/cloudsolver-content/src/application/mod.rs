//! Application services for game content.

pub mod query_handlers;
