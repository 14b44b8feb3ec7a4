//! Application services for progression.

pub mod command_handlers;
pub mod leaderboard;
pub mod query_handlers;
