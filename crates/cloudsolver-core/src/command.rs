//! Player commands.

use uuid::Uuid;

/// A request to change one player's state.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted name used in logs, e.g. `progression.submit_answer`.
    fn command_type(&self) -> &'static str;

    /// Traces the command through scoring, progression and persistence.
    fn correlation_id(&self) -> Uuid;

    /// The player whose state the command changes.
    fn player_id(&self) -> Uuid;
}
