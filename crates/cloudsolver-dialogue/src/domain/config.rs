//! Dialogue tunables.

use std::time::Duration;

/// Option id submitted on the player's behalf when the question timer
/// reaches zero.
pub const TIMEOUT_OPTION_ID: &str = "__timeout__";

/// Session tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueConfig {
    /// Delay between revealed characters.
    pub char_interval: Duration,
    /// Question timer tick period.
    pub tick_interval: Duration,
    /// Hints allowed per question.
    pub max_hints_per_question: u32,
    /// Option submitted when the timer expires.
    pub timeout_option_id: String,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            char_interval: Duration::from_millis(30),
            tick_interval: Duration::from_secs(1),
            max_hints_per_question: 3,
            timeout_option_id: TIMEOUT_OPTION_ID.to_owned(),
        }
    }
}
