//! The resolved hint value.

use serde::{Deserialize, Serialize};

/// Highest hint level; also the per-question hint allowance.
pub const MAX_HINT_LEVEL: u8 = 3;

/// Where a hint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintSource {
    /// The remote advisory service.
    Remote,
    /// The local category templates.
    Fallback,
}

/// A hint ready to show to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    /// The bare hint body.
    pub text: String,
    /// The hint as the NPC says it.
    pub display_message: String,
    /// Remote or fallback.
    pub source: HintSource,
    /// Level the hint was resolved at, `1..=MAX_HINT_LEVEL`.
    pub hint_level: u8,
    /// The NPC delivering the hint.
    pub npc_id: String,
}

/// Clamps a requested level into `1..=MAX_HINT_LEVEL`.
#[must_use]
pub fn clamp_hint_level(level: u8) -> u8 {
    level.clamp(1, MAX_HINT_LEVEL)
}
