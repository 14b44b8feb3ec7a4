//! Dialogue phases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a session is in its per-question loop.
///
/// `Idle -> Greeting -> AwaitingAnswer -> (HintPending)* -> Reacting -> Idle`,
/// with `Closed` reachable from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePhase {
    /// Ready for a question (or for `start` on a fresh session).
    Idle,
    /// Greeting lines are being shown.
    Greeting,
    /// A question is open.
    AwaitingAnswer,
    /// A hint is being resolved or revealed.
    HintPending,
    /// The answer reaction is being revealed.
    Reacting,
    /// Terminal.
    Closed,
}

impl DialoguePhase {
    /// Snake-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Greeting => "greeting",
            Self::AwaitingAnswer => "awaiting_answer",
            Self::HintPending => "hint_pending",
            Self::Reacting => "reacting",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for DialoguePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
