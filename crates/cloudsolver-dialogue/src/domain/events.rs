//! Presentation events emitted by a dialogue session.

use cloudsolver_core::event::{DomainEvent, EventMetadata};
use cloudsolver_hints::domain::hint::Hint;
use cloudsolver_progression::domain::achievements::AchievementId;
use cloudsolver_scoring::domain::score::ScoreResult;
use serde::{Deserialize, Serialize};

use super::summary::SessionSummary;

/// Emitted as a line is typed out. The final event for a line carries the
/// full text with `is_complete` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRevealed {
    /// Text revealed so far.
    pub text: String,
    /// Whether the whole line is now visible.
    pub is_complete: bool,
}

/// Emitted when a question is handed to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPresented {
    /// The question.
    pub question_id: String,
    /// Seconds on the clock.
    pub time_limit_secs: u32,
}

/// Emitted when a hint has been resolved, before it is typed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintShown {
    /// The resolved hint.
    pub hint: Hint,
}

/// Emitted when an answer has been scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComputed {
    /// The score breakdown.
    pub result: ScoreResult,
}

/// Emitted when the player levels up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChanged {
    /// Level before the answer.
    pub previous_level: u32,
    /// Level after the answer.
    pub new_level: u32,
}

/// Emitted when an answer unlocks achievements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementsUnlocked {
    /// Newly unlocked achievements in declaration order.
    pub achievements: Vec<AchievementId>,
}

/// Emitted once per question timer tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerTicked {
    /// Whole seconds left.
    pub remaining_secs: u32,
}

/// Emitted once when the session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClosed {
    /// Totals for the whole session.
    pub summary: SessionSummary,
}

/// Event payload variants for a dialogue session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PresentationEventKind {
    /// Part or all of a line is visible.
    LineRevealed(LineRevealed),
    /// A question is open.
    QuestionPresented(QuestionPresented),
    /// A hint was resolved.
    HintShown(HintShown),
    /// An answer was scored.
    ScoreComputed(ScoreComputed),
    /// The player levelled up.
    LevelChanged(LevelChanged),
    /// Achievements were unlocked.
    AchievementsUnlocked(AchievementsUnlocked),
    /// The question timer ticked.
    TimerTicked(TimerTicked),
    /// The session ended.
    SessionClosed(SessionClosed),
}

impl PresentationEventKind {
    /// Routing name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::LineRevealed(_) => "dialogue.line_revealed",
            Self::QuestionPresented(_) => "dialogue.question_presented",
            Self::HintShown(_) => "dialogue.hint_shown",
            Self::ScoreComputed(_) => "dialogue.score_computed",
            Self::LevelChanged(_) => "dialogue.level_changed",
            Self::AchievementsUnlocked(_) => "dialogue.achievements_unlocked",
            Self::TimerTicked(_) => "dialogue.timer_ticked",
            Self::SessionClosed(_) => "dialogue.session_closed",
        }
    }
}

/// Presentation event envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PresentationEventKind,
}

impl DomainEvent for PresentationEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
