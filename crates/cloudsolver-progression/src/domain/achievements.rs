//! Achievement definitions and their evaluation.
//!
//! Evaluation is pure: [`AchievementEvaluator::evaluate`] only reports what
//! should unlock, and [`ProgressionState::apply_score`] does the inserting.

use std::fmt;

use cloudsolver_scoring::domain::score::ScoreResult;
use serde::{Deserialize, Serialize};

use super::state::ProgressionState;

/// Stable achievement identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AchievementId {
    /// First correct answer ever.
    #[serde(rename = "first_correct")]
    FirstCorrect,
    /// Five correct answers in a row.
    #[serde(rename = "streak_5")]
    Streak5,
    /// Ten correct answers in a row.
    #[serde(rename = "streak_10")]
    Streak10,
    /// Correct, no hints, some time to spare.
    #[serde(rename = "perfect_answer")]
    PerfectAnswer,
    /// Correct with a time bonus of at least 40.
    #[serde(rename = "speed_answer")]
    SpeedAnswer,
    /// At least 90% accuracy over 10 or more questions.
    #[serde(rename = "accuracy_90")]
    Accuracy90,
    /// Fifty questions answered.
    #[serde(rename = "questions_50")]
    Questions50,
    /// Five thousand cumulative points.
    #[serde(rename = "score_5000")]
    Score5000,
}

impl AchievementId {
    /// Wire identifier, identical to the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstCorrect => "first_correct",
            Self::Streak5 => "streak_5",
            Self::Streak10 => "streak_10",
            Self::PerfectAnswer => "perfect_answer",
            Self::SpeedAnswer => "speed_answer",
            Self::Accuracy90 => "accuracy_90",
            Self::Questions50 => "questions_50",
            Self::Score5000 => "score_5000",
        }
    }

    /// The definition registered for this identifier.
    #[must_use]
    pub fn definition(self) -> &'static AchievementDefinition {
        ACHIEVEMENTS
            .iter()
            .find(|d| d.id == self)
            .unwrap_or(&ACHIEVEMENTS[0])
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicate over the post-score state and the answer just scored.
pub type AchievementPredicate = fn(&ProgressionState, Option<&ScoreResult>) -> bool;

/// A permanently unlockable badge.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDefinition {
    /// Identifier.
    pub id: AchievementId,
    /// Display name.
    pub name: &'static str,
    /// Display description.
    pub description: &'static str,
    /// Unlock condition. Must be side-effect free.
    pub predicate: AchievementPredicate,
}

/// All achievements, in reporting order.
pub static ACHIEVEMENTS: [AchievementDefinition; 8] = [
    AchievementDefinition {
        id: AchievementId::FirstCorrect,
        name: "First Steps",
        description: "Answer your first question correctly.",
        predicate: |state, _| state.correct_answers() >= 1,
    },
    AchievementDefinition {
        id: AchievementId::Streak5,
        name: "On a Roll",
        description: "Answer 5 questions in a row correctly.",
        predicate: |state, _| state.max_streak() >= 5,
    },
    AchievementDefinition {
        id: AchievementId::Streak10,
        name: "Unstoppable",
        description: "Answer 10 questions in a row correctly.",
        predicate: |state, _| state.max_streak() >= 10,
    },
    AchievementDefinition {
        id: AchievementId::PerfectAnswer,
        name: "Flawless",
        description: "Answer correctly without hints and with time to spare.",
        predicate: |_, last| {
            last.is_some_and(|r| r.is_correct && r.hints_used == 0 && r.time_bonus > 0)
        },
    },
    AchievementDefinition {
        id: AchievementId::SpeedAnswer,
        name: "Quick Thinker",
        description: "Answer correctly while earning a time bonus of 40 or more.",
        predicate: |_, last| last.is_some_and(|r| r.is_correct && r.time_bonus >= 40),
    },
    AchievementDefinition {
        id: AchievementId::Accuracy90,
        name: "Sharpshooter",
        description: "Keep 90% accuracy over at least 10 questions.",
        predicate: |state, _| {
            let answered = u64::from(state.questions_answered());
            answered >= 10 && u64::from(state.correct_answers()) * 100 >= answered * 90
        },
    },
    AchievementDefinition {
        id: AchievementId::Questions50,
        name: "Seasoned Architect",
        description: "Answer 50 questions.",
        predicate: |state, _| state.questions_answered() >= 50,
    },
    AchievementDefinition {
        id: AchievementId::Score5000,
        name: "High Scorer",
        description: "Reach a total score of 5000.",
        predicate: |state, _| state.total_score() >= 5_000,
    },
];

/// Evaluates achievement predicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct AchievementEvaluator;

impl AchievementEvaluator {
    /// Returns the achievements that `state` newly qualifies for, in
    /// declaration order. Already-unlocked achievements are never reported.
    #[must_use]
    pub fn evaluate(state: &ProgressionState, last: Option<&ScoreResult>) -> Vec<AchievementId> {
        ACHIEVEMENTS
            .iter()
            .filter(|def| !state.has_achievement(def.id))
            .filter(|def| (def.predicate)(state, last))
            .map(|def| def.id)
            .collect()
    }
}
