//! Player progression: level, experience, streaks and achievements.
//!
//! [`ProgressionState`] is only ever mutated through
//! [`ProgressionState::apply_score`]. Everything else is read-only.

use std::collections::BTreeMap;

use cloudsolver_core::error::DomainError;
use cloudsolver_scoring::domain::question::Question;
use cloudsolver_scoring::domain::score::ScoreResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::achievements::{AchievementEvaluator, AchievementId};
use super::levels::{MAX_LEVEL, level_for_experience};

/// Current snapshot schema version.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// What a single [`ProgressionState::apply_score`] call changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreApplication {
    /// Whether the level strictly increased.
    pub leveled_up: bool,
    /// Level before the call.
    pub previous_level: u32,
    /// Level after the call.
    pub new_level: u32,
    /// Achievements unlocked by this call, in declaration order.
    pub newly_unlocked: Vec<AchievementId>,
}

/// Cumulative progression for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionState {
    level: u32,
    experience: u64,
    total_score: u64,
    current_streak: u32,
    max_streak: u32,
    questions_answered: u32,
    correct_answers: u32,
    hints_used: u32,
    unlocked_achievements: Vec<AchievementId>,
    per_category_correct: BTreeMap<String, u32>,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionState {
    /// A brand-new player at level 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: 1,
            experience: 0,
            total_score: 0,
            current_streak: 0,
            max_streak: 0,
            questions_answered: 0,
            correct_answers: 0,
            hints_used: 0,
            unlocked_achievements: Vec::new(),
            per_category_correct: BTreeMap::new(),
        }
    }

    /// Current level, `1..=20`.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Cumulative experience. Always equal to [`Self::total_score`].
    #[must_use]
    pub fn experience(&self) -> u64 {
        self.experience
    }

    /// Cumulative score.
    #[must_use]
    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    /// Consecutive correct answers ending with the latest one.
    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    /// Longest streak ever reached.
    #[must_use]
    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    /// Questions answered, correct or not.
    #[must_use]
    pub fn questions_answered(&self) -> u32 {
        self.questions_answered
    }

    /// Questions answered correctly.
    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    /// Hints consumed across all questions.
    #[must_use]
    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    /// Unlocked achievements in unlock order.
    #[must_use]
    pub fn unlocked_achievements(&self) -> &[AchievementId] {
        &self.unlocked_achievements
    }

    /// Correct answers per question category.
    #[must_use]
    pub fn per_category_correct(&self) -> &BTreeMap<String, u32> {
        &self.per_category_correct
    }

    /// Whether `id` has been unlocked.
    #[must_use]
    pub fn has_achievement(&self, id: AchievementId) -> bool {
        self.unlocked_achievements.contains(&id)
    }

    /// Whole-number accuracy, `0` when nothing has been answered yet.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn accuracy_percent(&self) -> u32 {
        if self.questions_answered == 0 {
            return 0;
        }
        (u64::from(self.correct_answers) * 100 / u64::from(self.questions_answered)) as u32
    }

    /// Applies a scored answer.
    ///
    /// Either every field is updated or, on error, none is.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScoreInput` if `result` is inconsistent
    /// with `question` or the question itself is malformed.
    pub fn apply_score(
        &mut self,
        question: &Question,
        result: &ScoreResult,
    ) -> Result<ScoreApplication, DomainError> {
        question.validate()?;
        result.validate_for(question)?;

        let previous_level = self.level;
        let mut next = self.clone();
        let points = u64::from(result.total_points);

        next.total_score = next.total_score.saturating_add(points);
        next.experience = next.experience.saturating_add(points);
        next.questions_answered = next.questions_answered.saturating_add(1);
        next.hints_used = next.hints_used.saturating_add(result.hints_used);

        if result.is_correct {
            next.correct_answers = next.correct_answers.saturating_add(1);
            next.current_streak = next.current_streak.saturating_add(1);
            *next
                .per_category_correct
                .entry(question.category.clone())
                .or_insert(0) += 1;
        } else {
            next.current_streak = 0;
        }
        next.max_streak = next.max_streak.max(next.current_streak);

        next.level = level_for_experience(next.experience)
            .max(previous_level)
            .min(MAX_LEVEL);

        let newly_unlocked = AchievementEvaluator::evaluate(&next, Some(result));
        for id in &newly_unlocked {
            if !next.has_achievement(*id) {
                next.unlocked_achievements.push(*id);
            }
        }

        *self = next;

        debug!(
            question_id = %question.id,
            level = self.level,
            experience = self.experience,
            streak = self.current_streak,
            unlocked = newly_unlocked.len(),
            "score applied"
        );

        Ok(ScoreApplication {
            leveled_up: self.level > previous_level,
            previous_level,
            new_level: self.level,
            newly_unlocked,
        })
    }

    /// Rebuilds a state from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the snapshot is internally
    /// inconsistent.
    pub fn restore(snapshot: ProgressionSnapshot) -> Result<Self, DomainError> {
        if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(DomainError::Infrastructure(format!(
                "unsupported progression snapshot version {}",
                snapshot.schema_version
            )));
        }
        if snapshot.correct_answers > snapshot.questions_answered {
            return Err(DomainError::Infrastructure(format!(
                "snapshot has {} correct answers out of {} answered",
                snapshot.correct_answers, snapshot.questions_answered
            )));
        }
        if snapshot.current_streak > snapshot.max_streak {
            return Err(DomainError::Infrastructure(format!(
                "snapshot streak {} exceeds max streak {}",
                snapshot.current_streak, snapshot.max_streak
            )));
        }

        let mut unlocked: Vec<AchievementId> = Vec::new();
        for id in snapshot.unlocked_achievements {
            if !unlocked.contains(&id) {
                unlocked.push(id);
            }
        }

        let level = level_for_experience(snapshot.experience)
            .max(snapshot.level)
            .clamp(1, MAX_LEVEL);

        Ok(Self {
            level,
            experience: snapshot.experience,
            total_score: snapshot.total_score,
            current_streak: snapshot.current_streak,
            max_streak: snapshot.max_streak,
            questions_answered: snapshot.questions_answered,
            correct_answers: snapshot.correct_answers,
            hints_used: snapshot.hints_used,
            unlocked_achievements: unlocked,
            per_category_correct: snapshot.per_category_correct,
        })
    }

    /// Captures the state as a serializable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            level: self.level,
            experience: self.experience,
            total_score: self.total_score,
            current_streak: self.current_streak,
            max_streak: self.max_streak,
            questions_answered: self.questions_answered,
            correct_answers: self.correct_answers,
            hints_used: self.hints_used,
            unlocked_achievements: self.unlocked_achievements.clone(),
            per_category_correct: self.per_category_correct.clone(),
        }
    }

    /// Serializes the state into the JSON document the persistence port stores.
    ///
    /// # Panics
    ///
    /// Never in practice: every snapshot field is a number, a string-keyed
    /// map or a unit enum, all of which serialize infallibly.
    #[must_use]
    pub fn to_snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).expect("progression snapshot serializes to JSON")
    }

    /// Decodes a JSON document produced by [`Self::to_snapshot`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if decoding fails or the decoded
    /// snapshot is inconsistent.
    pub fn from_snapshot(value: serde_json::Value) -> Result<Self, DomainError> {
        let snapshot: ProgressionSnapshot = serde_json::from_value(value).map_err(|e| {
            DomainError::Infrastructure(format!("progression snapshot decoding failed: {e}"))
        })?;
        Self::restore(snapshot)
    }
}

/// Persisted form of [`ProgressionState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionSnapshot {
    /// Snapshot layout version.
    pub schema_version: u32,
    /// Level.
    pub level: u32,
    /// Experience.
    pub experience: u64,
    /// Total score.
    pub total_score: u64,
    /// Current streak.
    pub current_streak: u32,
    /// Max streak.
    pub max_streak: u32,
    /// Questions answered.
    pub questions_answered: u32,
    /// Correct answers.
    pub correct_answers: u32,
    /// Hints used.
    pub hints_used: u32,
    /// Unlocked achievements.
    pub unlocked_achievements: Vec<AchievementId>,
    /// Correct answers per category.
    pub per_category_correct: BTreeMap<String, u32>,
}

impl Default for ProgressionSnapshot {
    fn default() -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            level: 1,
            experience: 0,
            total_score: 0,
            current_streak: 0,
            max_streak: 0,
            questions_answered: 0,
            correct_answers: 0,
            hints_used: 0,
            unlocked_achievements: Vec::new(),
            per_category_correct: BTreeMap::new(),
        }
    }
}
