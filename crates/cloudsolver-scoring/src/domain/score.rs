//! Score breakdown produced for every answered question.

use cloudsolver_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::question::Question;

/// Largest time bonus a single answer can earn.
pub const MAX_TIME_BONUS: u32 = 50;

/// Points deducted per hint used on a correct answer.
pub const HINT_PENALTY_PER_HINT: u32 = 10;

/// The outcome of scoring one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// The question that was answered.
    pub question_id: String,
    /// The question's category, carried for per-category statistics.
    pub category: String,
    /// Whether the selected option was the correct one.
    pub is_correct: bool,
    /// The question's base points.
    pub base_points: u32,
    /// Difficulty multiplier (1, 1.5 or 2).
    pub difficulty_multiplier: f64,
    /// Bonus for remaining time, `0..=MAX_TIME_BONUS`.
    pub time_bonus: u32,
    /// `hints_used * HINT_PENALTY_PER_HINT`; only subtracted when correct.
    pub hint_penalty: u32,
    /// Hints consumed on the question.
    pub hints_used: u32,
    /// Points awarded. Zero for incorrect answers.
    pub total_points: u32,
}

impl ScoreResult {
    /// Upper bound on `total_points` for `question`.
    #[must_use]
    pub fn max_points_for(question: &Question) -> u32 {
        question.weighted_points().saturating_add(MAX_TIME_BONUS)
    }

    /// Checks that this result is internally consistent and was computed for
    /// `question`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScoreInput` describing the first
    /// inconsistency found.
    pub fn validate_for(&self, question: &Question) -> Result<(), DomainError> {
        let fail = |msg: String| Err(DomainError::InvalidScoreInput(msg));

        if self.question_id != question.id {
            return fail(format!(
                "result for question '{}' applied with question '{}'",
                self.question_id, question.id
            ));
        }
        if self.base_points != question.base_points {
            return fail(format!(
                "result base points {} differ from question base points {}",
                self.base_points, question.base_points
            ));
        }
        if (self.difficulty_multiplier - question.difficulty.multiplier()).abs() > f64::EPSILON {
            return fail(format!(
                "result multiplier {} does not match difficulty {}",
                self.difficulty_multiplier, question.difficulty
            ));
        }
        if self.time_bonus > MAX_TIME_BONUS {
            return fail(format!("time bonus {} exceeds {MAX_TIME_BONUS}", self.time_bonus));
        }
        if self.hint_penalty != self.hints_used.saturating_mul(HINT_PENALTY_PER_HINT) {
            return fail(format!(
                "hint penalty {} does not match {} hints used",
                self.hint_penalty, self.hints_used
            ));
        }
        if !self.is_correct && self.total_points != 0 {
            return fail(format!(
                "incorrect answer carries {} points",
                self.total_points
            ));
        }
        let max = Self::max_points_for(question);
        if self.total_points > max {
            return fail(format!(
                "total points {} exceed the maximum of {max}",
                self.total_points
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::question::fixtures::medium_question;

    fn valid_result() -> ScoreResult {
        ScoreResult {
            question_id: "q-ec2-001".to_owned(),
            category: "EC2".to_owned(),
            is_correct: true,
            base_points: 100,
            difficulty_multiplier: 1.5,
            time_bonus: 37,
            hint_penalty: 10,
            hints_used: 1,
            total_points: 177,
        }
    }

    #[test]
    fn test_validate_for_accepts_consistent_result() {
        assert!(valid_result().validate_for(&medium_question()).is_ok());
    }

    #[test]
    fn test_validate_for_rejects_points_on_incorrect_answer() {
        let mut result = valid_result();
        result.is_correct = false;

        assert!(matches!(
            result.validate_for(&medium_question()),
            Err(DomainError::InvalidScoreInput(_))
        ));
    }

    #[test]
    fn test_validate_for_rejects_total_above_maximum() {
        let mut result = valid_result();
        result.total_points = 201;

        match result.validate_for(&medium_question()).unwrap_err() {
            DomainError::InvalidScoreInput(msg) => assert!(msg.contains("maximum of 200")),
            other => panic!("expected InvalidScoreInput, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_for_rejects_inconsistent_hint_penalty() {
        let mut result = valid_result();
        result.hint_penalty = 0;
        assert!(result.validate_for(&medium_question()).is_err());
    }

    #[test]
    fn test_validate_for_rejects_wrong_multiplier() {
        let mut result = valid_result();
        result.difficulty_multiplier = 2.0;
        assert!(result.validate_for(&medium_question()).is_err());
    }
}
