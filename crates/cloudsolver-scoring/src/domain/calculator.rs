//! The score calculator.
//!
//! Pure and deterministic: the same question and submission always produce
//! the same [`ScoreResult`]. The per-question hint cap is the caller's
//! business; every hint passed in is penalized linearly.

use cloudsolver_core::error::DomainError;
use tracing::debug;

use super::question::Question;
use super::score::{HINT_PENALTY_PER_HINT, MAX_TIME_BONUS, ScoreResult};
use super::submission::AnswerSubmission;

/// Computes score breakdowns.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Scores `submission` against `question`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScoreInput` if either input is malformed.
    pub fn compute(
        question: &Question,
        submission: &AnswerSubmission,
    ) -> Result<ScoreResult, DomainError> {
        question.validate()?;
        submission.validate_against(question)?;

        let is_correct = submission.selected_option == question.correct_option;
        let time_bonus = time_bonus(question.time_limit_secs, submission.elapsed_secs);
        let hint_penalty = submission.hints_used.saturating_mul(HINT_PENALTY_PER_HINT);

        let total_points = if is_correct {
            question
                .weighted_points()
                .saturating_add(time_bonus)
                .saturating_sub(hint_penalty)
        } else {
            0
        };

        debug!(
            question_id = %question.id,
            is_correct,
            time_bonus,
            hint_penalty,
            total_points,
            "score computed"
        );

        Ok(ScoreResult {
            question_id: question.id.clone(),
            category: question.category.clone(),
            is_correct,
            base_points: question.base_points,
            difficulty_multiplier: question.difficulty.multiplier(),
            time_bonus,
            hint_penalty,
            hints_used: submission.hints_used,
            total_points,
        })
    }
}

/// Bonus for the fraction of the time limit left unused:
/// `floor(remaining / limit * MAX_TIME_BONUS)`, never negative.
///
/// A zero limit earns nothing.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn time_bonus(time_limit_secs: u32, elapsed_secs: f64) -> u32 {
    if time_limit_secs == 0 || !elapsed_secs.is_finite() {
        return 0;
    }
    let limit = f64::from(time_limit_secs);
    let remaining = (limit - elapsed_secs.max(0.0)).max(0.0);
    // Multiply before dividing so whole-second inputs floor exactly.
    let bonus = (remaining * f64::from(MAX_TIME_BONUS) / limit).floor();
    (bonus as u32).min(MAX_TIME_BONUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::question::Difficulty;
    use crate::domain::question::fixtures::medium_question;

    fn submit(option: &str, elapsed_secs: f64, hints_used: u32) -> AnswerSubmission {
        AnswerSubmission {
            question_id: "q-ec2-001".to_owned(),
            selected_option: option.to_owned(),
            elapsed_secs,
            hints_used,
        }
    }

    #[test]
    fn test_compute_correct_medium_answer_with_one_hint() {
        // Arrange
        let question = medium_question();
        let submission = submit("b", 15.0, 1);

        // Act
        let result = ScoreCalculator::compute(&question, &submission).unwrap();

        // Assert
        assert!(result.is_correct);
        assert_eq!(result.time_bonus, 37);
        assert_eq!(result.hint_penalty, 10);
        assert_eq!(result.total_points, 177);
        assert!((result.difficulty_multiplier - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_compute_incorrect_answer_scores_zero_regardless_of_modifiers() {
        let question = medium_question();

        for (elapsed, hints) in [(0.0, 0), (15.0, 1), (59.0, 3), (90.0, 7)] {
            let result = ScoreCalculator::compute(&question, &submit("a", elapsed, hints)).unwrap();
            assert!(!result.is_correct);
            assert_eq!(result.total_points, 0);
            assert_eq!(result.hint_penalty, hints * 10);
        }
    }

    #[test]
    fn test_compute_elapsed_beyond_limit_earns_no_bonus() {
        let result = ScoreCalculator::compute(&medium_question(), &submit("b", 75.0, 0)).unwrap();

        assert_eq!(result.time_bonus, 0);
        assert_eq!(result.total_points, 150);
    }

    #[test]
    fn test_compute_instant_answer_earns_full_bonus() {
        let result = ScoreCalculator::compute(&medium_question(), &submit("b", 0.0, 0)).unwrap();

        assert_eq!(result.time_bonus, MAX_TIME_BONUS);
        assert_eq!(result.total_points, 200);
    }

    #[test]
    fn test_compute_hints_beyond_cap_are_still_penalized_and_floor_at_zero() {
        let mut question = medium_question();
        question.base_points = 10;
        question.difficulty = Difficulty::Easy;

        let result = ScoreCalculator::compute(&question, &submit("b", 60.0, 5)).unwrap();

        assert!(result.is_correct);
        assert_eq!(result.hint_penalty, 50);
        assert_eq!(result.total_points, 0);
    }

    #[test]
    fn test_compute_total_stays_within_bounds_across_inputs() {
        for difficulty in Difficulty::ALL {
            let mut question = medium_question();
            question.difficulty = difficulty;
            for base in [0_u32, 1, 75, 100, 333] {
                question.base_points = base;
                for elapsed in 0..=60 {
                    for hints in 0..=3 {
                        let result = ScoreCalculator::compute(
                            &question,
                            &submit("b", f64::from(elapsed), hints),
                        )
                        .unwrap();
                        assert!(result.total_points <= question.weighted_points() + 50);
                        assert!(result.validate_for(&question).is_ok());
                    }
                }
            }
        }
    }

    #[test]
    fn test_compute_rejects_malformed_question() {
        let mut question = medium_question();
        question.time_limit_secs = 0;

        assert!(matches!(
            ScoreCalculator::compute(&question, &submit("b", 1.0, 0)),
            Err(DomainError::InvalidScoreInput(_))
        ));
    }

    #[test]
    fn test_time_bonus_floors_fraction() {
        assert_eq!(time_bonus(60, 15.0), 37);
        assert_eq!(time_bonus(60, 36.0), 20);
        assert_eq!(time_bonus(60, 59.9), 0);
        assert_eq!(time_bonus(30, 0.0), 50);
        assert_eq!(time_bonus(0, 0.0), 0);
    }
}
