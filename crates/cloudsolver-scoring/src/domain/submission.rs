//! Player answer submissions.

use cloudsolver_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::question::Question;

/// A player's answer to a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    /// The question being answered.
    pub question_id: String,
    /// The option the player picked.
    pub selected_option: String,
    /// Seconds between the question appearing and the answer.
    pub elapsed_secs: f64,
    /// Hints consumed on this question. Not capped here.
    pub hints_used: u32,
}

impl AnswerSubmission {
    /// Checks that the submission belongs to `question` and is well formed.
    ///
    /// An elapsed time beyond the question's limit is accepted; it simply
    /// earns no time bonus.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScoreInput` if the question ids differ,
    /// the selected option is blank, or the elapsed time is negative or not
    /// finite.
    pub fn validate_against(&self, question: &Question) -> Result<(), DomainError> {
        if self.question_id != question.id {
            return Err(DomainError::InvalidScoreInput(format!(
                "submission for question '{}' scored against question '{}'",
                self.question_id, question.id
            )));
        }
        if self.selected_option.trim().is_empty() {
            return Err(DomainError::InvalidScoreInput(
                "selected option must not be blank".to_owned(),
            ));
        }
        if !self.elapsed_secs.is_finite() || self.elapsed_secs < 0.0 {
            return Err(DomainError::InvalidScoreInput(format!(
                "elapsed time must be a non-negative number of seconds, got {}",
                self.elapsed_secs
            )));
        }
        Ok(())
    }
}
