//! Question model.
//!
//! Questions are owned by the content collaborator; this crate only reads
//! them.

use std::fmt;
use std::str::FromStr;

use cloudsolver_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Question difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Multiplier 1.
    Easy,
    /// Multiplier 1.5.
    Medium,
    /// Multiplier 2.
    Hard,
}

impl Difficulty {
    /// All tiers in ascending order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Score multiplier applied to a question's base points.
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Medium => 1.5,
            Self::Hard => 2.0,
        }
    }

    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(DomainError::Validation(format!(
                "unknown difficulty '{other}'"
            ))),
        }
    }
}

/// A selectable answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Option identifier (e.g. `a`, `b`).
    pub id: String,
    /// Display text.
    pub text: String,
}

/// A multiple-choice scenario question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier.
    pub id: String,
    /// Service category (e.g. `EC2`, `S3`, `Lambda`).
    pub category: String,
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// Points awarded before multipliers and modifiers.
    pub base_points: u32,
    /// Seconds the player has to answer.
    pub time_limit_secs: u32,
    /// Identifier of the correct option.
    pub correct_option: String,
    /// Explanation shown after answering.
    #[serde(default)]
    pub explanation: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Scenario description the NPC frames the question with.
    #[serde(default)]
    pub scenario: String,
    /// The question prompt.
    #[serde(default)]
    pub prompt: String,
    /// Answer options. May be empty when the caller only needs scoring.
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Checks that the question can be scored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScoreInput` if the identifier, category or
    /// correct option is blank, the time limit is zero, or the options list is
    /// non-empty and does not contain the correct option.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidScoreInput(
                "question id must not be blank".to_owned(),
            ));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::InvalidScoreInput(format!(
                "question {} has a blank category",
                self.id
            )));
        }
        if self.time_limit_secs == 0 {
            return Err(DomainError::InvalidScoreInput(format!(
                "question {} has a zero time limit",
                self.id
            )));
        }
        if self.correct_option.trim().is_empty() {
            return Err(DomainError::InvalidScoreInput(format!(
                "question {} has no correct option",
                self.id
            )));
        }
        if !self.options.is_empty() && !self.options.iter().any(|o| o.id == self.correct_option) {
            return Err(DomainError::InvalidScoreInput(format!(
                "question {} lists no option '{}'",
                self.id, self.correct_option
            )));
        }
        Ok(())
    }

    /// Base points times the difficulty multiplier, floored.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn weighted_points(&self) -> u32 {
        (f64::from(self.base_points) * self.difficulty.multiplier()).floor() as u32
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Difficulty, Question};

    /// The medium, 100-point, 60-second question used across scoring tests.
    pub(crate) fn medium_question() -> Question {
        Question {
            id: "q-ec2-001".to_owned(),
            category: "EC2".to_owned(),
            difficulty: Difficulty::Medium,
            base_points: 100,
            time_limit_secs: 60,
            correct_option: "b".to_owned(),
            explanation: "An Auto Scaling group behind a load balancer absorbs the spike."
                .to_owned(),
            tags: vec!["scaling".to_owned()],
            scenario: "Traffic to a single instance has tripled overnight.".to_owned(),
            prompt: "What is the most appropriate fix?".to_owned(),
            options: Vec::new(),
        }
    }
}
