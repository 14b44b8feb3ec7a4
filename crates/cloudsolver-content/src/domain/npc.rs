//! NPC profiles and personalities.

use std::fmt;

use cloudsolver_core::error::DomainError;
use cloudsolver_scoring::domain::question::Difficulty;
use serde::{Deserialize, Serialize};

/// Placeholder substituted with the hint body in hint templates.
pub const HINT_PLACEHOLDER: &str = "{hint}";

/// Personality tag driving reaction and hint phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    /// Fast-paced, business minded.
    Energetic,
    /// Methodical, data driven.
    Analytical,
    /// Security and compliance first.
    Cautious,
    /// Eager to learn.
    Curious,
}

impl Personality {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Energetic => "energetic",
            Self::Analytical => "analytical",
            Self::Cautious => "cautious",
            Self::Curious => "curious",
        }
    }

    /// Phrase prepended to an answer reaction.
    #[must_use]
    pub fn reaction_modifier(self, is_correct: bool) -> &'static str {
        match (self, is_correct) {
            (Self::Energetic, true) => "Fantastic!",
            (Self::Energetic, false) => "Whoa, hold on!",
            (Self::Analytical, true) => "The numbers check out.",
            (Self::Analytical, false) => "Let me re-check the figures...",
            (Self::Cautious, true) => "Good, that's safe.",
            (Self::Cautious, false) => "Careful now.",
            (Self::Curious, true) => "Wow!",
            (Self::Curious, false) => "Hmm, interesting...",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-player character who frames questions and reacts to answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcProfile {
    /// Stable identifier (e.g. `alex_ceo`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Job title.
    pub title: String,
    /// Personality tag.
    pub personality: Personality,
    /// Categories the NPC asks about.
    #[serde(default)]
    pub expertise: Vec<String>,
    /// Difficulties the NPC prefers.
    #[serde(default)]
    pub preferred_difficulties: Vec<Difficulty>,
    /// Greeting lines, shown in order.
    pub greeting: Vec<String>,
    /// Reaction pool for correct answers.
    pub correct_responses: Vec<String>,
    /// Reaction pool for incorrect answers.
    pub incorrect_responses: Vec<String>,
    /// Hint phrasing templates, each containing [`HINT_PLACEHOLDER`].
    pub hint_templates: Vec<String>,
}

impl NpcProfile {
    /// The reaction pool for an answer.
    #[must_use]
    pub fn responses(&self, is_correct: bool) -> &[String] {
        if is_correct {
            &self.correct_responses
        } else {
            &self.incorrect_responses
        }
    }

    /// Checks that the profile can drive a full dialogue.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the id or name is blank, any
    /// line pool is empty, or a hint template lacks the placeholder.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::Validation("npc id must not be blank".into()));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation(format!(
                "npc {} has a blank name",
                self.id
            )));
        }
        for (pool, lines) in [
            ("greeting", &self.greeting),
            ("correct_responses", &self.correct_responses),
            ("incorrect_responses", &self.incorrect_responses),
            ("hint_templates", &self.hint_templates),
        ] {
            if lines.is_empty() || lines.iter().any(|l| l.trim().is_empty()) {
                return Err(DomainError::Validation(format!(
                    "npc {} has an empty or blank entry in {pool}",
                    self.id
                )));
            }
        }
        if let Some(bad) = self
            .hint_templates
            .iter()
            .find(|t| !t.contains(HINT_PLACEHOLDER))
        {
            return Err(DomainError::Validation(format!(
                "npc {} hint template '{bad}' lacks {HINT_PLACEHOLDER}",
                self.id
            )));
        }
        Ok(())
    }
}

/// Substitutes `hint` into `template`.
#[must_use]
pub fn apply_hint_template(template: &str, hint: &str) -> String {
    template.replace(HINT_PLACEHOLDER, hint)
}
