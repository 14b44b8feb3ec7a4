//! The question provider port and the built-in question bank.
//!
//! Selection is uniform over the questions that pass the filters. In
//! adaptive mode the pool is narrowed further by the player's level and
//! accuracy; a narrowing step that would leave nothing is skipped rather
//! than failing the request.

use std::collections::HashSet;

use cloudsolver_core::error::DomainError;
use cloudsolver_core::rng::{DeterministicRng, choose_index};
use cloudsolver_scoring::domain::question::{Difficulty, Question};
use serde::Deserialize;
use tracing::debug;

use super::npc::NpcProfile;

const BUILTIN_QUESTIONS: &str = include_str!("../../data/questions.yaml");

/// How the next question is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionMode {
    /// Uniformly among the filtered questions.
    Random,
    /// Matched to the player's level and accuracy.
    Adaptive {
        /// Player level.
        level: u32,
        /// Whole-number accuracy.
        accuracy_percent: u32,
    },
}

/// Difficulty and categories suited to a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveRecommendation {
    /// Suggested difficulty.
    pub difficulty: Difficulty,
    /// Suggested categories, widest set last unlocked.
    pub categories: Vec<&'static str>,
}

impl AdaptiveRecommendation {
    /// Accuracy of 80 or more suggests hard questions, 60 or more medium,
    /// anything else easy. Levels 1-3 stay on EC2 and S3, levels 4-6 add RDS
    /// and VPC, later levels add Lambda and IAM.
    #[must_use]
    pub fn for_player(level: u32, accuracy_percent: u32) -> Self {
        let difficulty = match accuracy_percent {
            80.. => Difficulty::Hard,
            60..=79 => Difficulty::Medium,
            _ => Difficulty::Easy,
        };
        let categories = match level {
            0..=3 => vec!["EC2", "S3"],
            4..=6 => vec!["EC2", "S3", "RDS", "VPC"],
            _ => vec!["EC2", "S3", "RDS", "VPC", "LAMBDA", "IAM"],
        };
        Self {
            difficulty,
            categories,
        }
    }
}

/// Restrictions on which questions may be picked. Empty lists mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilters {
    /// Allowed categories, matched case-insensitively.
    pub categories: Vec<String>,
    /// Allowed difficulties.
    pub difficulties: Vec<Difficulty>,
    /// Question ids to skip, typically recently asked ones.
    pub exclude_ids: Vec<String>,
}

impl QuestionFilters {
    /// Filters matching an NPC's expertise and preferred difficulties.
    #[must_use]
    pub fn for_npc(npc: &NpcProfile) -> Self {
        Self {
            categories: npc.expertise.clone(),
            difficulties: npc.preferred_difficulties.clone(),
            exclude_ids: Vec::new(),
        }
    }

    /// Adds an allowed category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Adds an allowed difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulties.push(difficulty);
        self
    }

    /// Excludes a question id.
    #[must_use]
    pub fn excluding(mut self, question_id: impl Into<String>) -> Self {
        self.exclude_ids.push(question_id.into());
        self
    }

    /// Whether `question` passes every restriction.
    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        let category_ok = self.categories.is_empty()
            || self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&question.category));
        let difficulty_ok =
            self.difficulties.is_empty() || self.difficulties.contains(&question.difficulty);
        let not_excluded = !self.exclude_ids.iter().any(|id| *id == question.id);
        category_ok && difficulty_ok && not_excluded
    }
}

/// Port to the question content collaborator.
pub trait QuestionProvider: Send + Sync {
    /// Picks a question.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no question passes `filters`.
    fn get_question(
        &self,
        mode: QuestionMode,
        filters: &QuestionFilters,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Question, DomainError>;

    /// Looks up a question by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown id.
    fn get_by_id(&self, question_id: &str) -> Result<Question, DomainError>;
}

#[derive(Debug, Deserialize)]
struct QuestionDocument {
    questions: Vec<Question>,
}

/// Question bank held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryQuestionBank {
    questions: Vec<Question>,
}

impl InMemoryQuestionBank {
    /// The question bank shipped with the game.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the embedded content is invalid.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_yaml(BUILTIN_QUESTIONS)
    }

    /// Parses and validates a document of the form `questions: [...]`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the YAML cannot be parsed or the
    /// questions fail validation.
    pub fn from_yaml(source: &str) -> Result<Self, DomainError> {
        let doc: QuestionDocument = serde_yaml::from_str(source).map_err(|e| {
            DomainError::Validation(format!("question bank is not valid YAML: {e}"))
        })?;
        Self::new(doc.questions)
    }

    /// Builds a bank from questions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a question has no options, cannot
    /// be scored, or shares its id with another question.
    pub fn new(questions: Vec<Question>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for question in &questions {
            question
                .validate()
                .map_err(|e| DomainError::Validation(e.to_string()))?;
            if question.options.is_empty() {
                return Err(DomainError::Validation(format!(
                    "question {} has no options",
                    question.id
                )));
            }
            if !seen.insert(question.id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "duplicate question id '{}'",
                    question.id
                )));
            }
        }
        debug!(count = questions.len(), "question bank loaded");
        Ok(Self { questions })
    }

    /// All questions in declaration order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

impl QuestionProvider for InMemoryQuestionBank {
    fn get_question(
        &self,
        mode: QuestionMode,
        filters: &QuestionFilters,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Question, DomainError> {
        let filtered: Vec<&Question> =
            self.questions.iter().filter(|q| filters.matches(q)).collect();

        let pool = match mode {
            QuestionMode::Random => filtered,
            QuestionMode::Adaptive {
                level,
                accuracy_percent,
            } => {
                let rec = AdaptiveRecommendation::for_player(level, accuracy_percent);
                let in_categories: Vec<&Question> = filtered
                    .iter()
                    .copied()
                    .filter(|q| {
                        rec.categories
                            .iter()
                            .any(|c| c.eq_ignore_ascii_case(&q.category))
                    })
                    .collect();
                let in_categories = if in_categories.is_empty() {
                    filtered
                } else {
                    in_categories
                };
                let at_difficulty: Vec<&Question> = in_categories
                    .iter()
                    .copied()
                    .filter(|q| q.difficulty == rec.difficulty)
                    .collect();
                if at_difficulty.is_empty() {
                    in_categories
                } else {
                    at_difficulty
                }
            }
        };

        let index = choose_index(rng, pool.len())
            .ok_or_else(|| DomainError::NotFound("no question matches the filters".into()))?;
        Ok(pool[index].clone())
    }

    fn get_by_id(&self, question_id: &str) -> Result<Question, DomainError> {
        self.questions
            .iter()
            .find(|q| q.id == question_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("question '{question_id}'")))
    }
}
