//! Query handlers for game content.
//!
//! These return read-only views that are safe to hand to a player: question
//! cards never carry the correct option or the explanation.

use cloudsolver_core::error::DomainError;
use cloudsolver_core::rng::DeterministicRng;
use cloudsolver_scoring::domain::question::{AnswerOption, Difficulty, Question};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::npc::{NpcProfile, Personality};
use crate::domain::questions::{QuestionFilters, QuestionMode, QuestionProvider};
use crate::domain::roster::NpcRoster;

/// Public summary of an NPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NpcSummary {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Job title.
    pub title: String,
    /// Personality tag.
    pub personality: Personality,
    /// Categories the NPC asks about.
    pub expertise: Vec<String>,
}

impl From<&NpcProfile> for NpcSummary {
    fn from(npc: &NpcProfile) -> Self {
        Self {
            id: npc.id.clone(),
            name: npc.name.clone(),
            title: npc.title.clone(),
            personality: npc.personality,
            expertise: npc.expertise.clone(),
        }
    }
}

/// A question as shown to the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionCard {
    /// Identifier.
    pub id: String,
    /// Category.
    pub category: String,
    /// Difficulty.
    pub difficulty: Difficulty,
    /// Base points.
    pub base_points: u32,
    /// Time limit in seconds.
    pub time_limit_secs: u32,
    /// Scenario text.
    pub scenario: String,
    /// Prompt text.
    pub prompt: String,
    /// Answer options.
    pub options: Vec<AnswerOption>,
    /// Tags.
    pub tags: Vec<String>,
}

impl From<&Question> for QuestionCard {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            category: q.category.clone(),
            difficulty: q.difficulty,
            base_points: q.base_points,
            time_limit_secs: q.time_limit_secs,
            scenario: q.scenario.clone(),
            prompt: q.prompt.clone(),
            options: q.options.clone(),
            tags: q.tags.clone(),
        }
    }
}

/// Lists every NPC in roster order.
#[must_use]
pub fn list_npcs(roster: &NpcRoster) -> Vec<NpcSummary> {
    roster.iter().map(NpcSummary::from).collect()
}

/// Picks the next question and returns its player-facing card.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no question passes `filters`.
#[instrument(skip_all, fields(mode = ?mode))]
pub fn next_question(
    provider: &dyn QuestionProvider,
    mode: QuestionMode,
    filters: &QuestionFilters,
    rng: &mut dyn DeterministicRng,
) -> Result<QuestionCard, DomainError> {
    let question = provider.get_question(mode, filters, rng)?;
    debug!(question_id = %question.id, "question selected");
    Ok(QuestionCard::from(&question))
}
