//! Command handlers for the progression context.
//!
//! Handlers orchestrate the domain: load the player's snapshot, score the
//! answer, apply it to the progression state, persist the new snapshot.

use cloudsolver_core::clock::Clock;
use cloudsolver_core::command::Command;
use cloudsolver_core::error::DomainError;
use cloudsolver_core::repository::{ProgressRepository, StoredProgress};
use cloudsolver_scoring::domain::calculator::ScoreCalculator;
use cloudsolver_scoring::domain::question::Question;
use cloudsolver_scoring::domain::score::ScoreResult;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::commands::SubmitAnswer;
use crate::domain::state::{ProgressionState, ScoreApplication};

/// Outcome of [`handle_submit_answer`].
#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerResult {
    /// The player who answered.
    pub player_id: Uuid,
    /// The score breakdown.
    pub score: ScoreResult,
    /// Level and achievement changes.
    pub application: ScoreApplication,
    /// Progression after the answer.
    #[serde(skip)]
    pub state: ProgressionState,
    /// Whether the new snapshot reached the store.
    pub persisted: bool,
}

/// Loads a player's progression, defaulting to a fresh state when the player
/// has never been saved.
///
/// # Errors
///
/// Returns the repository's error if loading fails, or
/// `DomainError::Infrastructure` if the stored snapshot cannot be decoded.
pub async fn load_progression(
    player_id: Uuid,
    repo: &dyn ProgressRepository,
) -> Result<ProgressionState, DomainError> {
    match repo.load(player_id).await? {
        Some(stored) => ProgressionState::from_snapshot(stored.snapshot),
        None => Ok(ProgressionState::new()),
    }
}

/// Handles the `SubmitAnswer` command.
///
/// A failed save is logged and reported through
/// [`SubmitAnswerResult::persisted`]; the in-memory result stands.
///
/// # Errors
///
/// Returns `DomainError::InvalidScoreInput` for a malformed question or
/// submission, or the repository's error if the snapshot cannot be loaded.
/// Nothing is computed or saved in either case.
#[instrument(
    skip_all,
    fields(
        correlation_id = %command.correlation_id(),
        player_id = %command.player_id(),
        question_id = %question.id,
    )
)]
pub async fn handle_submit_answer(
    command: &SubmitAnswer,
    question: &Question,
    clock: &dyn Clock,
    repo: &dyn ProgressRepository,
) -> Result<SubmitAnswerResult, DomainError> {
    let mut state = load_progression(command.player_id, repo).await?;

    let score = ScoreCalculator::compute(question, &command.submission)?;
    let application = state.apply_score(question, &score)?;

    let stored = StoredProgress {
        player_id: command.player_id,
        snapshot: state.to_snapshot(),
        saved_at: clock.now(),
    };
    let persisted = match repo.save(&stored).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "progression snapshot was not persisted");
            false
        }
    };

    info!(
        command_type = command.command_type(),
        is_correct = score.is_correct,
        total_points = score.total_points,
        level = application.new_level,
        leveled_up = application.leveled_up,
        persisted,
        "answer submitted"
    );

    Ok(SubmitAnswerResult {
        player_id: command.player_id,
        score,
        application,
        state,
        persisted,
    })
}
