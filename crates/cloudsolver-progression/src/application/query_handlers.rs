//! Query handlers for the progression context.

use std::collections::BTreeMap;

use cloudsolver_core::error::DomainError;
use cloudsolver_core::repository::ProgressRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::levels::{next_level_threshold, rank_for_level};
use crate::domain::state::ProgressionState;

/// An unlocked achievement with its display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementView {
    /// Wire identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display description.
    pub description: &'static str,
}

/// Read-only view of a player's progression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionView {
    /// The player.
    pub player_id: Uuid,
    /// Current level.
    pub level: u32,
    /// Rank title for the level.
    pub rank: &'static str,
    /// Cumulative experience.
    pub experience: u64,
    /// Experience needed for the next level, `None` at the cap.
    pub next_level_experience: Option<u64>,
    /// Cumulative score.
    pub total_score: u64,
    /// Current streak.
    pub current_streak: u32,
    /// Longest streak.
    pub max_streak: u32,
    /// Questions answered.
    pub questions_answered: u32,
    /// Correct answers.
    pub correct_answers: u32,
    /// Whole-number accuracy.
    pub accuracy_percent: u32,
    /// Correct answers per category.
    pub per_category_correct: BTreeMap<String, u32>,
    /// Unlocked achievements in unlock order.
    pub achievements: Vec<AchievementView>,
}

impl ProgressionView {
    /// Builds the view for `state`.
    #[must_use]
    pub fn from_state(player_id: Uuid, state: &ProgressionState) -> Self {
        Self {
            player_id,
            level: state.level(),
            rank: rank_for_level(state.level()),
            experience: state.experience(),
            next_level_experience: next_level_threshold(state.level()),
            total_score: state.total_score(),
            current_streak: state.current_streak(),
            max_streak: state.max_streak(),
            questions_answered: state.questions_answered(),
            correct_answers: state.correct_answers(),
            accuracy_percent: state.accuracy_percent(),
            per_category_correct: state.per_category_correct().clone(),
            achievements: state
                .unlocked_achievements()
                .iter()
                .map(|id| {
                    let def = id.definition();
                    AchievementView {
                        id: id.as_str(),
                        name: def.name,
                        description: def.description,
                    }
                })
                .collect(),
        }
    }
}

/// Retrieves a player's progression.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the player has no stored snapshot,
/// the repository's error if loading fails, or `DomainError::Infrastructure`
/// if the snapshot cannot be decoded.
pub async fn get_progression(
    player_id: Uuid,
    repo: &dyn ProgressRepository,
) -> Result<ProgressionView, DomainError> {
    let stored = repo
        .load(player_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("progression for player {player_id}")))?;
    let state = ProgressionState::from_snapshot(stored.snapshot)?;
    Ok(ProgressionView::from_state(player_id, &state))
}

#[cfg(test)]
mod tests {
    use cloudsolver_core::error::DomainError;
    use uuid::Uuid;

    use crate::application::query_handlers::get_progression;
    use crate::domain::achievements::AchievementId;
    use crate::domain::state::{ProgressionSnapshot, ProgressionState};
    use cloudsolver_test_support::{EmptyProgressRepository, RecordingProgressRepository};

    #[tokio::test]
    async fn test_get_progression_returns_view_for_saved_player() {
        // Arrange
        let player_id = Uuid::new_v4();
        let state = ProgressionState::restore(ProgressionSnapshot {
            experience: 650,
            total_score: 650,
            current_streak: 1,
            max_streak: 4,
            questions_answered: 8,
            correct_answers: 6,
            unlocked_achievements: vec![AchievementId::FirstCorrect],
            ..ProgressionSnapshot::default()
        })
        .unwrap();
        let repo = RecordingProgressRepository::with_snapshot(player_id, state.to_snapshot());

        // Act
        let view = get_progression(player_id, &repo).await.unwrap();

        // Assert
        assert_eq!(view.player_id, player_id);
        assert_eq!(view.level, 4);
        assert_eq!(view.rank, "Solutions Architect");
        assert_eq!(view.next_level_experience, Some(1_000));
        assert_eq!(view.accuracy_percent, 75);
        assert_eq!(view.achievements.len(), 1);
        assert_eq!(view.achievements[0].id, "first_correct");
        assert_eq!(view.achievements[0].name, "First Steps");
    }

    #[tokio::test]
    async fn test_get_progression_returns_not_found_for_unknown_player() {
        // Arrange
        let repo = EmptyProgressRepository;

        // Act
        let result = get_progression(Uuid::new_v4(), &repo).await;

        // Assert
        match result.unwrap_err() {
            DomainError::NotFound(msg) => assert!(msg.contains("progression")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
