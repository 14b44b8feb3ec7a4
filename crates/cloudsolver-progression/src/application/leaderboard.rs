//! Leaderboard queries over every stored progression snapshot.

use cloudsolver_core::error::DomainError;
use cloudsolver_core::repository::{ProgressRepository, StoredProgress};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::domain::levels::rank_for_level;
use crate::domain::state::ProgressionState;

/// Players shown in [`LeaderboardStats::top_players`].
pub const STATS_TOP_PLAYERS: usize = 5;

/// Score ranges for [`LeaderboardStats::score_distribution`].
const SCORE_BUCKETS: [(&str, u64, u64); 5] = [
    ("0-999", 0, 999),
    ("1000-2499", 1_000, 2_499),
    ("2500-4999", 2_500, 4_999),
    ("5000-9999", 5_000, 9_999),
    ("10000+", 10_000, u64::MAX),
];

/// Level ranges for [`LeaderboardStats::level_distribution`].
const LEVEL_BUCKETS: [(&str, u32, u32); 5] = [
    ("1-3", 1, 3),
    ("4-6", 4, 6),
    ("7-9", 7, 9),
    ("10-12", 10, 12),
    ("13+", 13, u32::MAX),
];

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub position: u64,
    /// The player.
    pub player_id: Uuid,
    /// Current level.
    pub level: u32,
    /// Rank title for the level.
    pub rank: &'static str,
    /// Cumulative score.
    pub total_score: u64,
    /// Whole-number accuracy.
    pub accuracy_percent: u32,
    /// Questions answered.
    pub questions_answered: u32,
}

/// Where one player sits among everyone stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStanding {
    /// The player.
    pub player_id: Uuid,
    /// One more than the number of players with a strictly higher score.
    pub position: u64,
    /// Players stored in total.
    pub total_participants: u64,
    /// Share of players at or below this one, rounded to one decimal.
    pub percentile: f64,
    /// Cumulative score.
    pub total_score: u64,
    /// Current level.
    pub level: u32,
    /// Whole-number accuracy.
    pub accuracy_percent: u32,
}

/// Player count for one score or level range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionBucket {
    /// Range label, e.g. `"1000-2499"`.
    pub range: &'static str,
    /// Players in the range.
    pub count: u64,
}

/// Aggregates over every stored player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardStats {
    /// Players counted.
    pub total_participants: u64,
    /// Mean score, rounded to one decimal.
    pub average_score: f64,
    /// Best score, zero when nobody has played.
    pub highest_score: u64,
    /// Worst score, zero when nobody has played.
    pub lowest_score: u64,
    /// Mean level, rounded to one decimal.
    pub average_level: f64,
    /// Mean accuracy, rounded to one decimal.
    pub average_accuracy: f64,
    /// Players per score range.
    pub score_distribution: Vec<DistributionBucket>,
    /// Players per level range.
    pub level_distribution: Vec<DistributionBucket>,
    /// The first few leaderboard rows.
    pub top_players: Vec<LeaderboardEntry>,
}

#[allow(clippy::cast_precision_loss)]
fn mean(sum: u64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_to_tenth(sum as f64 / count as f64)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Decodes stored snapshots, skipping any that no longer decode.
fn decode(rows: Vec<StoredProgress>) -> Vec<(Uuid, ProgressionState)> {
    rows.into_iter()
        .filter_map(|stored| match ProgressionState::from_snapshot(stored.snapshot) {
            Ok(state) => Some((stored.player_id, state)),
            Err(e) => {
                warn!(player_id = %stored.player_id, error = %e, "skipping unreadable snapshot");
                None
            }
        })
        .collect()
}

fn entries(players: &[(Uuid, ProgressionState)]) -> Vec<LeaderboardEntry> {
    players
        .iter()
        .zip(1_u64..)
        .map(|((player_id, state), position)| LeaderboardEntry {
            position,
            player_id: *player_id,
            level: state.level(),
            rank: rank_for_level(state.level()),
            total_score: state.total_score(),
            accuracy_percent: state.accuracy_percent(),
            questions_answered: state.questions_answered(),
        })
        .collect()
}

/// The `limit` highest-scoring players, best first.
///
/// # Errors
///
/// Returns the repository's error if the ranking query fails.
pub async fn get_leaderboard(
    limit: usize,
    repo: &dyn ProgressRepository,
) -> Result<Vec<LeaderboardEntry>, DomainError> {
    let players = decode(repo.top_scores(limit).await?);
    Ok(entries(&players))
}

/// Where `player_id` ranks by total score.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the player has no stored snapshot,
/// `DomainError::Infrastructure` if it cannot be decoded, or the
/// repository's error.
pub async fn get_player_standing(
    player_id: Uuid,
    repo: &dyn ProgressRepository,
) -> Result<PlayerStanding, DomainError> {
    let stored = repo
        .load(player_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("progression for player {player_id}")))?;
    let state = ProgressionState::from_snapshot(stored.snapshot)?;
    let standing = repo.standing(state.total_score()).await?;

    let position = standing.higher_scores + 1;
    let total_participants = standing.participants.max(position);
    let percentile = mean((total_participants - position + 1) * 100, total_participants);
    Ok(PlayerStanding {
        player_id,
        position,
        total_participants,
        percentile,
        total_score: state.total_score(),
        level: state.level(),
        accuracy_percent: state.accuracy_percent(),
    })
}

/// Aggregate statistics over every stored player.
///
/// # Errors
///
/// Returns the repository's error if the ranking query fails.
pub async fn get_leaderboard_stats(
    repo: &dyn ProgressRepository,
) -> Result<LeaderboardStats, DomainError> {
    let players = decode(repo.top_scores(usize::MAX).await?);
    let count = players.len() as u64;
    let scores: Vec<u64> = players.iter().map(|(_, s)| s.total_score()).collect();

    let score_distribution = SCORE_BUCKETS
        .iter()
        .map(|&(range, low, high)| DistributionBucket {
            range,
            count: scores.iter().filter(|&&s| (low..=high).contains(&s)).count() as u64,
        })
        .collect();
    let level_distribution = LEVEL_BUCKETS
        .iter()
        .map(|&(range, low, high)| DistributionBucket {
            range,
            count: players
                .iter()
                .filter(|(_, s)| (low..=high).contains(&s.level()))
                .count() as u64,
        })
        .collect();

    let mut top_players = entries(&players);
    top_players.truncate(STATS_TOP_PLAYERS);

    Ok(LeaderboardStats {
        total_participants: count,
        average_score: mean(scores.iter().sum(), count),
        highest_score: scores.iter().copied().max().unwrap_or(0),
        lowest_score: scores.iter().copied().min().unwrap_or(0),
        average_level: mean(players.iter().map(|(_, s)| u64::from(s.level())).sum(), count),
        average_accuracy: mean(
            players.iter().map(|(_, s)| u64::from(s.accuracy_percent())).sum(),
            count,
        ),
        score_distribution,
        level_distribution,
        top_players,
    })
}

#[cfg(test)]
mod tests {
    use cloudsolver_core::error::DomainError;
    use cloudsolver_test_support::{
        EmptyProgressRepository, FailingProgressRepository, RecordingProgressRepository,
    };
    use uuid::Uuid;

    use super::*;
    use crate::domain::state::ProgressionSnapshot;

    fn snapshot(total_score: u64, answered: u32, correct: u32) -> serde_json::Value {
        ProgressionState::restore(ProgressionSnapshot {
            experience: total_score,
            total_score,
            questions_answered: answered,
            correct_answers: correct,
            ..ProgressionSnapshot::default()
        })
        .unwrap()
        .to_snapshot()
    }

    async fn seeded(scores: &[u64]) -> (RecordingProgressRepository, Vec<Uuid>) {
        let repo = RecordingProgressRepository::new();
        let mut ids = Vec::new();
        for &score in scores {
            let player_id = Uuid::new_v4();
            let stored = StoredProgress {
                player_id,
                snapshot: snapshot(score, 10, 8),
                saved_at: chrono::Utc::now(),
            };
            repo.save(&stored).await.unwrap();
            ids.push(player_id);
        }
        (repo, ids)
    }

    #[tokio::test]
    async fn test_get_leaderboard_orders_best_first() {
        // Arrange
        let (repo, ids) = seeded(&[300, 12_000, 2_600]).await;

        // Act
        let board = get_leaderboard(10, &repo).await.unwrap();

        // Assert
        let order: Vec<Uuid> = board.iter().map(|e| e.player_id).collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0]]);
        assert_eq!(board[0].position, 1);
        assert_eq!(board[0].total_score, 12_000);
        assert_eq!(board[2].position, 3);
        assert_eq!(board[2].accuracy_percent, 80);
    }

    #[tokio::test]
    async fn test_get_leaderboard_skips_unreadable_snapshots() {
        let (repo, _) = seeded(&[500]).await;
        repo.save(&StoredProgress {
            player_id: Uuid::new_v4(),
            snapshot: serde_json::json!({"total_score": 9_000, "level": "high"}),
            saved_at: chrono::Utc::now(),
        })
        .await
        .unwrap();

        let board = get_leaderboard(10, &repo).await.unwrap();

        assert_eq!(board.len(), 1);
        assert_eq!(board[0].total_score, 500);
    }

    #[tokio::test]
    async fn test_player_standing_counts_higher_scores() {
        // Arrange
        let (repo, ids) = seeded(&[100, 900, 400, 400]).await;

        // Act
        let standing = get_player_standing(ids[2], &repo).await.unwrap();

        // Assert
        assert_eq!(standing.position, 2);
        assert_eq!(standing.total_participants, 4);
        assert!((standing.percentile - 75.0).abs() < f64::EPSILON);
        assert_eq!(standing.total_score, 400);
    }

    #[tokio::test]
    async fn test_player_standing_for_unknown_player_is_not_found() {
        let result = get_player_standing(Uuid::new_v4(), &EmptyProgressRepository).await;

        match result.unwrap_err() {
            DomainError::NotFound(_) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stats_aggregate_every_player() {
        // Arrange
        let (repo, _) = seeded(&[500, 1_500, 3_000, 7_000, 12_000, 20_000]).await;

        // Act
        let stats = get_leaderboard_stats(&repo).await.unwrap();

        // Assert
        assert_eq!(stats.total_participants, 6);
        assert!((stats.average_score - 7_333.3).abs() < 1e-9);
        assert_eq!(stats.highest_score, 20_000);
        assert_eq!(stats.lowest_score, 500);
        assert!((stats.average_accuracy - 80.0).abs() < f64::EPSILON);
        let counts: Vec<u64> = stats.score_distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1, 2]);
        let levels: u64 = stats.level_distribution.iter().map(|b| b.count).sum();
        assert_eq!(levels, 6);
        assert_eq!(stats.top_players.len(), STATS_TOP_PLAYERS);
        assert_eq!(stats.top_players[0].total_score, 20_000);
    }

    #[tokio::test]
    async fn test_stats_with_no_players_are_zero() {
        let stats = get_leaderboard_stats(&EmptyProgressRepository).await.unwrap();

        assert_eq!(stats.total_participants, 0);
        assert!(stats.average_score.abs() < f64::EPSILON);
        assert_eq!(stats.highest_score, 0);
        assert!(stats.top_players.is_empty());
    }

    #[tokio::test]
    async fn test_leaderboard_propagates_store_outage() {
        let result = get_leaderboard(10, &FailingProgressRepository).await;

        match result.unwrap_err() {
            DomainError::PersistenceUnavailable(_) => {}
            other => panic!("expected PersistenceUnavailable, got {other:?}"),
        }
    }
}
