//! Progress repository abstraction.
//!
//! The engine treats persistence as a plain get/set of a player's progression
//! snapshot. No transactional guarantees are assumed beyond last-write-wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of a player's progression snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProgress {
    /// The player the snapshot belongs to.
    pub player_id: Uuid,
    /// Serialized progression snapshot.
    pub snapshot: serde_json::Value,
    /// When the snapshot was written.
    pub saved_at: DateTime<Utc>,
}

/// Repository trait for loading and saving progression snapshots.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the latest snapshot for a player, or `None` if the player has
    /// never been saved.
    async fn load(&self, player_id: Uuid) -> Result<Option<StoredProgress>, DomainError>;

    /// Save a snapshot, replacing any previous one for the same player.
    async fn save(&self, progress: &StoredProgress) -> Result<(), DomainError>;

    /// The `limit` highest-scoring snapshots, ordered by the snapshot's
    /// `total_score` descending and then by player id. A snapshot without a
    /// readable `total_score` counts as zero.
    async fn top_scores(&self, limit: usize) -> Result<Vec<StoredProgress>, DomainError>;

    /// How a `total_score` compares against every stored snapshot.
    async fn standing(&self, total_score: u64) -> Result<ScoreStanding, DomainError>;
}

/// Position of a score among all stored snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreStanding {
    /// Snapshots with a strictly higher `total_score`.
    pub higher_scores: u64,
    /// Snapshots stored in total.
    pub participants: u64,
}

/// Reads the `total_score` field of a stored snapshot, treating anything
/// missing or malformed as zero.
#[must_use]
pub fn snapshot_total_score(snapshot: &serde_json::Value) -> u64 {
    snapshot
        .get("total_score")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0)
}

/// Orders snapshots the way [`ProgressRepository::top_scores`] does.
pub fn rank_by_total_score(snapshots: &mut [StoredProgress]) {
    snapshots.sort_by(|a, b| {
        snapshot_total_score(&b.snapshot)
            .cmp(&snapshot_total_score(&a.snapshot))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use serde_json::json;

    use super::*;

    fn stored(player_id: Uuid, snapshot: serde_json::Value) -> StoredProgress {
        StoredProgress {
            player_id,
            snapshot,
            saved_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_rank_by_total_score_orders_descending_then_by_player() {
        // Arrange
        let low = Uuid::from_u128(1);
        let tied_a = Uuid::from_u128(2);
        let tied_b = Uuid::from_u128(3);
        let broken = Uuid::from_u128(4);
        let mut snapshots = vec![
            stored(tied_b, json!({"total_score": 800})),
            stored(broken, json!({"total_score": "lots"})),
            stored(low, json!({"total_score": 10})),
            stored(tied_a, json!({"total_score": 800})),
        ];

        // Act
        rank_by_total_score(&mut snapshots);

        // Assert
        let order: Vec<Uuid> = snapshots.iter().map(|s| s.player_id).collect();
        assert_eq!(order, vec![tied_a, tied_b, low, broken]);
    }

    #[test]
    fn test_snapshot_total_score_defaults_to_zero() {
        assert_eq!(snapshot_total_score(&json!({"total_score": 42})), 42);
        assert_eq!(snapshot_total_score(&json!({})), 0);
        assert_eq!(snapshot_total_score(&json!({"total_score": -5})), 0);
    }
}
