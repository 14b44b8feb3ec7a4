//! In-process progress repository.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use cloudsolver_core::error::DomainError;
use cloudsolver_core::repository::{
    ProgressRepository, ScoreStanding, StoredProgress, rank_by_total_score, snapshot_total_score,
};

/// Keeps snapshots in memory. Everything is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryProgressRepository {
    snapshots: RwLock<HashMap<Uuid, StoredProgress>>,
}

impl MemoryProgressRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> DomainError {
    DomainError::PersistenceUnavailable("in-memory store lock poisoned".to_owned())
}

#[async_trait]
impl ProgressRepository for MemoryProgressRepository {
    async fn load(&self, player_id: Uuid) -> Result<Option<StoredProgress>, DomainError> {
        let snapshots = self.snapshots.read().map_err(|_| poisoned())?;
        Ok(snapshots.get(&player_id).cloned())
    }

    async fn save(&self, progress: &StoredProgress) -> Result<(), DomainError> {
        let mut snapshots = self.snapshots.write().map_err(|_| poisoned())?;
        snapshots.insert(progress.player_id, progress.clone());
        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> Result<Vec<StoredProgress>, DomainError> {
        let snapshots = self.snapshots.read().map_err(|_| poisoned())?;
        let mut ranked: Vec<StoredProgress> = snapshots.values().cloned().collect();
        rank_by_total_score(&mut ranked);
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn standing(&self, total_score: u64) -> Result<ScoreStanding, DomainError> {
        let snapshots = self.snapshots.read().map_err(|_| poisoned())?;
        let higher_scores = snapshots
            .values()
            .filter(|stored| snapshot_total_score(&stored.snapshot) > total_score)
            .count();
        Ok(ScoreStanding {
            higher_scores: higher_scores as u64,
            participants: snapshots.len() as u64,
        })
    }
}
