//! Test repositories — mock `ProgressRepository` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cloudsolver_core::error::DomainError;
use cloudsolver_core::repository::{
    ProgressRepository, ScoreStanding, StoredProgress, rank_by_total_score, snapshot_total_score,
};
use uuid::Uuid;

/// A progress repository that keeps snapshots in memory and records every
/// successful `save`. Can be configured to reject every save.
#[derive(Debug, Default)]
pub struct RecordingProgressRepository {
    snapshots: Mutex<HashMap<Uuid, StoredProgress>>,
    saved: Mutex<Vec<StoredProgress>>,
    fail_saves: bool,
}

impl RecordingProgressRepository {
    /// Create an empty recording repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-seeded with one player's snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_snapshot(player_id: Uuid, snapshot: serde_json::Value) -> Self {
        let repo = Self::default();
        repo.snapshots.lock().unwrap().insert(
            player_id,
            StoredProgress {
                player_id,
                snapshot,
                saved_at: DateTime::<Utc>::UNIX_EPOCH,
            },
        );
        repo
    }

    /// Create a repository whose loads find nothing and whose saves fail with
    /// `DomainError::PersistenceUnavailable`.
    #[must_use]
    pub fn failing_saves() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Returns every successfully saved snapshot, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved(&self) -> Vec<StoredProgress> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressRepository for RecordingProgressRepository {
    async fn load(&self, player_id: Uuid) -> Result<Option<StoredProgress>, DomainError> {
        Ok(self.snapshots.lock().unwrap().get(&player_id).cloned())
    }

    async fn save(&self, progress: &StoredProgress) -> Result<(), DomainError> {
        if self.fail_saves {
            return Err(DomainError::PersistenceUnavailable(
                "write rejected".into(),
            ));
        }
        self.snapshots
            .lock()
            .unwrap()
            .insert(progress.player_id, progress.clone());
        self.saved.lock().unwrap().push(progress.clone());
        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> Result<Vec<StoredProgress>, DomainError> {
        let mut ranked: Vec<StoredProgress> =
            self.snapshots.lock().unwrap().values().cloned().collect();
        rank_by_total_score(&mut ranked);
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn standing(&self, total_score: u64) -> Result<ScoreStanding, DomainError> {
        let snapshots = self.snapshots.lock().unwrap();
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

/// A progress repository that never has a snapshot and silently accepts
/// saves. Useful for testing "player not found" scenarios.
#[derive(Debug)]
pub struct EmptyProgressRepository;

#[async_trait]
impl ProgressRepository for EmptyProgressRepository {
    async fn load(&self, _player_id: Uuid) -> Result<Option<StoredProgress>, DomainError> {
        Ok(None)
    }

    async fn save(&self, _progress: &StoredProgress) -> Result<(), DomainError> {
        Ok(())
    }

    async fn top_scores(&self, _limit: usize) -> Result<Vec<StoredProgress>, DomainError> {
        Ok(Vec::new())
    }

    async fn standing(&self, _total_score: u64) -> Result<ScoreStanding, DomainError> {
        Ok(ScoreStanding::default())
    }
}

/// A progress repository that always fails with
/// `DomainError::PersistenceUnavailable`.
#[derive(Debug)]
pub struct FailingProgressRepository;

#[async_trait]
impl ProgressRepository for FailingProgressRepository {
    async fn load(&self, _player_id: Uuid) -> Result<Option<StoredProgress>, DomainError> {
        Err(DomainError::PersistenceUnavailable(
            "connection refused".into(),
        ))
    }

    async fn save(&self, _progress: &StoredProgress) -> Result<(), DomainError> {
        Err(DomainError::PersistenceUnavailable(
            "connection refused".into(),
        ))
    }

    async fn top_scores(&self, _limit: usize) -> Result<Vec<StoredProgress>, DomainError> {
        Err(DomainError::PersistenceUnavailable(
            "connection refused".into(),
        ))
    }

    async fn standing(&self, _total_score: u64) -> Result<ScoreStanding, DomainError> {
        Err(DomainError::PersistenceUnavailable(
            "connection refused".into(),
        ))
    }
}
