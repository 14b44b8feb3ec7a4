//! `PostgreSQL` implementation of the `ProgressRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use cloudsolver_core::error::DomainError;
use cloudsolver_core::repository::{ProgressRepository, ScoreStanding, StoredProgress};

use crate::schema::CREATE_PLAYER_PROGRESS_TABLE;

/// PostgreSQL-backed progress repository. Each player has one row holding
/// the latest snapshot as JSONB.
#[derive(Debug, Clone)]
pub struct PgProgressRepository {
    pool: PgPool,
}

fn unavailable(err: sqlx::Error) -> DomainError {
    DomainError::PersistenceUnavailable(err.to_string())
}

/// `total_score` of the row's snapshot, zero when absent or not an integer.
const TOTAL_SCORE: &str = "CASE WHEN jsonb_typeof(snapshot->'total_score') = 'number' \
     THEN GREATEST((snapshot->>'total_score')::numeric::bigint, 0) ELSE 0 END";

impl PgProgressRepository {
    /// Creates a new `PgProgressRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the progress table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PersistenceUnavailable` if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(CREATE_PLAYER_PROGRESS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for PgProgressRepository {
    async fn load(&self, player_id: Uuid) -> Result<Option<StoredProgress>, DomainError> {
        let row: Option<(Uuid, serde_json::Value, DateTime<Utc>)> = sqlx::query_as(
            "SELECT player_id, snapshot, saved_at FROM player_progress WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(row.map(|(player_id, snapshot, saved_at)| StoredProgress {
            player_id,
            snapshot,
            saved_at,
        }))
    }

    async fn save(&self, progress: &StoredProgress) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO player_progress (player_id, snapshot, saved_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (player_id) DO UPDATE SET \
                 snapshot = EXCLUDED.snapshot, saved_at = EXCLUDED.saved_at",
        )
        .bind(progress.player_id)
        .bind(&progress.snapshot)
        .bind(progress.saved_at)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        debug!(player_id = %progress.player_id, "progress saved");
        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> Result<Vec<StoredProgress>, DomainError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let sql = format!(
            "SELECT player_id, snapshot, saved_at FROM player_progress \
             ORDER BY {TOTAL_SCORE} DESC, player_id LIMIT $1"
        );
        let rows: Vec<(Uuid, serde_json::Value, DateTime<Utc>)> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(rows
            .into_iter()
            .map(|(player_id, snapshot, saved_at)| StoredProgress {
                player_id,
                snapshot,
                saved_at,
            })
            .collect())
    }

    async fn standing(&self, total_score: u64) -> Result<ScoreStanding, DomainError> {
        let score = i64::try_from(total_score).unwrap_or(i64::MAX);
        let sql = format!(
            "SELECT COUNT(*) FILTER (WHERE {TOTAL_SCORE} > $1), COUNT(*) FROM player_progress"
        );
        let (higher, participants): (i64, i64) = sqlx::query_as(&sql)
            .bind(score)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(ScoreStanding {
            higher_scores: u64::try_from(higher).unwrap_or(0),
            participants: u64::try_from(participants).unwrap_or(0),
        })
    }
}
