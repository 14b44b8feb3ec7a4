//! Routes for the score leaderboard.

use axum::extract::{Path, Query, State};
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use cloudsolver_core::error::DomainError;
use cloudsolver_progression::application::leaderboard::{
    self, LeaderboardEntry, LeaderboardStats, PlayerStanding,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Rows returned when no `limit` is given.
pub const DEFAULT_LIMIT: usize = 10;

/// Largest accepted `limit`.
pub const MAX_LIMIT: usize = 100;

/// Query string for GET /api/v1/leaderboard.
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    /// Rows to return, `1..=MAX_LIMIT`.
    pub limit: Option<usize>,
}

/// GET /
#[instrument(skip(state))]
async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(DomainError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}, got {limit}"
        ))
        .into());
    }
    let board = leaderboard::get_leaderboard(limit, &*state.progress_repository).await?;
    Ok(Json(board))
}

/// GET /stats
#[instrument(skip(state))]
async fn get_stats(State(state): State<AppState>) -> Result<Json<LeaderboardStats>, ApiError> {
    let stats = leaderboard::get_leaderboard_stats(&*state.progress_repository).await?;
    Ok(Json(stats))
}

/// GET /players/{player_id}
///
/// A player who has never answered anything is `404`.
#[instrument(skip(state))]
async fn get_player_standing(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<PlayerStanding>, ApiError> {
    let standing =
        leaderboard::get_player_standing(player_id, &*state.progress_repository).await?;
    Ok(Json(standing))
}

/// Returns the router for the leaderboard.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_leaderboard))
        .route("/stats", get(get_stats))
        .route("/players/{player_id}", get(get_player_standing))
}
