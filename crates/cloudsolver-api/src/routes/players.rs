//! Routes for player progression.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::instrument;
use uuid::Uuid;

use cloudsolver_progression::application::query_handlers::{self, ProgressionView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{player_id}/progression
///
/// A player who has never answered anything is `404`.
#[instrument(skip(state))]
async fn get_progression(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<ProgressionView>, ApiError> {
    let view = query_handlers::get_progression(player_id, &*state.progress_repository).await?;
    Ok(Json(view))
}

/// Returns the router for players.
pub fn router() -> Router<AppState> {
    Router::new().route("/{player_id}/progression", get(get_progression))
}
