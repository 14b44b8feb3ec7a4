//! Routes for NPCs.

use axum::extract::State;
use axum::{Json, Router, routing::get};

use cloudsolver_content::application::query_handlers::{self, NpcSummary};

use crate::state::AppState;

/// GET /
async fn list_npcs(State(state): State<AppState>) -> Json<Vec<NpcSummary>> {
    Json(query_handlers::list_npcs(&state.roster))
}

/// Returns the router for NPCs.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_npcs))
}
