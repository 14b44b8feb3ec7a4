//! Routes for hints.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use serde::Deserialize;
use tracing::instrument;

use cloudsolver_hints::domain::hint::Hint;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/v1/hints.
#[derive(Debug, Deserialize)]
pub struct HintRequest {
    /// The question the player is stuck on.
    pub question_id: String,
    /// The NPC giving the hint.
    pub npc_id: String,
    /// 1 (gentle) to 3 (explicit). Out-of-range values are clamped.
    #[serde(default = "default_hint_level")]
    pub hint_level: u8,
}

fn default_hint_level() -> u8 {
    1
}

/// POST /
///
/// Always answers with a hint once the question and NPC are known; a failing
/// advisory service only changes the hint's `source`.
#[instrument(
    skip(state, request),
    fields(question_id = %request.question_id, npc_id = %request.npc_id)
)]
async fn request_hint(
    State(state): State<AppState>,
    Json(request): Json<HintRequest>,
) -> Result<Json<Hint>, ApiError> {
    let question = state.questions.get_by_id(&request.question_id)?;
    state.roster.require(&request.npc_id)?;
    let hint = state
        .hint_resolver
        .resolve(&question, &request.npc_id, request.hint_level)
        .await;
    Ok(Json(hint))
}

/// Returns the router for hints.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(request_hint))
}
