//! Routes for scoring answers.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use cloudsolver_progression::application::command_handlers::{self, SubmitAnswerResult};
use cloudsolver_progression::domain::commands::SubmitAnswer;
use cloudsolver_scoring::domain::submission::AnswerSubmission;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/v1/answers.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// The player answering.
    pub player_id: Uuid,
    /// The question answered.
    pub question_id: String,
    /// The option picked.
    pub selected_option: String,
    /// Seconds taken.
    pub elapsed_seconds: f64,
    /// Hints used on this question.
    #[serde(default)]
    pub hints_used: u32,
}

/// POST /
#[instrument(
    skip(state, request),
    fields(player_id = %request.player_id, question_id = %request.question_id)
)]
async fn submit_answer(
    State(state): State<AppState>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResult>, ApiError> {
    let question = state.questions.get_by_id(&request.question_id)?;
    let command = SubmitAnswer {
        correlation_id: Uuid::new_v4(),
        player_id: request.player_id,
        submission: AnswerSubmission {
            question_id: request.question_id,
            selected_option: request.selected_option,
            elapsed_secs: request.elapsed_seconds,
            hints_used: request.hints_used,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling submit_answer command");

    let result = command_handlers::handle_submit_answer(
        &command,
        &question,
        state.clock.as_ref(),
        &*state.progress_repository,
    )
    .await?;

    Ok(Json(result))
}

/// Returns the router for answers.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use cloudsolver_hints::http_advisory::DisabledAdvisoryService;
    use cloudsolver_test_support::{FailingProgressRepository, RecordingProgressRepository};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::state::testing::app_state_with;

    fn post(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_answer_returns_score_and_persists() {
        // Arrange
        let repo = Arc::new(RecordingProgressRepository::new());
        let app = router().with_state(app_state_with(
            repo.clone(),
            Arc::new(DisabledAdvisoryService),
        ));
        let player_id = Uuid::new_v4();
        let body = serde_json::json!({
            "player_id": player_id,
            "question_id": "q-ec2-001",
            "selected_option": "b",
            "elapsed_seconds": 15.0,
        });

        // Act
        let response = app.oneshot(post(&body)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["score"]["is_correct"], true);
        assert_eq!(json["score"]["total_points"], 137);
        assert_eq!(json["persisted"], true);
        assert_eq!(repo.saved().len(), 1);
        assert_eq!(repo.saved()[0].player_id, player_id);
    }

    #[tokio::test]
    async fn test_submit_answer_unknown_question_returns_404() {
        let app = router().with_state(app_state_with(
            Arc::new(RecordingProgressRepository::new()),
            Arc::new(DisabledAdvisoryService),
        ));
        let body = serde_json::json!({
            "player_id": Uuid::new_v4(),
            "question_id": "q-missing",
            "selected_option": "a",
            "elapsed_seconds": 1.0,
        });

        let response = app.oneshot(post(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_answer_blank_option_returns_400() {
        let app = router().with_state(app_state_with(
            Arc::new(RecordingProgressRepository::new()),
            Arc::new(DisabledAdvisoryService),
        ));
        let body = serde_json::json!({
            "player_id": Uuid::new_v4(),
            "question_id": "q-ec2-001",
            "selected_option": "",
            "elapsed_seconds": 1.0,
        });

        let response = app.oneshot(post(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["error"], "invalid_score_input");
    }

    #[tokio::test]
    async fn test_submit_answer_unreachable_store_returns_503() {
        let app = router().with_state(app_state_with(
            Arc::new(FailingProgressRepository),
            Arc::new(DisabledAdvisoryService),
        ));
        let body = serde_json::json!({
            "player_id": Uuid::new_v4(),
            "question_id": "q-ec2-001",
            "selected_option": "b",
            "elapsed_seconds": 1.0,
        });

        let response = app.oneshot(post(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
