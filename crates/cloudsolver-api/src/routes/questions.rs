//! Routes for picking questions.

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use cloudsolver_content::application::query_handlers::{self, QuestionCard};
use cloudsolver_content::domain::questions::{QuestionFilters, QuestionMode};
use cloudsolver_core::error::DomainError;
use cloudsolver_progression::application::command_handlers::load_progression;
use cloudsolver_scoring::domain::question::Difficulty;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string for GET /api/v1/questions/next.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuestionQuery {
    /// Restrict to one category.
    pub category: Option<String>,
    /// Restrict to one difficulty.
    pub difficulty: Option<Difficulty>,
    /// Restrict to one NPC's expertise and preferred difficulties.
    pub npc_id: Option<String>,
    /// Pick adaptively for this player's level and accuracy.
    pub player_id: Option<Uuid>,
    /// Skip this question, typically the one just answered.
    pub exclude: Option<String>,
}

/// GET /next
#[instrument(skip(state))]
async fn next_question(
    State(state): State<AppState>,
    Query(query): Query<NextQuestionQuery>,
) -> Result<Json<QuestionCard>, ApiError> {
    let mut filters = match &query.npc_id {
        Some(npc_id) => QuestionFilters::for_npc(state.roster.require(npc_id)?),
        None => QuestionFilters::default(),
    };
    if let Some(category) = query.category {
        filters = filters.with_category(category);
    }
    if let Some(difficulty) = query.difficulty {
        filters = filters.with_difficulty(difficulty);
    }
    if let Some(exclude) = query.exclude {
        filters = filters.excluding(exclude);
    }

    let mode = match query.player_id {
        Some(player_id) => {
            let progression = load_progression(player_id, &*state.progress_repository).await?;
            QuestionMode::Adaptive {
                level: progression.level(),
                accuracy_percent: progression.accuracy_percent(),
            }
        }
        None => QuestionMode::Random,
    };

    let mut rng = state
        .rng
        .lock()
        .map_err(|_| DomainError::Infrastructure("rng lock poisoned".to_owned()))?;
    let card = query_handlers::next_question(state.questions.as_ref(), mode, &filters, &mut *rng)?;
    Ok(Json(card))
}

/// Returns the router for questions.
pub fn router() -> Router<AppState> {
    Router::new().route("/next", get(next_question))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use cloudsolver_hints::http_advisory::DisabledAdvisoryService;
    use cloudsolver_test_support::{EmptyProgressRepository, FailingProgressRepository};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::state::testing::app_state_with;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_of(response: axum::response::Response) -> Value {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    fn app() -> Router {
        router().with_state(app_state_with(
            Arc::new(EmptyProgressRepository),
            Arc::new(DisabledAdvisoryService),
        ))
    }

    #[tokio::test]
    async fn test_next_question_applies_filters_and_hides_answer() {
        // Act
        let response = app()
            .oneshot(get("/next?category=EC2&difficulty=easy"))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["category"], "EC2");
        assert_eq!(json["difficulty"], "easy");
        assert!(json.get("correct_option").is_none());
        assert!(json.get("explanation").is_none());
    }

    #[tokio::test]
    async fn test_next_question_skips_excluded_id() {
        let response = app()
            .oneshot(get("/next?category=EC2&exclude=q-ec2-001"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["category"], "EC2");
        assert_ne!(json["id"], "q-ec2-001");
    }

    #[tokio::test]
    async fn test_next_question_for_player_uses_progression() {
        let uri = format!("/next?player_id={}", Uuid::new_v4());

        let response = app().oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_next_question_unknown_npc_returns_404() {
        let response = app().oneshot(get("/next?npc_id=nobody")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_next_question_unknown_category_returns_404() {
        let response = app()
            .oneshot(get("/next?category=Mainframe"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_next_question_unreachable_store_returns_503() {
        let app = router().with_state(app_state_with(
            Arc::new(FailingProgressRepository),
            Arc::new(DisabledAdvisoryService),
        ));
        let uri = format!("/next?player_id={}", Uuid::new_v4());

        let response = app.oneshot(get(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
