//! Integration tests for a player's journey through the API.

mod common;

use axum::http::StatusCode;
use uuid::Uuid;

#[tokio::test]
async fn test_answer_then_read_progression() {
    // Arrange
    let app = common::build_test_app();
    let player_id = Uuid::new_v4();

    // Act
    let (status, answer) = common::post_json(
        app.clone(),
        "/api/v1/answers",
        &serde_json::json!({
            "player_id": player_id,
            "question_id": "q-ec2-001",
            "selected_option": "b",
            "elapsed_seconds": 15.0,
            "hints_used": 1,
        }),
    )
    .await;
    let (progress_status, progression) =
        common::get_json(app, &format!("/api/v1/players/{player_id}/progression")).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answer["score"]["total_points"], 127);
    assert_eq!(answer["score"]["hint_penalty"], 10);
    assert_eq!(answer["application"]["newly_unlocked"][0], "first_correct");
    assert_eq!(answer["persisted"], true);

    assert_eq!(progress_status, StatusCode::OK);
    assert_eq!(progression["total_score"], 127);
    assert_eq!(progression["experience"], 127);
    assert_eq!(progression["questions_answered"], 1);
    assert_eq!(progression["current_streak"], 1);
    assert_eq!(progression["achievements"][0]["id"], "first_correct");
}

#[tokio::test]
async fn test_wrong_answer_resets_streak_and_scores_zero() {
    // Arrange
    let app = common::build_test_app();
    let player_id = Uuid::new_v4();
    let answer = |option: &str| {
        serde_json::json!({
            "player_id": player_id,
            "question_id": "q-s3-001",
            "selected_option": option,
            "elapsed_seconds": 10.0,
        })
    };

    // Act
    let (_, first) = common::post_json(app.clone(), "/api/v1/answers", &answer("a")).await;
    let (_, second) = common::post_json(app.clone(), "/api/v1/answers", &answer("c")).await;
    let (_, progression) =
        common::get_json(app, &format!("/api/v1/players/{player_id}/progression")).await;

    // Assert
    assert_eq!(first["score"]["is_correct"], true);
    assert_eq!(second["score"]["is_correct"], false);
    assert_eq!(second["score"]["total_points"], 0);
    assert_eq!(progression["current_streak"], 0);
    assert_eq!(progression["max_streak"], 1);
    assert_eq!(progression["accuracy_percent"], 50);
}

#[tokio::test]
async fn test_next_question_then_hint_for_it() {
    // Arrange
    let app = common::build_test_app();

    // Act
    let (status, card) =
        common::get_json(app.clone(), "/api/v1/questions/next?npc_id=alex_ceo").await;
    let (hint_status, hint) = common::post_json(
        app,
        "/api/v1/hints",
        &serde_json::json!({
            "question_id": card["id"],
            "npc_id": "alex_ceo",
            "hint_level": 1,
        }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert!(card.get("correct_option").is_none());
    assert_eq!(hint_status, StatusCode::OK);
    assert_eq!(hint["source"], "fallback");
    assert_eq!(hint["npc_id"], "alex_ceo");
    assert!(!hint["display_message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_npcs() {
    let app = common::build_test_app();

    let (status, json) = common::get_json(app, "/api/v1/npcs").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|npc| npc["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["alex_ceo", "sarah_analyst", "mike_security", "jenny_developer"]
    );
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = common::build_test_app();

    let request = axum::http::Request::builder()
        .uri("/api/v1/nowhere")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_answers_from_two_players_rank_on_leaderboard() {
    // Arrange
    let app = common::build_test_app();
    let leader = Uuid::new_v4();
    let trailer = Uuid::new_v4();
    let answer = |player_id: Uuid, option: &str| {
        serde_json::json!({
            "player_id": player_id,
            "question_id": "q-ec2-001",
            "selected_option": option,
            "elapsed_seconds": 15.0,
        })
    };

    // Act
    common::post_json(app.clone(), "/api/v1/answers", &answer(trailer, "a")).await;
    common::post_json(app.clone(), "/api/v1/answers", &answer(leader, "b")).await;
    let (status, board) = common::get_json(app.clone(), "/api/v1/leaderboard?limit=5").await;
    let (_, standing) =
        common::get_json(app, &format!("/api/v1/leaderboard/players/{trailer}")).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board.as_array().unwrap().len(), 2);
    assert_eq!(board[0]["player_id"], leader.to_string());
    assert_eq!(board[0]["position"], 1);
    assert_eq!(board[1]["total_score"], 0);
    assert_eq!(standing["position"], 2);
    assert_eq!(standing["total_participants"], 2);
}
