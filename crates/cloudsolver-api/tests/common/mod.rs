//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use cloudsolver_api::build_app;
use cloudsolver_api::state::{AppState, StoreKind};
use cloudsolver_content::domain::questions::InMemoryQuestionBank;
use cloudsolver_content::domain::roster::NpcRoster;
use cloudsolver_core::advisory::AdvisoryService;
use cloudsolver_core::clock::Clock;
use cloudsolver_core::rng::SharedRng;
use cloudsolver_hints::application::resolver::{HintResolver, HintResolverConfig};
use cloudsolver_hints::http_advisory::DisabledAdvisoryService;
use cloudsolver_store::memory_progress_repository::MemoryProgressRepository;
use cloudsolver_test_support::{FixedClock, MockRng};

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app with an in-memory progress store and no advisory
/// service. Every random choice picks the first candidate.
pub fn build_test_app() -> Router {
    build_test_app_with_advisory(Arc::new(DisabledAdvisoryService))
}

/// Build the full app with a custom advisory service.
pub fn build_test_app_with_advisory(advisory: Arc<dyn AdvisoryService>) -> Router {
    let rng: SharedRng = Arc::new(Mutex::new(MockRng));
    let roster = Arc::new(NpcRoster::builtin().unwrap());
    let hint_resolver = HintResolver::new(
        advisory,
        Arc::clone(&roster),
        Arc::clone(&rng),
        HintResolverConfig::default(),
    );
    let app_state = AppState {
        clock: fixed_clock(),
        rng,
        progress_repository: Arc::new(MemoryProgressRepository::new()),
        store_kind: StoreKind::Memory,
        questions: Arc::new(InMemoryQuestionBank::builtin().unwrap()),
        roster,
        hint_resolver,
    };

    build_app(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
