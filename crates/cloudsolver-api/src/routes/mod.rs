//! Route modules organized by concern.

use axum::Router;

use crate::state::AppState;

pub mod answers;
pub mod health;
pub mod hints;
pub mod leaderboard;
pub mod npcs;
pub mod players;
pub mod questions;

/// Every route, before state and middleware are attached.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/answers", answers::router())
        .nest("/api/v1/players", players::router())
        .nest("/api/v1/hints", hints::router())
        .nest("/api/v1/leaderboard", leaderboard::router())
        .nest("/api/v1/npcs", npcs::router())
        .nest("/api/v1/questions", questions::router())
}
