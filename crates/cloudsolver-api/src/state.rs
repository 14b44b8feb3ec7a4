//! Shared application state.

use std::sync::Arc;

use cloudsolver_content::domain::questions::QuestionProvider;
use cloudsolver_content::domain::roster::NpcRoster;
use cloudsolver_core::clock::Clock;
use cloudsolver_core::repository::ProgressRepository;
use cloudsolver_core::rng::SharedRng;
use cloudsolver_hints::application::resolver::HintResolver;

/// Which progress store backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// PostgreSQL via `DATABASE_URL`.
    Postgres,
    /// Process memory; progress is lost on restart.
    Memory,
}

impl StoreKind {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for deterministic timestamps.
    pub clock: Arc<dyn Clock>,
    /// RNG for question selection.
    pub rng: SharedRng,
    /// Progression snapshots.
    pub progress_repository: Arc<dyn ProgressRepository>,
    /// Which store `progress_repository` is.
    pub store_kind: StoreKind,
    /// Question bank.
    pub questions: Arc<dyn QuestionProvider>,
    /// NPC profiles.
    pub roster: Arc<NpcRoster>,
    /// Hint lookup.
    pub hint_resolver: HintResolver,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store_kind", &self.store_kind)
            .field("npcs", &self.roster.len())
            .field("hint_resolver", &self.hint_resolver)
            .finish_non_exhaustive()
    }
}
