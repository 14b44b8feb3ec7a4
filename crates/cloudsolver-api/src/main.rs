//! Cloud Solver API server entry point.

use std::error::Error;
use std::sync::{Arc, Mutex};

use sqlx::postgres::PgPoolOptions;

use cloudsolver_api::config::ApiConfig;
use cloudsolver_api::error::AppError;
use cloudsolver_api::state::{AppState, StoreKind};
use cloudsolver_api::{build_app, telemetry};
use cloudsolver_content::domain::questions::InMemoryQuestionBank;
use cloudsolver_content::domain::roster::NpcRoster;
use cloudsolver_core::advisory::AdvisoryService;
use cloudsolver_core::clock::SystemClock;
use cloudsolver_core::repository::ProgressRepository;
use cloudsolver_core::rng::{SeededRng, SharedRng};
use cloudsolver_hints::application::resolver::{HintResolver, HintResolverConfig};
use cloudsolver_hints::http_advisory::{DisabledAdvisoryService, HttpAdvisoryService};
use cloudsolver_store::memory_progress_repository::MemoryProgressRepository;
use cloudsolver_store::pg_progress_repository::PgProgressRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Read configuration from environment.
    let config = ApiConfig::from_env()?;

    let tracer_provider = telemetry::init_tracing(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Cloud Solver API server");

    // Progress store.
    let (progress_repository, store_kind): (Arc<dyn ProgressRepository>, StoreKind) =
        match &config.database_url {
            Some(database_url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(database_url)
                    .await
                    .map_err(AppError::Database)?;
                let repository = PgProgressRepository::new(pool);
                repository.ensure_schema().await.map_err(AppError::Domain)?;
                (Arc::new(repository), StoreKind::Postgres)
            }
            None => {
                tracing::warn!("DATABASE_URL not set; progress is kept in memory");
                (Arc::new(MemoryProgressRepository::new()), StoreKind::Memory)
            }
        };

    // Advisory service.
    let advisory: Arc<dyn AdvisoryService> = match &config.advisor_url {
        Some(url) => Arc::new(
            HttpAdvisoryService::new(url.clone(), config.hint_timeout)
                .map_err(|e| AppError::Config(format!("ADVISOR_URL: {e}")))?,
        ),
        None => {
            tracing::info!("ADVISOR_URL not set; hints use the built-in fallback");
            Arc::new(DisabledAdvisoryService)
        }
    };

    let rng: SharedRng = match config.rng_seed {
        Some(seed) => Arc::new(Mutex::new(SeededRng::from_seed_u64(seed))),
        None => Arc::new(Mutex::new(SeededRng::from_entropy())),
    };

    // Build application state.
    let roster = Arc::new(NpcRoster::builtin().map_err(AppError::Domain)?);
    let hint_resolver = HintResolver::new(
        advisory,
        Arc::clone(&roster),
        Arc::clone(&rng),
        HintResolverConfig {
            timeout: config.hint_timeout,
        },
    );
    let app_state = AppState {
        clock: Arc::new(SystemClock),
        rng,
        progress_repository,
        store_kind,
        questions: Arc::new(InMemoryQuestionBank::builtin().map_err(AppError::Domain)?),
        roster,
        hint_resolver,
    };

    let app = build_app(app_state);

    // Start server.
    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    if let Some(provider) = tracer_provider {
        provider
            .shutdown()
            .map_err(|e| AppError::Telemetry(e.to_string()))?;
    }

    Ok(())
}
