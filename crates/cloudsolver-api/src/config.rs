//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HINT_TIMEOUT_MS: u64 = 3000;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// PostgreSQL URL. Without one, progress is kept in memory.
    pub database_url: Option<String>,
    /// Remote advisory endpoint. Without one, every hint uses the fallback.
    pub advisor_url: Option<String>,
    /// Budget for one advisory call.
    pub hint_timeout: Duration,
    /// Fixed RNG seed for reproducible question selection.
    pub rng_seed: Option<u64>,
    /// OTLP collector endpoint for span export.
    pub otlp_endpoint: Option<String>,
}

impl ApiConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT`, `HINT_TIMEOUT_MS` or `RNG_SEED`
    /// cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let hint_timeout_ms = match var("HINT_TIMEOUT_MS") {
            Some(raw) => raw.parse().map_err(|e| {
                AppError::Config(format!(
                    "HINT_TIMEOUT_MS must be a whole number of milliseconds: {e}"
                ))
            })?,
            None => DEFAULT_HINT_TIMEOUT_MS,
        };
        let rng_seed = var("RNG_SEED")
            .map(|raw| {
                raw.parse()
                    .map_err(|e| AppError::Config(format!("RNG_SEED must be a valid u64: {e}")))
            })
            .transpose()?;

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            database_url: var("DATABASE_URL"),
            advisor_url: var("ADVISOR_URL"),
            hint_timeout: Duration::from_millis(hint_timeout_ms),
            rng_seed,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host` and `port` do not form an address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
