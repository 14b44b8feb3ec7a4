//! Advisory service adapters.

use std::time::Duration;

use async_trait::async_trait;
use cloudsolver_core::advisory::{
    AdvisoryError, AdvisoryRequest, AdvisoryResponse, AdvisoryService,
};
use tracing::debug;

/// Advisory service reached over HTTP.
///
/// POSTs the request as JSON to a single endpoint and expects
/// `{"hint": ..., "message": ...}` back.
#[derive(Debug, Clone)]
pub struct HttpAdvisoryService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAdvisoryService {
    /// Creates a client for `endpoint` whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `AdvisoryError::Transport` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AdvisoryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AdvisoryService for HttpAdvisoryService {
    async fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdvisoryError::Timeout
                } else {
                    AdvisoryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisoryError::Status(status.as_u16()));
        }

        let body: AdvisoryResponse = response
            .json()
            .await
            .map_err(|e| AdvisoryError::Malformed(e.to_string()))?;
        debug!(npc_id = %request.npc_id, "advisory response received");
        Ok(body)
    }
}

/// Stand-in used when no advisory endpoint is configured. Every call fails
/// with `AdvisoryError::Unavailable`, so hints always come from the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAdvisoryService;

#[async_trait]
impl AdvisoryService for DisabledAdvisoryService {
    async fn advise(&self, _request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        Err(AdvisoryError::Unavailable)
    }
}
