//! Remote advisory service abstraction.
//!
//! The advisory service generates hint text for a question on behalf of an
//! NPC. It must be treated as unreliable at all times: callers bound every
//! call with a timeout and recover from every [`AdvisoryError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request sent to the advisory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRequest {
    /// Question category (e.g. `EC2`, `S3`).
    pub category: String,
    /// Question difficulty (`easy`, `medium`, `hard`).
    pub difficulty: String,
    /// Scenario description framing the question.
    pub scenario: String,
    /// The question prompt itself.
    pub question: String,
    /// The NPC that will deliver the hint.
    pub npc_id: String,
    /// Requested hint specificity, 1..=3.
    pub hint_level: u8,
}

/// Successful advisory response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    /// The bare hint body.
    pub hint: String,
    /// The hint as the NPC would say it. May be empty, in which case the
    /// caller applies its own phrasing.
    #[serde(default)]
    pub message: String,
}

/// Ways a remote advisory call can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisoryError {
    /// The call did not complete within the caller's budget.
    #[error("advisory request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("advisory service returned status {0}")]
    Status(u16),

    /// The response body could not be understood.
    #[error("malformed advisory payload: {0}")]
    Malformed(String),

    /// The request could not be delivered.
    #[error("advisory transport error: {0}")]
    Transport(String),

    /// No advisory service is configured.
    #[error("advisory service unavailable")]
    Unavailable,
}

/// Port to the remote advisory service.
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    /// Ask the service for a hint.
    async fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError>;
}
