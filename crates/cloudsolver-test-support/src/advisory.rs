//! Test advisory services — mock `AdvisoryService` implementations.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cloudsolver_core::advisory::{
    AdvisoryError, AdvisoryRequest, AdvisoryResponse, AdvisoryService,
};

/// An advisory service that answers every request with a fixed response and
/// records the requests it received.
#[derive(Debug)]
pub struct StubAdvisoryService {
    response: AdvisoryResponse,
    calls: AtomicUsize,
    requests: Mutex<Vec<AdvisoryRequest>>,
}

impl StubAdvisoryService {
    /// Create a stub answering with `hint` and `message`.
    #[must_use]
    pub fn new(hint: &str, message: &str) -> Self {
        Self {
            response: AdvisoryResponse {
                hint: hint.to_owned(),
                message: message.to_owned(),
            },
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of `advise` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<AdvisoryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdvisoryService for StubAdvisoryService {
    async fn advise(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }
}

/// An advisory service that always fails with the configured error.
#[derive(Debug)]
pub struct FailingAdvisoryService(pub AdvisoryError);

#[async_trait]
impl AdvisoryService for FailingAdvisoryService {
    async fn advise(&self, _request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        Err(self.0.clone())
    }
}

/// An advisory service that never answers. Only a caller-side timeout gets
/// past it.
#[derive(Debug)]
pub struct HangingAdvisoryService;

#[async_trait]
impl AdvisoryService for HangingAdvisoryService {
    async fn advise(&self, _request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        std::future::pending::<()>().await;
        Err(AdvisoryError::Timeout)
    }
}

/// An advisory service that "succeeds" with an empty hint body.
#[derive(Debug)]
pub struct MalformedAdvisoryService;

#[async_trait]
impl AdvisoryService for MalformedAdvisoryService {
    async fn advise(&self, _request: &AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        Ok(AdvisoryResponse {
            hint: "   ".to_owned(),
            message: String::new(),
        })
    }
}
