//! The hint resolver.
//!
//! [`HintResolver::resolve`] always returns a usable [`Hint`]. The remote
//! advisory call is bounded by [`HintResolverConfig::timeout`]; a timeout,
//! transport error, non-success status or malformed payload all degrade to
//! the local fallback. Degradation is only visible as
//! `Hint.source == HintSource::Fallback` and a `warn!` event.
//!
//! The per-question hint allowance is not enforced here.

use std::sync::Arc;
use std::time::Duration;

use cloudsolver_content::domain::npc::NpcProfile;
use cloudsolver_content::domain::roster::NpcRoster;
use cloudsolver_core::advisory::{AdvisoryError, AdvisoryRequest, AdvisoryResponse, AdvisoryService};
use cloudsolver_core::rng::SharedRng;
use cloudsolver_scoring::domain::question::Question;
use tracing::{debug, instrument, warn};

use crate::domain::fallback::{fallback_body, phrase_hint};
use crate::domain::hint::{Hint, HintSource, clamp_hint_level};

/// Resolver tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintResolverConfig {
    /// Budget for a single remote advisory call.
    pub timeout: Duration,
}

impl Default for HintResolverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
        }
    }
}

/// Resolves hints, preferring the remote advisory service.
#[derive(Clone)]
pub struct HintResolver {
    advisory: Arc<dyn AdvisoryService>,
    roster: Arc<NpcRoster>,
    rng: SharedRng,
    config: HintResolverConfig,
}

impl std::fmt::Debug for HintResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HintResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HintResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(
        advisory: Arc<dyn AdvisoryService>,
        roster: Arc<NpcRoster>,
        rng: SharedRng,
        config: HintResolverConfig,
    ) -> Self {
        Self {
            advisory,
            roster,
            rng,
            config,
        }
    }

    /// The resolver's configuration.
    #[must_use]
    pub fn config(&self) -> &HintResolverConfig {
        &self.config
    }

    /// Resolves a hint for `question` as delivered by `npc_id`.
    ///
    /// `hint_level` is clamped into `1..=3`. An unknown NPC still gets a hint,
    /// just without personality phrasing.
    #[instrument(skip(self, question), fields(question_id = %question.id))]
    pub async fn resolve(&self, question: &Question, npc_id: &str, hint_level: u8) -> Hint {
        let level = clamp_hint_level(hint_level);
        let npc = self.roster.get(npc_id);
        let request = AdvisoryRequest {
            category: question.category.clone(),
            difficulty: question.difficulty.as_str().to_owned(),
            scenario: question.scenario.clone(),
            question: question.prompt.clone(),
            npc_id: npc_id.to_owned(),
            hint_level: level,
        };

        match self.fetch_remote(&request).await {
            Ok(response) => {
                let text = response.hint.trim().to_owned();
                let display_message = if response.message.trim().is_empty() {
                    self.phrase(npc, &text)
                } else {
                    response.message.trim().to_owned()
                };
                debug!(source = "remote", hint_level = level, "hint resolved");
                Hint {
                    text,
                    display_message,
                    source: HintSource::Remote,
                    hint_level: level,
                    npc_id: npc_id.to_owned(),
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    source = "fallback",
                    hint_level = level,
                    "hint resolution degraded"
                );
                let body = fallback_body(&question.category, level);
                Hint {
                    text: body.to_owned(),
                    display_message: self.phrase(npc, body),
                    source: HintSource::Fallback,
                    hint_level: level,
                    npc_id: npc_id.to_owned(),
                }
            }
        }
    }

    async fn fetch_remote(
        &self,
        request: &AdvisoryRequest,
    ) -> Result<AdvisoryResponse, AdvisoryError> {
        let response = tokio::time::timeout(self.config.timeout, self.advisory.advise(request))
            .await
            .map_err(|_| AdvisoryError::Timeout)??;
        if response.hint.trim().is_empty() {
            return Err(AdvisoryError::Malformed("empty hint".into()));
        }
        Ok(response)
    }

    fn phrase(&self, npc: Option<&NpcProfile>, body: &str) -> String {
        match self.rng.lock() {
            Ok(mut rng) => phrase_hint(npc, body, &mut *rng),
            Err(_) => body.to_owned(),
        }
    }
}
