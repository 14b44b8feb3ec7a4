//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A malformed question, submission or score result was passed to
    /// scoring or progression. State is never mutated when this is returned.
    #[error("invalid score input: {0}")]
    InvalidScoreInput(String),

    /// A dialogue operation was requested while a typed-text effect is active.
    #[error("session busy: a dialogue line is still being revealed")]
    SessionBusy,

    /// The operation is not valid in the session's current phase.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// The per-question hint allowance has been used up.
    #[error("hint limit reached: at most {limit} hints per question")]
    HintLimitReached {
        /// The configured per-question allowance.
        limit: u32,
    },

    /// A referenced entity (NPC, question, player snapshot) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A validation error in content or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// The persistence collaborator could not be reached.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// An infrastructure error (decoding, poisoned lock, ...).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
