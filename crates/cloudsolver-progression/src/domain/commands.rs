//! Commands for the progression context.

use cloudsolver_core::command::Command;
use cloudsolver_scoring::domain::submission::AnswerSubmission;
use uuid::Uuid;

/// Command to score an answer and fold it into a player's progression.
#[derive(Debug, Clone)]
pub struct SubmitAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player answering.
    pub player_id: Uuid,
    /// The answer itself.
    pub submission: AnswerSubmission,
}

impl Command for SubmitAnswer {
    fn command_type(&self) -> &'static str {
        "progression.submit_answer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn player_id(&self) -> Uuid {
        self.player_id
    }
}
