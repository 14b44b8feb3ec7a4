//! Per-session totals.

use cloudsolver_scoring::domain::score::ScoreResult;
use serde::{Deserialize, Serialize};

/// What happened over one dialogue session, independent of the player's
/// lifetime progression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// The NPC the session was held with.
    pub npc_id: Option<String>,
    /// Answers scored, timeouts included.
    pub questions_answered: u32,
    /// Correct answers.
    pub correct_answers: u32,
    /// Accuracy rounded to one decimal, `0.0` before the first answer.
    pub accuracy_percent: f64,
    /// Seconds spent on answered questions.
    pub total_time_secs: f64,
    /// Points earned.
    pub total_points: u64,
    /// Hints taken on answered questions.
    pub hints_used: u32,
}

impl SessionSummary {
    /// Folds one scored answer into the totals.
    pub fn record(&mut self, score: &ScoreResult, elapsed_secs: f64) {
        self.questions_answered += 1;
        if score.is_correct {
            self.correct_answers += 1;
        }
        self.total_time_secs += elapsed_secs;
        self.total_points += u64::from(score.total_points);
        self.hints_used += score.hints_used;
        self.accuracy_percent = (f64::from(self.correct_answers) * 1000.0
            / f64::from(self.questions_answered))
        .round()
            / 10.0;
    }
}
