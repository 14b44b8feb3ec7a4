//! The dialogue session state machine.
//!
//! A [`DialogueSession`] drives one NPC conversation:
//!
//! ```text
//! Idle -> Greeting -> AwaitingAnswer -> (HintPending)* -> Reacting -> Idle
//! ```
//!
//! with `Closed` reachable from any phase. At most one typed-text effect is
//! active at a time. Operations that need the dialogue surface while an
//! effect is running fail with `DomainError::SessionBusy`; the caller either
//! waits for the effect or skips it.
//!
//! The session owns the per-question hint allowance. The hint resolver and
//! score calculator never enforce it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use cloudsolver_content::domain::npc::NpcProfile;
use cloudsolver_content::domain::roster::NpcRoster;
use cloudsolver_core::clock::Clock;
use cloudsolver_core::error::DomainError;
use cloudsolver_core::rng::{SharedRng, choose_index};
use cloudsolver_hints::application::resolver::HintResolver;
use cloudsolver_hints::domain::hint::Hint;
use cloudsolver_progression::domain::state::{ProgressionState, ScoreApplication};
use cloudsolver_scoring::domain::calculator::ScoreCalculator;
use cloudsolver_scoring::domain::question::Question;
use cloudsolver_scoring::domain::score::ScoreResult;
use cloudsolver_scoring::domain::submission::AnswerSubmission;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::effect::{EffectOutcome, TypedEffect, wait_done};
use super::sink::{EventEmitter, EventSink};
use super::timer::QuestionTimer;
use crate::domain::config::DialogueConfig;
use crate::domain::events::{
    AchievementsUnlocked, HintShown, LevelChanged, PresentationEventKind, QuestionPresented,
    ScoreComputed, SessionClosed, TimerTicked,
};
use crate::domain::phase::DialoguePhase;
use crate::domain::summary::SessionSummary;

/// Collaborators injected into a session.
pub struct SessionDependencies {
    /// NPC profiles.
    pub roster: Arc<NpcRoster>,
    /// Hint lookup.
    pub resolver: HintResolver,
    /// The player's progression, shared with whoever persists it.
    pub progression: Arc<Mutex<ProgressionState>>,
    /// Where presentation events go.
    pub sink: Arc<dyn EventSink>,
    /// Timestamps for event metadata.
    pub clock: Arc<dyn Clock>,
    /// Reaction line selection.
    pub rng: SharedRng,
}

/// Result of a scored answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    /// Score breakdown.
    pub score: ScoreResult,
    /// What changed in the player's progression.
    pub application: ScoreApplication,
    /// The NPC's reaction line, as it is being typed.
    pub reaction: String,
    /// Whether the answer was submitted by the question timer.
    pub timed_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EffectKind {
    Greeting,
    Hint,
    Reaction,
}

struct OpenQuestion {
    question: Question,
    started_at: Instant,
    hints_used: u32,
    timer: QuestionTimer,
}

struct SessionState {
    phase: DialoguePhase,
    npc: Option<NpcProfile>,
    greeting_index: usize,
    effect: Option<TypedEffect>,
    question: Option<OpenQuestion>,
    question_epoch: u64,
    hint_inflight: bool,
    summary: SessionSummary,
}

impl SessionState {
    fn summary_with_npc(&self) -> SessionSummary {
        SessionSummary {
            npc_id: self.npc.as_ref().map(|npc| npc.id.clone()),
            ..self.summary.clone()
        }
    }
}

struct Shared {
    session_id: Uuid,
    roster: Arc<NpcRoster>,
    resolver: HintResolver,
    progression: Arc<Mutex<ProgressionState>>,
    rng: SharedRng,
    emitter: Arc<EventEmitter>,
    config: DialogueConfig,
    state: Mutex<SessionState>,
}

/// A single NPC conversation. Cloning yields another handle to the same
/// session.
#[derive(Clone)]
pub struct DialogueSession {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for DialogueSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueSession")
            .field("session_id", &self.shared.session_id)
            .finish_non_exhaustive()
    }
}

fn closed() -> DomainError {
    DomainError::InvalidTransition("session is closed".to_owned())
}

fn poisoned() -> DomainError {
    DomainError::Infrastructure("dialogue session lock poisoned".to_owned())
}

/// Returns the session to `AwaitingAnswer` if a hint request is dropped
/// while the resolver is still running.
struct PendingHint<'a> {
    shared: &'a Shared,
    epoch: u64,
    delivered: bool,
}

impl Drop for PendingHint<'_> {
    fn drop(&mut self) {
        if self.delivered {
            return;
        }
        let mut state = self.shared.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.question_epoch == self.epoch
            && state.phase == DialoguePhase::HintPending
            && state.hint_inflight
        {
            state.hint_inflight = false;
            state.phase = DialoguePhase::AwaitingAnswer;
            debug!(epoch = self.epoch, "hint request abandoned");
        }
    }
}

impl DialogueSession {
    /// Creates an idle session.
    #[must_use]
    pub fn new(deps: SessionDependencies, config: DialogueConfig) -> Self {
        let session_id = Uuid::new_v4();
        let emitter = Arc::new(EventEmitter::new(deps.sink, deps.clock, session_id));
        Self {
            shared: Arc::new(Shared {
                session_id,
                roster: deps.roster,
                resolver: deps.resolver,
                progression: deps.progression,
                rng: deps.rng,
                emitter,
                config,
                state: Mutex::new(SessionState {
                    phase: DialoguePhase::Idle,
                    npc: None,
                    greeting_index: 0,
                    effect: None,
                    question: None,
                    question_epoch: 0,
                    hint_inflight: false,
                    summary: SessionSummary::default(),
                }),
            }),
        }
    }

    /// Identifier stamped on every event as its correlation id.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.shared.session_id
    }

    /// Current phase. A poisoned session reports `Closed`.
    #[must_use]
    pub fn phase(&self) -> DialoguePhase {
        self.lock()
            .map_or(DialoguePhase::Closed, |state| state.phase)
    }

    /// The NPC this session was started with.
    #[must_use]
    pub fn npc_id(&self) -> Option<String> {
        self.lock()
            .ok()
            .and_then(|state| state.npc.as_ref().map(|npc| npc.id.clone()))
    }

    /// Totals for the answers scored so far in this session.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        self.lock()
            .map(|state| state.summary_with_npc())
            .unwrap_or_default()
    }

    /// Hints taken on the open question, or zero if none is open.
    #[must_use]
    pub fn hints_used(&self) -> u32 {
        self.lock()
            .ok()
            .and_then(|state| state.question.as_ref().map(|q| q.hints_used))
            .unwrap_or(0)
    }

    /// Seconds left on the open question's timer.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.lock()
            .ok()
            .and_then(|state| state.question.as_ref().map(|q| q.timer.remaining_secs()))
    }

    /// Whether a typed-text effect is running.
    #[must_use]
    pub fn is_effect_active(&self) -> bool {
        self.lock().is_ok_and(|state| state.effect.is_some())
    }

    /// Greets the player as `npc_id`, typing out the first greeting line.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown NPC and
    /// `DomainError::InvalidTransition` if the session was already started
    /// or is closed.
    #[instrument(skip(self), fields(session_id = %self.shared.session_id))]
    pub fn start(&self, npc_id: &str) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        match state.phase {
            DialoguePhase::Closed => return Err(closed()),
            DialoguePhase::Idle if state.npc.is_none() => {}
            phase => {
                return Err(DomainError::InvalidTransition(format!(
                    "cannot start a session that is already {phase}"
                )));
            }
        }

        let npc = self.shared.roster.require(npc_id)?.clone();
        let first = npc
            .greeting
            .first()
            .cloned()
            .ok_or_else(|| DomainError::Validation(format!("npc '{npc_id}' has no greeting")))?;

        state.npc = Some(npc);
        state.greeting_index = 0;
        state.phase = DialoguePhase::Greeting;
        self.spawn_effect(&mut state, EffectKind::Greeting, first);
        info!(npc_id, "dialogue started");
        Ok(())
    }

    /// Types out the next greeting line.
    ///
    /// Returns `Ok(false)` once every greeting line has been shown; the
    /// caller then hands over a question with [`present_question`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionBusy` while a line is still being typed
    /// and `DomainError::InvalidTransition` outside the greeting.
    ///
    /// [`present_question`]: Self::present_question
    pub fn continue_dialogue(&self) -> Result<bool, DomainError> {
        let mut state = self.lock()?;
        match state.phase {
            DialoguePhase::Closed => return Err(closed()),
            DialoguePhase::Greeting => {}
            phase => {
                return Err(DomainError::InvalidTransition(format!(
                    "no dialogue to continue while {phase}"
                )));
            }
        }
        if state.effect.is_some() {
            return Err(DomainError::SessionBusy);
        }

        let next_index = state.greeting_index + 1;
        let Some(line) = state
            .npc
            .as_ref()
            .and_then(|npc| npc.greeting.get(next_index))
            .cloned()
        else {
            return Ok(false);
        };
        state.greeting_index = next_index;
        self.spawn_effect(&mut state, EffectKind::Greeting, line);
        debug!(greeting_index = next_index, "greeting continued");
        Ok(true)
    }

    /// Opens `question` and starts its countdown.
    ///
    /// Valid once every greeting line has been shown, or from `Idle` after a
    /// previous reaction. When the countdown reaches zero the configured
    /// timeout option is submitted through [`submit_answer`]'s path.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionBusy` while a line is being typed,
    /// `DomainError::InvalidTransition` from any other phase and
    /// `DomainError::InvalidScoreInput` for a malformed question.
    ///
    /// [`submit_answer`]: Self::submit_answer
    #[instrument(
        skip(self, question),
        fields(session_id = %self.shared.session_id, question_id = %question.id)
    )]
    pub fn present_question(&self, question: Question) -> Result<(), DomainError> {
        let mut state = self.lock()?;
        match state.phase {
            DialoguePhase::Closed => return Err(closed()),
            _ if state.effect.is_some() => return Err(DomainError::SessionBusy),
            DialoguePhase::Greeting => {
                let greeting_len = state.npc.as_ref().map_or(0, |npc| npc.greeting.len());
                if state.greeting_index + 1 < greeting_len {
                    return Err(DomainError::InvalidTransition(
                        "greeting has lines left to show".to_owned(),
                    ));
                }
            }
            DialoguePhase::Idle if state.npc.is_some() => {}
            phase => {
                return Err(DomainError::InvalidTransition(format!(
                    "cannot present a question while {phase}"
                )));
            }
        }
        question.validate()?;

        state.question_epoch += 1;
        let epoch = state.question_epoch;
        let time_limit_secs = question.time_limit_secs;
        self.shared
            .emitter
            .emit(PresentationEventKind::QuestionPresented(QuestionPresented {
                question_id: question.id.clone(),
                time_limit_secs,
            }));

        let tick_emitter = Arc::clone(&self.shared.emitter);
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let timer = QuestionTimer::spawn(
            time_limit_secs,
            self.shared.config.tick_interval,
            move |remaining_secs| {
                tick_emitter
                    .emit(PresentationEventKind::TimerTicked(TimerTicked { remaining_secs }));
            },
            move || {
                if let Some(shared) = weak.upgrade() {
                    DialogueSession { shared }.expire(epoch);
                }
            },
        );

        state.question = Some(OpenQuestion {
            question,
            started_at: Instant::now(),
            hints_used: 0,
            timer,
        });
        state.phase = DialoguePhase::AwaitingAnswer;
        info!(time_limit_secs, "question presented");
        Ok(())
    }

    /// Asks the NPC for a hint on the open question and types it out.
    ///
    /// The session stays in `HintPending` until the hint has been fully
    /// shown; the question timer keeps running meanwhile. The resolver always
    /// returns within its own timeout, falling back to a local hint.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionBusy` while a line is being typed or
    /// another hint is being resolved, `DomainError::HintLimitReached` once
    /// the per-question allowance is used up (the resolver is not called),
    /// and `DomainError::InvalidTransition` if no question is open or the
    /// question was answered before the hint arrived.
    #[instrument(skip(self), fields(session_id = %self.shared.session_id))]
    pub async fn request_hint(&self, hint_level: u8) -> Result<Hint, DomainError> {
        let (question, npc_id, epoch) = {
            let mut state = self.lock()?;
            if state.phase == DialoguePhase::Closed {
                return Err(closed());
            }
            if state.effect.is_some() || state.hint_inflight {
                return Err(DomainError::SessionBusy);
            }
            if state.phase != DialoguePhase::AwaitingAnswer {
                return Err(DomainError::InvalidTransition(format!(
                    "cannot request a hint while {}",
                    state.phase
                )));
            }
            let limit = self.shared.config.max_hints_per_question;
            let epoch = state.question_epoch;
            let npc_id = state.npc.as_ref().map(|npc| npc.id.clone()).unwrap_or_default();
            let Some(open) = state.question.as_mut() else {
                return Err(DomainError::InvalidTransition("no question is open".to_owned()));
            };
            if open.hints_used >= limit {
                return Err(DomainError::HintLimitReached { limit });
            }
            open.hints_used += 1;
            let question = open.question.clone();
            state.hint_inflight = true;
            state.phase = DialoguePhase::HintPending;
            (question, npc_id, epoch)
        };

        let mut pending = PendingHint {
            shared: &self.shared,
            epoch,
            delivered: false,
        };
        let hint = self.shared.resolver.resolve(&question, &npc_id, hint_level).await;

        let mut state = self.lock()?;
        pending.delivered = true;
        if state.question_epoch != epoch || state.phase != DialoguePhase::HintPending {
            debug!(question_id = %question.id, "discarding hint for a closed question");
            return Err(DomainError::InvalidTransition(
                "question was answered before the hint arrived".to_owned(),
            ));
        }
        state.hint_inflight = false;
        self.shared
            .emitter
            .emit(PresentationEventKind::HintShown(HintShown { hint: hint.clone() }));
        self.spawn_effect(&mut state, EffectKind::Hint, hint.display_message.clone());
        info!(
            npc_id = %hint.npc_id,
            hint_level = hint.hint_level,
            source = ?hint.source,
            "hint shown"
        );
        Ok(hint)
    }

    /// Scores `selected_option` for the open question and types out the
    /// NPC's reaction.
    ///
    /// Elapsed time is measured from when the question was presented and
    /// clamped to its limit. A hint still being typed is completed at once
    /// so only the reaction is active afterwards.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if no question is open and
    /// `DomainError::InvalidScoreInput` for a blank option. Nothing changes
    /// when an error is returned.
    #[instrument(skip(self), fields(session_id = %self.shared.session_id))]
    pub fn submit_answer(&self, selected_option: &str) -> Result<AnswerOutcome, DomainError> {
        self.submit(selected_option, None)
    }

    /// Completes the running line at once. Returns `false` when nothing is
    /// being typed.
    pub async fn skip(&self) -> bool {
        let waiter = {
            let Ok(state) = self.lock() else {
                return false;
            };
            match &state.effect {
                Some(active) if active.skip() => active.waiter(),
                _ => return false,
            }
        };
        wait_done(waiter).await;
        true
    }

    /// Waits until the running line, if any, has finished.
    pub async fn wait_for_effect(&self) {
        let waiter = {
            let Ok(state) = self.lock() else {
                return;
            };
            match &state.effect {
                Some(active) => active.waiter(),
                None => return,
            }
        };
        wait_done(waiter).await;
    }

    /// Ends the session. Any line being typed stops where it is and the
    /// question timer is cancelled. Closing twice is a no-op.
    pub fn close(&self) {
        let mut state = match self.shared.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.phase == DialoguePhase::Closed {
            return;
        }
        if let Some(active) = state.effect.take() {
            active.halt();
        }
        if let Some(open) = state.question.take() {
            open.timer.stop();
        }
        state.hint_inflight = false;
        state.phase = DialoguePhase::Closed;
        let summary = state.summary_with_npc();
        self.shared
            .emitter
            .emit(PresentationEventKind::SessionClosed(SessionClosed { summary }));
        info!(session_id = %self.shared.session_id, "dialogue closed");
    }

    fn expire(&self, epoch: u64) {
        let option = self.shared.config.timeout_option_id.clone();
        match self.submit(&option, Some(epoch)) {
            Ok(outcome) => info!(
                question_id = %outcome.score.question_id,
                "question timed out"
            ),
            Err(e) => debug!(error = %e, "timeout ignored"),
        }
    }

    fn submit(
        &self,
        selected_option: &str,
        expected_epoch: Option<u64>,
    ) -> Result<AnswerOutcome, DomainError> {
        let mut state = self.lock()?;
        if state.phase == DialoguePhase::Closed {
            return Err(closed());
        }
        if expected_epoch.is_some_and(|epoch| epoch != state.question_epoch) {
            return Err(DomainError::InvalidTransition(
                "question was already answered".to_owned(),
            ));
        }
        if !matches!(
            state.phase,
            DialoguePhase::AwaitingAnswer | DialoguePhase::HintPending
        ) {
            return Err(DomainError::InvalidTransition(format!(
                "cannot submit an answer while {}",
                state.phase
            )));
        }
        let Some(open) = state.question.as_ref() else {
            return Err(DomainError::InvalidTransition("no question is open".to_owned()));
        };

        let limit = f64::from(open.question.time_limit_secs);
        let elapsed_secs = open.started_at.elapsed().as_secs_f64().min(limit);
        let submission = AnswerSubmission {
            question_id: open.question.id.clone(),
            selected_option: selected_option.to_owned(),
            elapsed_secs,
            hints_used: open.hints_used,
        };
        let score = ScoreCalculator::compute(&open.question, &submission)?;
        let application = {
            let mut progression = self.shared.progression.lock().map_err(|_| poisoned())?;
            progression.apply_score(&open.question, &score)?
        };

        if let Some(open) = state.question.take() {
            open.timer.stop();
        }
        state.hint_inflight = false;
        state.summary.record(&score, elapsed_secs);
        if let Some(active) = state.effect.take() {
            active.complete_now(&self.shared.emitter);
        }

        let emitter = &self.shared.emitter;
        emitter.emit(PresentationEventKind::ScoreComputed(ScoreComputed {
            result: score.clone(),
        }));
        if application.leveled_up {
            emitter.emit(PresentationEventKind::LevelChanged(LevelChanged {
                previous_level: application.previous_level,
                new_level: application.new_level,
            }));
        }
        if !application.newly_unlocked.is_empty() {
            emitter.emit(PresentationEventKind::AchievementsUnlocked(AchievementsUnlocked {
                achievements: application.newly_unlocked.clone(),
            }));
        }

        let reaction = state
            .npc
            .as_ref()
            .map(|npc| self.reaction_line(npc, score.is_correct))
            .unwrap_or_default();
        state.phase = DialoguePhase::Reacting;
        self.spawn_effect(&mut state, EffectKind::Reaction, reaction.clone());

        info!(
            question_id = %score.question_id,
            is_correct = score.is_correct,
            total_points = score.total_points,
            new_level = application.new_level,
            "answer scored"
        );
        Ok(AnswerOutcome {
            score,
            application,
            reaction,
            timed_out: expected_epoch.is_some(),
        })
    }

    fn reaction_line(&self, npc: &NpcProfile, is_correct: bool) -> String {
        let pool = npc.responses(is_correct);
        let picked = match self.shared.rng.lock() {
            Ok(mut rng) => choose_index(&mut *rng, pool.len()),
            Err(_) => None,
        };
        let modifier = npc.personality.reaction_modifier(is_correct);
        match picked.and_then(|i| pool.get(i)).or_else(|| pool.first()) {
            Some(line) => format!("{modifier} {line}"),
            None => modifier.to_owned(),
        }
    }

    fn spawn_effect(&self, state: &mut SessionState, kind: EffectKind, text: String) {
        let weak = Arc::downgrade(&self.shared);
        let effect = TypedEffect::spawn(
            text,
            self.shared.config.char_interval,
            Arc::clone(&self.shared.emitter),
            move |effect_id, outcome| {
                if let Some(shared) = weak.upgrade() {
                    finish_effect(&shared, effect_id, kind, outcome);
                }
            },
        );
        // At most one line types at a time.
        if let Some(previous) = state.effect.replace(effect) {
            previous.halt();
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionState>, DomainError> {
        self.shared.state.lock().map_err(|_| poisoned())
    }
}

fn finish_effect(shared: &Shared, effect_id: u64, kind: EffectKind, outcome: EffectOutcome) {
    if outcome == EffectOutcome::Halted {
        return;
    }
    let Ok(mut state) = shared.state.lock() else {
        return;
    };
    // Only the effect that is still current may move the session on.
    let is_current = state
        .effect
        .as_ref()
        .is_some_and(|active| active.id() == effect_id);
    if !is_current {
        return;
    }
    state.effect = None;
    state.phase = match (kind, state.phase) {
        (EffectKind::Hint, DialoguePhase::HintPending) => DialoguePhase::AwaitingAnswer,
        (EffectKind::Reaction, DialoguePhase::Reacting) => DialoguePhase::Idle,
        (_, phase) => phase,
    };
    debug!(?kind, ?outcome, phase = %state.phase, "line finished");
}
