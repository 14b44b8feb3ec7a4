//! Cancellable typed-text effect.
//!
//! A [`TypedEffect`] reveals one line a character at a time on its own task,
//! sleeping `char_interval` between characters. Each sleep is a cancellation
//! point: `skip` finishes the line at once, `halt` stops it without revealing
//! anything further. Either signal is terminal for that effect.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use super::sink::EventEmitter;
use crate::domain::events::{LineRevealed, PresentationEventKind};

/// How an effect ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOutcome {
    /// Every character was revealed on schedule.
    Completed,
    /// The rest of the line was revealed at once.
    Skipped,
    /// Stopped without revealing the rest of the line.
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Running,
    SkipRequested,
    Halted,
    Finished,
}

struct EffectControl {
    signal: Mutex<Signal>,
    notify: Notify,
}

impl EffectControl {
    // Events are emitted while this guard is held, so once `halt` returns the
    // task can no longer reveal anything.
    fn lock(&self) -> MutexGuard<'_, Signal> {
        self.signal.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

static NEXT_EFFECT_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a running typed-text effect.
pub struct TypedEffect {
    id: u64,
    text: String,
    control: Arc<EffectControl>,
    done: watch::Receiver<bool>,
    handle: JoinHandle<()>,
}

impl std::fmt::Debug for TypedEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedEffect")
            .field("id", &self.id)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl TypedEffect {
    /// Starts revealing `text`. `on_finish` receives the effect id and outcome
    /// on the effect's task once the line is fully shown or the effect is
    /// halted; it does not run if the task is aborted first.
    pub(crate) fn spawn<F>(
        text: String,
        char_interval: Duration,
        emitter: Arc<EventEmitter>,
        on_finish: F,
    ) -> Self
    where
        F: FnOnce(u64, EffectOutcome) + Send + 'static,
    {
        let id = NEXT_EFFECT_ID.fetch_add(1, Ordering::Relaxed);
        let control = Arc::new(EffectControl {
            signal: Mutex::new(Signal::Running),
            notify: Notify::new(),
        });
        let (done_tx, done) = watch::channel(false);

        let task_control = Arc::clone(&control);
        let task_text = text.clone();
        let handle = tokio::spawn(async move {
            let outcome = reveal(&task_text, char_interval, &task_control, &emitter).await;
            debug!(effect_id = id, ?outcome, "typed effect finished");
            on_finish(id, outcome);
            let _ = done_tx.send(true);
        });

        Self {
            id,
            text,
            control,
            done,
            handle,
        }
    }

    /// Process-unique effect identifier.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The full line.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Asks the effect to reveal the rest of its line now. Returns `false` if
    /// it has already finished or been halted.
    pub fn skip(&self) -> bool {
        let mut signal = self.control.lock();
        if *signal != Signal::Running {
            return false;
        }
        *signal = Signal::SkipRequested;
        drop(signal);
        self.control.notify.notify_one();
        true
    }

    /// Reveals the rest of the line from the calling thread and stops the
    /// task. Returns `false` if the line had already been fully revealed or
    /// the effect was halted.
    pub(crate) fn complete_now(&self, emitter: &EventEmitter) -> bool {
        let mut signal = self.control.lock();
        if matches!(*signal, Signal::Halted | Signal::Finished) {
            return false;
        }
        emitter.emit(line(&self.text, true));
        *signal = Signal::Halted;
        drop(signal);
        self.control.notify.notify_one();
        true
    }

    /// Stops the effect without revealing anything further.
    pub fn halt(&self) {
        let mut signal = self.control.lock();
        if *signal != Signal::Finished {
            *signal = Signal::Halted;
        }
        drop(signal);
        self.control.notify.notify_one();
        self.handle.abort();
    }

    /// A receiver that flips to `true` once the effect's task has finished.
    /// The sender is dropped if the task is aborted.
    pub(crate) fn waiter(&self) -> watch::Receiver<bool> {
        self.done.clone()
    }
}

/// Waits on a receiver from [`TypedEffect::waiter`].
pub(crate) async fn wait_done(mut done: watch::Receiver<bool>) {
    // A closed channel means the task is gone.
    let _ = done.wait_for(|finished| *finished).await;
}

fn line(text: &str, is_complete: bool) -> PresentationEventKind {
    PresentationEventKind::LineRevealed(LineRevealed {
        text: text.to_owned(),
        is_complete,
    })
}

async fn reveal(
    text: &str,
    char_interval: Duration,
    control: &EffectControl,
    emitter: &EventEmitter,
) -> EffectOutcome {
    let chars: Vec<char> = text.chars().collect();
    let mut revealed = String::with_capacity(text.len());
    let mut shown = 0usize;

    loop {
        {
            let mut signal = control.lock();
            match *signal {
                Signal::Halted | Signal::Finished => return EffectOutcome::Halted,
                Signal::SkipRequested => {
                    emitter.emit(line(text, true));
                    *signal = Signal::Finished;
                    return EffectOutcome::Skipped;
                }
                Signal::Running if chars.is_empty() => {
                    emitter.emit(line(text, true));
                    *signal = Signal::Finished;
                    return EffectOutcome::Completed;
                }
                Signal::Running => {}
            }
        }

        tokio::select! {
            () = tokio::time::sleep(char_interval) => {}
            () = control.notify.notified() => continue,
        }

        let mut signal = control.lock();
        if *signal != Signal::Running {
            continue;
        }
        revealed.push(chars[shown]);
        shown += 1;
        let is_complete = shown == chars.len();
        emitter.emit(line(&revealed, is_complete));
        if is_complete {
            *signal = Signal::Finished;
            return EffectOutcome::Completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use chrono::Utc;
    use cloudsolver_test_support::FixedClock;
    use tokio::sync::mpsc::UnboundedReceiver;
    use uuid::Uuid;

    use super::*;
    use crate::application::sink::ChannelEventSink;
    use crate::domain::events::PresentationEvent;

    fn emitter() -> (Arc<EventEmitter>, UnboundedReceiver<PresentationEvent>) {
        let (sink, rx) = ChannelEventSink::new();
        let emitter = EventEmitter::new(
            Arc::new(sink),
            Arc::new(FixedClock(Utc::now())),
            Uuid::new_v4(),
        );
        (Arc::new(emitter), rx)
    }

    fn lines(rx: &mut UnboundedReceiver<PresentationEvent>) -> Vec<LineRevealed> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let PresentationEventKind::LineRevealed(line) = event.kind {
                out.push(line);
            }
        }
        out
    }

    fn recording() -> (
        Arc<StdMutex<Vec<EffectOutcome>>>,
        impl FnOnce(u64, EffectOutcome) + Send + 'static,
    ) {
        let outcomes = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&outcomes);
        (outcomes, move |_id, o| sink.lock().unwrap().push(o))
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveals_one_character_per_interval() {
        // Arrange
        let (emitter, mut rx) = emitter();
        let (outcomes, on_finish) = recording();

        // Act
        let effect =
            TypedEffect::spawn("Hey!".to_owned(), Duration::from_millis(30), emitter, on_finish);
        wait_done(effect.waiter()).await;

        // Assert
        let revealed = lines(&mut rx);
        let texts: Vec<&str> = revealed.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["H", "He", "Hey", "Hey!"]);
        assert!(revealed[..3].iter().all(|l| !l.is_complete));
        assert!(revealed[3].is_complete);
        assert_eq!(*outcomes.lock().unwrap(), vec![EffectOutcome::Completed]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_reveals_full_line_without_waiting() {
        // Arrange
        let (emitter, mut rx) = emitter();
        let (outcomes, on_finish) = recording();
        let effect = TypedEffect::spawn(
            "A rather long line of dialogue.".to_owned(),
            Duration::from_secs(10),
            emitter,
            on_finish,
        );
        let started = tokio::time::Instant::now();

        // Act
        assert!(effect.skip());
        wait_done(effect.waiter()).await;

        // Assert
        assert!(started.elapsed() < Duration::from_secs(10));
        let revealed = lines(&mut rx);
        assert_eq!(revealed.len(), 1);
        assert_eq!(revealed[0].text, "A rather long line of dialogue.");
        assert!(revealed[0].is_complete);
        assert_eq!(*outcomes.lock().unwrap(), vec![EffectOutcome::Skipped]);
        assert!(!effect.skip());
    }

    #[tokio::test(start_paused = true)]
    async fn test_halt_stops_without_revealing_rest() {
        // Arrange
        let (emitter, mut rx) = emitter();
        let (outcomes, on_finish) = recording();
        let effect =
            TypedEffect::spawn("Goodbye".to_owned(), Duration::from_millis(30), emitter, on_finish);
        tokio::time::sleep(Duration::from_millis(65)).await;

        // Act
        effect.halt();
        wait_done(effect.waiter()).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        // Assert
        let revealed = lines(&mut rx);
        assert!(revealed.len() < "Goodbye".len());
        assert!(revealed.iter().all(|l| !l.is_complete));
        assert!(outcomes.lock().unwrap().iter().all(|o| *o == EffectOutcome::Halted));
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_now_emits_full_line_once() {
        let (emitter, mut rx) = emitter();
        let (_outcomes, on_finish) = recording();
        let effect = TypedEffect::spawn(
            "Hint text".to_owned(),
            Duration::from_secs(1),
            Arc::clone(&emitter),
            on_finish,
        );

        assert!(effect.complete_now(&emitter));
        assert!(!effect.complete_now(&emitter));
        wait_done(effect.waiter()).await;

        let revealed = lines(&mut rx);
        assert_eq!(revealed.len(), 1);
        assert_eq!(revealed[0].text, "Hint text");
        assert!(revealed[0].is_complete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_line_completes_immediately() {
        let (emitter, mut rx) = emitter();
        let (outcomes, on_finish) = recording();

        let effect =
            TypedEffect::spawn(String::new(), Duration::from_millis(30), emitter, on_finish);
        wait_done(effect.waiter()).await;

        let revealed = lines(&mut rx);
        assert_eq!(revealed.len(), 1);
        assert!(revealed[0].is_complete);
        assert_eq!(*outcomes.lock().unwrap(), vec![EffectOutcome::Completed]);
    }
}
