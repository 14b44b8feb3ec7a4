//! Per-question countdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Counts a question's time limit down one tick at a time on its own task.
///
/// `on_tick` receives the seconds left after each tick; `on_expire` runs once
/// after the tick that reaches zero. Dropping the timer stops it.
#[derive(Debug)]
pub struct QuestionTimer {
    remaining: Arc<AtomicU32>,
    handle: JoinHandle<()>,
}

impl QuestionTimer {
    /// Starts counting down from `limit_secs`.
    pub(crate) fn spawn<T, E>(limit_secs: u32, tick: Duration, on_tick: T, on_expire: E) -> Self
    where
        T: Fn(u32) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        let remaining = Arc::new(AtomicU32::new(limit_secs));
        let counter = Arc::clone(&remaining);
        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + tick, tick);
            loop {
                if counter.load(Ordering::SeqCst) == 0 {
                    break;
                }
                ticks.tick().await;
                let left = counter.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
                on_tick(left);
                if left == 0 {
                    break;
                }
            }
            on_expire();
        });
        Self { remaining, handle }
    }

    /// Seconds left on the clock.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining.load(Ordering::SeqCst)
    }

    /// Stops the countdown. `on_expire` will not run afterwards unless it is
    /// already running.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicBool;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_counts_down_and_expires() {
        // Arrange
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let expired = Arc::new(AtomicBool::new(false));
        let (t, e) = (Arc::clone(&ticks), Arc::clone(&expired));

        // Act
        let timer = QuestionTimer::spawn(
            3,
            Duration::from_secs(1),
            move |left| t.lock().unwrap().push(left),
            move || e.store(true, Ordering::SeqCst),
        );
        tokio::time::sleep(Duration::from_millis(3500)).await;

        // Assert
        assert_eq!(*ticks.lock().unwrap(), vec![2, 1, 0]);
        assert!(expired.load(Ordering::SeqCst));
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_expiry() {
        let expired = Arc::new(AtomicBool::new(false));
        let e = Arc::clone(&expired);
        let timer = QuestionTimer::spawn(2, Duration::from_secs(1), |_| {}, move || {
            e.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        timer.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(timer.remaining_secs(), 1);
        assert!(!expired.load(Ordering::SeqCst));
    }
}
