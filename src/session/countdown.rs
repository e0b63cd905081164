//! Lockout countdown timer.
//!
//! A cancellable, restartable once-per-second ticker for rendering the
//! remaining lockout time. The core state machine only exposes
//! `lockout_until`; whichever component renders the lockout message owns one
//! of these and starts it from that timestamp.
//!
//! At most one countdown task is ever active: starting a new countdown
//! replaces the previous one, and cancelling or dropping the owner stops it.

use crate::domain::lockout;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Publishes the remaining whole seconds of a lockout window, once per second.
///
/// Subscribers receive `Some(seconds)` while a window is counting down and
/// `None` once it expires or is cancelled.
///
/// # Examples
///
/// ```no_run
/// use applock::session::LockoutCountdown;
///
/// # async fn run() {
/// let mut countdown = LockoutCountdown::new();
/// let mut remaining = countdown.subscribe();
///
/// countdown.start(chrono::Utc::now().timestamp_millis() + 60_000,
///                 chrono::Utc::now().timestamp_millis());
/// while remaining.changed().await.is_ok() {
///     match *remaining.borrow() {
///         Some(seconds) => println!("locked for {seconds}s"),
///         None => break,
///     }
/// }
/// # }
/// ```
pub struct LockoutCountdown {
    /// Publishing side, shared with the active task.
    remaining: watch::Sender<Option<i64>>,

    /// Kept so `subscribe` works even with no subscribers yet.
    subscribers: watch::Receiver<Option<i64>>,

    /// The active ticker task, if any.
    task: Option<JoinHandle<()>>,
}

impl LockoutCountdown {
    /// Creates an idle countdown publishing `None`.
    #[must_use]
    pub fn new() -> Self {
        let (remaining, subscribers) = watch::channel(None);
        Self {
            remaining,
            subscribers,
            task: None,
        }
    }

    /// Returns a receiver over the remaining-seconds stream.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<i64>> {
        self.subscribers.clone()
    }

    /// Starts counting down to `until_ms`, replacing any active countdown.
    ///
    /// Publishes the initial remaining seconds immediately, then one update
    /// per second until expiry, ending with `None`. A timestamp already in the
    /// past publishes `None` without spawning a task.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(&mut self, until_ms: i64, now_ms: i64) {
        self.stop_task();

        let mut remaining = lockout::remaining_seconds(until_ms, now_ms);
        if remaining == 0 {
            let _ = self.remaining.send(None);
            return;
        }

        tracing::debug!(remaining_seconds = remaining, "starting lockout countdown");
        let _ = self.remaining.send(Some(remaining));

        let publisher = self.remaining.clone();
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately; consume it so each later
            // tick lands one second apart.
            ticker.tick().await;

            while remaining > 0 {
                ticker.tick().await;
                remaining -= 1;
                let update = if remaining > 0 { Some(remaining) } else { None };
                if publisher.send(update).is_err() {
                    break;
                }
            }
        }));
    }

    /// Cancels the active countdown, publishing `None`.
    pub fn cancel(&mut self) {
        self.stop_task();
        let _ = self.remaining.send(None);
    }

    /// True while a countdown task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn stop_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Default for LockoutCountdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LockoutCountdown {
    fn drop(&mut self) {
        self.stop_task();
    }
}
