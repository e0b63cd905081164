//! The session controller: effect orchestration and state publishing.
//!
//! This module owns the asynchronous half of the pipeline. A single worker
//! task holds the credential store, the reducer, and the current state; every
//! intent — effectful or pure — enters through one queue and every resulting
//! fold happens on that task, one result at a time, in emission order. That
//! single-writer discipline is what makes the published state stream
//! deterministic without any locking around the store.
//!
//! # Effect pipelines
//!
//! Each [`Action`] maps to one store operation. The pipeline publishes
//! [`SessionResult::Loading`] immediately, runs the operation, then publishes
//! the terminal result. Store failures fold
//! [`SessionResult::PersistenceFailed`] instead of tearing the session down.
//!
//! Unlock attempts are rerouted through the expired-lockout pipeline whenever
//! the current state shows a saturated failed-attempt counter, so an expired
//! window is cleared transactionally before the new attempt is scored — and a
//! still-active window yields a suppressed no-op rather than a fresh score.

use crate::app::events::{Action, SessionResult};
use crate::app::reducer::reduce;
use crate::app::state::SessionState;
use crate::domain::error::{AppLockError, Result};
use crate::domain::lockout::{self, LockoutStatus, MAX_FAILED_ATTEMPTS};
use crate::storage::backend::CredentialStore;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Inputs accepted by the worker task.
///
/// Pure UI events travel as ready-made results; effectful intents travel as
/// actions. Both share one queue so fold order matches emission order.
enum Input {
    /// Run an effect pipeline for this action.
    Act(Action),

    /// Fold a ready result with no effect.
    Fold(SessionResult),

    /// Compare the pending setup entries and either persist the passcode or
    /// fold a mismatch. Resolved on the worker so the comparison always sees
    /// every entry change queued before the confirm.
    ConfirmSecondEntry,
}

/// Orchestrates effects against the credential store and publishes
/// [`SessionState`] snapshots to observers.
///
/// One controller exists per active session. Intents are accepted through the
/// public methods; observers subscribe to the state stream and always see the
/// latest snapshot on subscription. Dropping the controller aborts the worker
/// task, cancelling any pending effect without surfacing its result.
///
/// # Examples
///
/// ```no_run
/// use applock::session::SessionController;
/// use applock::storage::JsonCredentialStore;
/// use std::path::PathBuf;
///
/// # async fn run() -> applock::Result<()> {
/// let store = JsonCredentialStore::open(PathBuf::from("/tmp/credentials.json"))?;
/// let controller = SessionController::spawn(store);
/// let mut states = controller.subscribe();
///
/// controller.reload()?;
/// states.changed().await.ok();
/// println!("screen: {:?}", states.borrow().screen);
/// # Ok(())
/// # }
/// ```
pub struct SessionController {
    /// Intent queue into the worker task.
    inputs: mpsc::UnboundedSender<Input>,

    /// Latest published snapshot, cloned out to subscribers.
    states: watch::Receiver<SessionState>,

    /// The worker task, aborted on drop.
    worker: JoinHandle<()>,
}

impl SessionController {
    /// Spawns a controller over the given credential store.
    ///
    /// Must be called within a Tokio runtime. The store moves onto the worker
    /// task and is never touched from anywhere else.
    #[must_use]
    pub fn spawn<S>(store: S) -> Self
    where
        S: CredentialStore + 'static,
    {
        let (inputs, inputs_rx) = mpsc::unbounded_channel();
        let (states_tx, states) = watch::channel(SessionState::new());
        let worker = tokio::spawn(run_worker(store, inputs_rx, states_tx));

        Self {
            inputs,
            states,
            worker,
        }
    }

    /// Returns a receiver over the published state stream.
    ///
    /// The receiver holds the latest snapshot immediately; suppressed results
    /// never surface here.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.states.clone()
    }

    /// Returns a clone of the latest published snapshot.
    #[must_use]
    pub fn current_state(&self) -> SessionState {
        self.states.borrow().clone()
    }

    /// Loads the persisted record and resolves the starting screen.
    ///
    /// Dispatch on session start and on every resume; an expired lockout is
    /// cleared as part of the load.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker task is gone.
    pub fn reload(&self) -> Result<()> {
        self.send(Input::Act(Action::InitialLoad))
    }

    /// Scores an unlock attempt against the stored passcode.
    ///
    /// Rerouted through the expired-lockout pipeline while the failed-attempt
    /// counter is saturated.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker task is gone.
    pub fn attempt_unlock(&self, candidate: impl Into<String>) -> Result<()> {
        self.send(Input::Act(Action::AttemptUnlock(candidate.into())))
    }

    /// Removes the passcode and disables the gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker task is gone.
    pub fn disable_passcode(&self) -> Result<()> {
        self.send(Input::Act(Action::ClearPasscode))
    }

    /// The user asked to enable the passcode gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker task is gone.
    pub fn enable_passcode_requested(&self) -> Result<()> {
        self.send(Input::Fold(SessionResult::EnablePasscodeRequested))
    }

    /// The first setup entry text changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker task is gone.
    pub fn first_entry_changed(&self, text: impl Into<String>) -> Result<()> {
        self.send(Input::Fold(SessionResult::FirstEntryChanged(text.into())))
    }

    /// The confirmation entry text changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker task is gone.
    pub fn second_entry_changed(&self, text: impl Into<String>) -> Result<()> {
        self.send(Input::Fold(SessionResult::SecondEntryChanged(text.into())))
    }

    /// The user confirmed the first setup entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker task is gone.
    pub fn first_entry_confirmed(&self) -> Result<()> {
        self.send(Input::Fold(SessionResult::FirstEntryConfirmed))
    }

    /// The user confirmed the second setup entry.
    ///
    /// Equal, present entries persist the passcode; anything else folds a
    /// mismatch and stays on the confirmation screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker task is gone.
    pub fn second_entry_confirmed(&self) -> Result<()> {
        self.send(Input::ConfirmSecondEntry)
    }

    fn send(&self, input: Input) -> Result<()> {
        self.inputs
            .send(input)
            .map_err(|_| AppLockError::Session("session worker is gone".to_string()))
    }
}

impl Drop for SessionController {
    /// Ends the session: cancels any pending effect without surfacing its
    /// result.
    fn drop(&mut self) {
        self.worker.abort();
    }
}

/// The worker loop: one queue in, one serialized fold sequence out.
async fn run_worker<S>(
    mut store: S,
    mut inputs: mpsc::UnboundedReceiver<Input>,
    states: watch::Sender<SessionState>,
) where
    S: CredentialStore,
{
    let mut state = SessionState::new();

    while let Some(input) = inputs.recv().await {
        match input {
            Input::Fold(result) => fold(&mut state, &states, result),
            Input::Act(action) => {
                let action = route(&state, action);
                run_pipeline(&mut store, &mut state, &states, &action);
            }
            Input::ConfirmSecondEntry => {
                let confirmed = match (&state.pending_first, &state.pending_second) {
                    (Some(first), Some(second)) if first == second => Some(first.clone()),
                    _ => None,
                };
                match confirmed {
                    Some(value) => {
                        let action = Action::SetPasscode(value);
                        run_pipeline(&mut store, &mut state, &states, &action);
                    }
                    None => fold(&mut state, &states, SessionResult::EntriesMismatch),
                }
            }
        }
    }

    tracing::debug!("session input queue closed, worker stopping");
}

/// Reroutes unlock attempts while the failed-attempt counter is saturated.
fn route(state: &SessionState, action: Action) -> Action {
    match action {
        Action::AttemptUnlock(candidate) if state.failed_attempts >= MAX_FAILED_ATTEMPTS => {
            tracing::debug!("rerouting unlock attempt through expired-lockout pipeline");
            Action::AttemptUnlockAfterExpiredLockout(candidate)
        }
        other => other,
    }
}

/// Runs one effect pipeline: `Loading` first, then the terminal result.
fn run_pipeline<S>(
    store: &mut S,
    state: &mut SessionState,
    states: &watch::Sender<SessionState>,
    action: &Action,
) where
    S: CredentialStore,
{
    let _span = tracing::debug_span!("effect_pipeline", action_type = ?action).entered();

    fold(state, states, SessionResult::Loading);
    let result = run_effect(store, action);
    fold(state, states, result);
}

/// Executes the store operation for an action, converting store failures into
/// the distinct persistence-failure result.
fn run_effect<S>(store: &mut S, action: &Action) -> SessionResult
where
    S: CredentialStore,
{
    let now_ms = chrono::Utc::now().timestamp_millis();

    let outcome = match action {
        Action::InitialLoad => initial_load(store, now_ms),
        Action::AttemptUnlock(candidate) => store
            .record_attempt(candidate, now_ms)
            .map(|(success, record)| SessionResult::UnlockResult { success, record }),
        Action::AttemptUnlockAfterExpiredLockout(candidate) => {
            attempt_after_lockout(store, candidate, now_ms)
        }
        Action::SetPasscode(value) => store
            .set_passcode(value)
            .map(SessionResult::PasscodeSetResult),
        Action::ClearPasscode => store
            .clear_passcode()
            .map(SessionResult::PasscodeClearedResult),
    };

    outcome.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "credential store operation failed");
        SessionResult::PersistenceFailed(e.to_string())
    })
}

/// Reads the record, clearing a lockout whose window has already passed.
fn initial_load<S>(store: &mut S, now_ms: i64) -> Result<SessionResult>
where
    S: CredentialStore,
{
    let record = store.read()?;
    let record = match lockout::evaluate(&record, now_ms) {
        LockoutStatus::Expired => store.clear_lockout()?,
        _ => record,
    };
    Ok(SessionResult::InitialLoadResult(record))
}

/// Clears an expired lockout transactionally, then scores the attempt.
///
/// While the window is still active the attempt is rejected without a store
/// mutation and the fold is suppressed.
fn attempt_after_lockout<S>(store: &mut S, candidate: &str, now_ms: i64) -> Result<SessionResult>
where
    S: CredentialStore,
{
    let record = store.read()?;
    match lockout::evaluate(&record, now_ms) {
        LockoutStatus::Expired => {
            store.clear_lockout()?;
            let (success, record) = store.record_attempt(candidate, now_ms)?;
            Ok(SessionResult::UnlockResult { success, record })
        }
        _ => Ok(SessionResult::UnlockSkipped),
    }
}

/// Folds one result and publishes the snapshot unless it is suppressed.
fn fold(state: &mut SessionState, states: &watch::Sender<SessionState>, result: SessionResult) {
    let next = reduce(state, &result);
    let suppressed = next.suppress_emit;
    *state = next.clone();

    if suppressed {
        tracing::debug!("state transition suppressed");
    } else {
        let _ = states.send(next);
    }
}
