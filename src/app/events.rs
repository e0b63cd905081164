//! The closed action and result vocabulary of the session pipeline.
//!
//! This module defines the two enums that everything else is built around:
//! [`Action`], the set of intents that trigger effects against the credential
//! store, and [`SessionResult`], the set of outcomes — effect completions and
//! pure UI events alike — that the reducer folds into session state.
//!
//! Every action triggers at most one effect; every result is folded exactly
//! once, in emission order, through a single serialized sequence owned by the
//! session controller.

use crate::storage::models::CredentialRecord;

/// User or system intents that trigger an effect against the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Load the persisted record and resolve the starting screen.
    ///
    /// Dispatched when a session starts and again on every resume, so an
    /// expired lockout is cleared as soon as the app returns to the
    /// foreground.
    InitialLoad,

    /// Score an unlock attempt against the stored passcode.
    ///
    /// The controller reroutes this to
    /// [`AttemptUnlockAfterExpiredLockout`](Self::AttemptUnlockAfterExpiredLockout)
    /// whenever session state shows a saturated failed-attempt counter.
    AttemptUnlock(String),

    /// Persist a new passcode, clearing any lockout state.
    SetPasscode(String),

    /// Remove the passcode and disable the gate.
    ClearPasscode,

    /// Score an unlock attempt, first clearing a lockout whose window has
    /// expired.
    ///
    /// If the window is still active, the attempt is rejected without being
    /// scored and the pipeline yields [`SessionResult::UnlockSkipped`].
    AttemptUnlockAfterExpiredLockout(String),
}

/// Effect outcomes and pure UI events folded by the reducer.
///
/// Record-carrying variants hold the credential record as it stood after the
/// store operation completed, which the reducer mirrors into session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResult {
    /// An effect has started; published before its terminal result.
    Loading,

    /// Terminal result of [`Action::InitialLoad`].
    InitialLoadResult(CredentialRecord),

    /// Terminal result of a scored unlock attempt.
    UnlockResult {
        /// Whether the candidate matched the stored passcode.
        success: bool,
        /// Record state after the attempt was recorded.
        record: CredentialRecord,
    },

    /// An unlock attempt was rejected during an active lockout without being
    /// scored. Folding this must not produce an observable state transition.
    UnlockSkipped,

    /// Terminal result of [`Action::SetPasscode`].
    PasscodeSetResult(CredentialRecord),

    /// Terminal result of [`Action::ClearPasscode`].
    PasscodeClearedResult(CredentialRecord),

    /// The user asked to enable the passcode gate (pure UI event).
    EnablePasscodeRequested,

    /// The user confirmed the first setup entry (pure UI event).
    FirstEntryConfirmed,

    /// The first setup entry text changed (pure UI event).
    FirstEntryChanged(String),

    /// The confirmation entry text changed (pure UI event).
    SecondEntryChanged(String),

    /// The two setup entries did not match on confirm (pure UI event).
    EntriesMismatch,

    /// A credential store operation failed with an I/O fault.
    ///
    /// The in-flight effect is abandoned; the message is surfaced through
    /// session state instead of tearing the session down.
    PersistenceFailed(String),
}
