//! Storage record models for the persistence layer.
//!
//! This module defines the raw storage record persisted by the credential store.
//! The record type is kept separate from session state to maintain a clear
//! boundary between the on-disk representation and the state machine.

use serde::{Deserialize, Serialize};

/// The persisted credential record.
///
/// This is the single durable record owned by the credential store. It holds
/// the configured passcode, the end of the current lockout window, and the
/// consecutive failed-attempt count. Absence of a persisted record is
/// equivalent to the all-empty default.
///
/// The passcode is stored and compared in clear form, matching the reference
/// behavior this gate reimplements. The store trait keeps a salted-hash
/// substitution possible without touching the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CredentialRecord {
    /// Configured passcode, `None` while the gate is disabled.
    pub passcode: Option<String>,

    /// End of the active lockout window as epoch milliseconds, `None` when no
    /// lockout is in force.
    pub lockout_until: Option<i64>,

    /// Consecutive failed unlock attempts, saturating at
    /// [`MAX_FAILED_ATTEMPTS`](crate::domain::lockout::MAX_FAILED_ATTEMPTS).
    #[serde(default)]
    pub failed_attempts: u8,
}

impl CredentialRecord {
    /// True when a passcode is configured and the gate is active.
    #[must_use]
    pub fn passcode_enabled(&self) -> bool {
        self.passcode.is_some()
    }
}
