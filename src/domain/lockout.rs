//! Failed-attempt lockout policy.
//!
//! Pure decision logic for the rate limit applied after repeated unlock failures.
//! All functions here take caller-supplied epoch-millisecond timestamps, keeping
//! the policy deterministic and trivially testable; the session layer is the only
//! place that reads the wall clock.
//!
//! # Policy
//!
//! A session is **blocked** while the record shows `failed_attempts >= 3` and
//! `lockout_until` lies in the future. Once `lockout_until` has passed, the
//! lockout is **expired**: the caller must clear it through the credential store
//! before the next attempt is scored. The failed-attempt counter saturates at 3,
//! but every further mismatch refreshes `lockout_until` to a fresh 60-second
//! window.

use crate::storage::models::CredentialRecord;

/// Number of consecutive failed attempts that triggers a lockout.
///
/// The stored counter saturates at this value.
pub const MAX_FAILED_ATTEMPTS: u8 = 3;

/// Length of the lockout window in milliseconds, starting at the most recent
/// failed attempt.
pub const LOCKOUT_WINDOW_MS: i64 = 60_000;

/// Required passcode length in characters.
pub const PASSCODE_LEN: usize = 4;

/// Outcome of evaluating a credential record against the lockout policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutStatus {
    /// No lockout applies; attempts are scored normally.
    Clear,

    /// A lockout was in force but its window has passed. The caller must clear
    /// the lockout fields before accepting a new attempt.
    Expired,

    /// A lockout is active until the contained epoch-millisecond timestamp.
    /// Attempts must be rejected without being scored.
    Blocked {
        /// End of the lockout window, epoch milliseconds.
        until_ms: i64,
    },
}

/// Evaluates the lockout policy for a record at the given instant.
///
/// Blocked iff `failed_attempts >= 3` and `lockout_until > now`. A record with
/// `failed_attempts >= 3` whose timestamp has passed is `Expired`; anything
/// else is `Clear`. A saturated counter with no timestamp cannot occur through
/// the credential store operations, but is treated as `Expired` so a new
/// attempt always clears it first.
#[must_use]
pub fn evaluate(record: &CredentialRecord, now_ms: i64) -> LockoutStatus {
    if record.failed_attempts < MAX_FAILED_ATTEMPTS {
        return LockoutStatus::Clear;
    }
    match record.lockout_until {
        Some(until_ms) if until_ms > now_ms => LockoutStatus::Blocked { until_ms },
        _ => LockoutStatus::Expired,
    }
}

/// Remaining whole seconds of a lockout window for countdown display.
///
/// Rounds up, so a window with 100ms left still reads as 1 second. Returns 0
/// once `until_ms` has passed. Display granularity is 1 second.
#[must_use]
pub fn remaining_seconds(until_ms: i64, now_ms: i64) -> i64 {
    let remaining_ms = until_ms.saturating_sub(now_ms);
    if remaining_ms <= 0 {
        0
    } else {
        (remaining_ms + 999) / 1000
    }
}
