//! Credential store abstraction.
//!
//! This module defines the [`CredentialStore`] trait that abstracts over the
//! persistence backend holding the passcode record. This allows swapping the
//! storage mechanism (or the comparison scheme) without changing the state
//! machine.
//!
//! # Design Philosophy
//!
//! The trait is deliberately narrow: one method per operation the session
//! controller actually performs, each an atomic read-modify-write over the
//! single credential record. Timestamps are supplied by the caller so that
//! implementations stay deterministic under test; only the session layer reads
//! the wall clock.
//!
//! Failures from these methods are infrastructure faults (I/O, corrupt data),
//! never business outcomes. A wrong passcode is a successful `record_attempt`
//! call that returns `false`.

use crate::domain::error::Result;
use crate::storage::models::CredentialRecord;

/// Abstraction over the persistent credential record.
///
/// Every method is an atomic read-modify-write: the returned record is the
/// state after the operation, and no partial update is ever observable.
///
/// # Implementations
///
/// - [`JsonCredentialStore`](crate::storage::JsonCredentialStore): single JSON
///   file with atomic writes (default)
pub trait CredentialStore: Send {
    /// Reads the current record, returning defaults if none has been persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn read(&self) -> Result<CredentialRecord>;

    /// Sets the passcode, clearing `lockout_until` and `failed_attempts`.
    ///
    /// Returns the record after the write.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn set_passcode(&mut self, value: &str) -> Result<CredentialRecord>;

    /// Clears the passcode, `lockout_until`, and `failed_attempts`.
    ///
    /// Returns the record after the write.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn clear_passcode(&mut self) -> Result<CredentialRecord>;

    /// Scores an unlock attempt against the stored passcode.
    ///
    /// On a match, clears `lockout_until` and `failed_attempts` and returns
    /// `(true, record)`. On a mismatch, increments `failed_attempts`
    /// (saturating at [`MAX_FAILED_ATTEMPTS`]), stamps `lockout_until` to
    /// `now_ms` plus [`LOCKOUT_WINDOW_MS`] — every mismatch refreshes the
    /// window — and returns `(false, record)`. An attempt while no passcode is
    /// configured is a mismatch.
    ///
    /// [`MAX_FAILED_ATTEMPTS`]: crate::domain::lockout::MAX_FAILED_ATTEMPTS
    /// [`LOCKOUT_WINDOW_MS`]: crate::domain::lockout::LOCKOUT_WINDOW_MS
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn record_attempt(&mut self, candidate: &str, now_ms: i64) -> Result<(bool, CredentialRecord)>;

    /// Clears `lockout_until` and `failed_attempts`, leaving the passcode
    /// untouched.
    ///
    /// Called once a lockout window has naturally expired, before the next
    /// attempt is scored.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn clear_lockout(&mut self) -> Result<CredentialRecord>;
}
