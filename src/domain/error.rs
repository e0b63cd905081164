//! Error types for the applock crate.
//!
//! This module defines the centralized error type [`AppLockError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Note that business outcomes — an incorrect passcode, mismatched setup entries,
//! an active lockout — are never errors. They are modeled as session results and
//! resolved inside the reducer. Only infrastructure faults surface here.

use thiserror::Error;

/// The main error type for applock operations.
///
/// This enum consolidates the infrastructure error conditions that can occur while
/// running the passcode gate: credential store I/O, configuration problems, and
/// session channel faults. Most variants wrap underlying errors from external
/// crates using `#[from]` for automatic conversion.
#[derive(Debug, Error)]
pub enum AppLockError {
    /// Credential store operation failed.
    ///
    /// Occurs when reading from or writing to the persistence backend fails,
    /// including malformed JSON in the persisted record. The string contains
    /// a description of what went wrong.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Session controller communication failed.
    ///
    /// Occurs when the controller's worker task is gone and an intent can no
    /// longer be delivered, typically after the session has been shut down.
    #[error("session error: {0}")]
    Session(String),

    /// Configuration is invalid or missing.
    ///
    /// Occurs when required configuration values are missing or malformed.
    /// The string describes the specific configuration problem.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for applock operations.
///
/// This is a type alias for `std::result::Result<T, AppLockError>` that simplifies
/// function signatures throughout the codebase.
pub type Result<T> = std::result::Result<T, AppLockError>;
