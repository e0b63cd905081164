//! Domain layer for the applock crate.
//!
//! This module contains the core business rules of the passcode gate,
//! independent of persistence or async runtime concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`lockout`]: Pure failed-attempt lockout policy

pub mod error;
pub mod lockout;

pub use error::{AppLockError, Result};
pub use lockout::{LockoutStatus, LOCKOUT_WINDOW_MS, MAX_FAILED_ATTEMPTS, PASSCODE_LEN};
