//! applock: a device-local passcode gate.
//!
//! applock gates access to an application behind a 4-digit passcode:
//! - Two-step entry-and-confirm setup flow
//! - Unlock attempts scored against a persisted credential record
//! - A 60-second lockout after three consecutive failures, with a
//!   once-per-second countdown for display
//! - A single observable state stream driving the presentation layer
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Session Layer (session/)                           │  ← Effect pipelines
//! │  - Intent methods → Actions → store effects         │  ← State publishing
//! │  - One worker task, one serialized fold sequence    │
//! │  - Lockout countdown timer                          │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Action/result vocabulary                         │  ← Pure reduction
//! │  - Reducer folding results into SessionState        │
//! └─────────────────────────────────────────────────────┘
//!         │                              │
//! ┌───────────────────┐      ┌───────────────────────┐
//! │ Storage Layer     │      │ Domain Layer          │
//! │ (storage/)        │      │ (domain/)             │
//! │ - Store trait     │      │ - Lockout policy      │
//! │ - JSON backend    │      │ - Error types         │
//! └───────────────────┘      └───────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Observability                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Tracing setup (observability/)                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Data Flow
//!
//! User intent enters through a [`SessionController`] method, becomes an
//! [`Action`], triggers at most one effect against the [`CredentialStore`],
//! and completes as a [`SessionResult`]. Pure UI events skip the effect and
//! enter as results directly. Every result is folded through [`reduce`] one
//! at a time, and each non-suppressed snapshot is published to subscribers.
//!
//! # Example
//!
//! ```no_run
//! use applock::{initialize, Config, Screen};
//!
//! # async fn run() -> applock::Result<()> {
//! let controller = initialize(&Config::from_env())?;
//! let mut states = controller.subscribe();
//!
//! while states.changed().await.is_ok() {
//!     let state = states.borrow().clone();
//!     match state.screen {
//!         Screen::Login => { /* render passcode prompt */ }
//!         Screen::Main => { /* render unlocked app */ }
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! The passcode is stored and compared in clear form, matching the reference
//! behavior this crate reimplements. The [`CredentialStore`] trait isolates
//! the comparison, so a salted-hash backend can be substituted without
//! touching the state machine.

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod session;
pub mod storage;

pub use app::{reduce, Action, Screen, SessionResult, SessionState};
pub use domain::{AppLockError, LockoutStatus, Result};
pub use session::{LockoutCountdown, SessionController};
pub use storage::{CredentialRecord, CredentialStore, JsonCredentialStore};

use std::path::PathBuf;

/// Crate configuration.
///
/// Everything is optional; defaults resolve to the platform data directory
/// and info-level tracing.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Directory holding the credential record and log file.
    ///
    /// Default: `<platform data dir>/applock`.
    pub data_dir: Option<PathBuf>,

    /// Tracing level directive, e.g. `"debug"` or `"applock=trace"`.
    ///
    /// Default: `"info"`.
    pub trace_level: Option<String>,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Parsing Rules
    ///
    /// - `APPLOCK_DATA_DIR`: path → `data_dir` (empty values ignored)
    /// - `APPLOCK_TRACE_LEVEL`: string → `trace_level` (empty values ignored)
    ///
    /// Unset or empty variables fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var_os("APPLOCK_DATA_DIR")
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            trace_level: std::env::var("APPLOCK_TRACE_LEVEL")
                .ok()
                .filter(|value| !value.is_empty()),
        }
    }
}

/// Initializes the passcode gate with the given configuration.
///
/// Sets up tracing, opens the JSON credential store inside the configured or
/// default data directory, spawns the session controller, and dispatches the
/// initial load so the first published snapshot already reflects the
/// persisted record.
///
/// Must be called within a Tokio runtime.
///
/// # Errors
///
/// Returns an error if the credential store cannot be opened.
pub fn initialize(config: &Config) -> Result<SessionController> {
    observability::init_tracing(config);
    tracing::debug!("initializing applock");

    let data_dir = config
        .data_dir
        .clone()
        .unwrap_or_else(infrastructure::paths::default_data_dir);
    let store = JsonCredentialStore::open(infrastructure::paths::credentials_file(&data_dir))?;

    let controller = SessionController::spawn(store);
    controller.reload()?;
    Ok(controller)
}
