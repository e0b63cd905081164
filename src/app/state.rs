//! Session state container.
//!
//! This module defines [`SessionState`], the immutable snapshot published to
//! observers after every reducer application, and [`Screen`], the mutually
//! exclusive UI mode. It is the single source of truth for everything the
//! presentation layer renders.
//!
//! # State Components
//!
//! - **Screen**: which of the five UI modes is active — exactly one at a time,
//!   guaranteed structurally by the enum
//! - **Pending Entries**: in-progress setup entries, present only while their
//!   screen is visible
//! - **Error Messages**: independent optional inline messages for login,
//!   confirmation, and lockout failures
//! - **Lockout Mirror**: `lockout_until` and `failed_attempts` mirrored from
//!   the credential record to drive countdown display and attempt routing
//!
//! Snapshots are never mutated in place: the reducer produces a fresh state
//! for every result, and the session controller replaces its copy wholesale.

/// The mutually exclusive UI mode.
///
/// Exactly one screen is active at any time. The reference implementation
/// tracked five independent visibility booleans; collapsing them into an enum
/// makes the exclusivity invariant unrepresentable to violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Initial screen shown before the first load completes.
    #[default]
    Splash,

    /// Passcode entry screen, shown while a passcode is enabled.
    Login,

    /// First entry of the two-step setup flow.
    SetupFirst,

    /// Confirmation entry of the two-step setup flow.
    SetupSecond,

    /// The unlocked application screen.
    Main,
}

/// Immutable session state snapshot.
///
/// One instance exists per active session, owned by the session controller and
/// replaced on every folded result. All fields are plain data; observers
/// receive clones and never share mutable state with the controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Active screen.
    pub screen: Screen,

    /// Mirror of `CredentialRecord::passcode != None`.
    pub passcode_enabled: bool,

    /// In-progress first setup entry. Cleared whenever its screen is hidden.
    pub pending_first: Option<String>,

    /// In-progress confirmation entry. Cleared whenever its screen is hidden.
    pub pending_second: Option<String>,

    /// Inline message for a rejected unlock attempt.
    pub login_error: Option<String>,

    /// Inline message for mismatched setup entries.
    pub second_entry_error: Option<String>,

    /// Inline message for an active lockout.
    ///
    /// Set only while `lockout_until` holds a future timestamp; the countdown
    /// rendering is driven from that timestamp, not from this message.
    pub lockout_error: Option<String>,

    /// End of the active lockout window, epoch milliseconds, mirrored from the
    /// credential record.
    pub lockout_until: Option<i64>,

    /// Failed-attempt counter mirrored from the credential record.
    ///
    /// Used by the session controller to route unlock attempts through the
    /// expired-lockout pipeline once the counter saturates. The passcode
    /// itself is never mirrored into session state.
    pub failed_attempts: u8,

    /// True while an effect is in flight.
    pub loading: bool,

    /// True when this snapshot must not be broadcast to observers.
    ///
    /// Set by results that are deliberate no-ops, so a rejected attempt during
    /// an active lockout cannot reset transient UI state such as in-progress
    /// countdown text.
    pub suppress_emit: bool,

    /// Message from a failed credential store operation, if any.
    pub storage_error: Option<String>,
}

impl SessionState {
    /// Creates the initial session state: splash screen, nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
