//! The session state machine.
//!
//! This module implements the pure reduction step of the pipeline: a total
//! function folding one [`SessionResult`] into a [`SessionState`] snapshot.
//! All screen-flow and error-display rules live here; the session controller
//! never touches state fields directly.
//!
//! The reducer never performs effects and never fails. Business failures —
//! wrong passcode, mismatched entries, active lockout — arrive as results and
//! leave as error-message fields on the produced snapshot.

use crate::app::events::SessionResult;
use crate::app::state::{Screen, SessionState};
use crate::domain::lockout::{MAX_FAILED_ATTEMPTS, PASSCODE_LEN};
use crate::storage::models::CredentialRecord;

/// Message shown when an unlock attempt is rejected.
pub const MSG_INCORRECT_PASSCODE: &str = "incorrect passcode";

/// Message shown while the failed-attempt lockout is active.
pub const MSG_TOO_MANY_ATTEMPTS: &str = "too many failed attempts";

/// Message shown when the two setup entries differ.
pub const MSG_ENTRIES_MISMATCH: &str = "entries do not match";

/// Folds a result into the session state, producing the next snapshot.
///
/// Total over the result vocabulary: unexpected combinations degrade to
/// no-ops rather than panics, so invariants (one active screen, confirmation
/// screen implies a pending first entry, lockout message implies a window
/// timestamp) hold after every application regardless of ordering.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn reduce(state: &SessionState, result: &SessionResult) -> SessionState {
    let _span = tracing::debug_span!("reduce", result_type = ?result).entered();

    let mut next = state.clone();
    next.suppress_emit = false;

    match result {
        SessionResult::Loading => {
            next.loading = true;
        }

        SessionResult::InitialLoadResult(record) => {
            next.loading = false;
            mirror_record(&mut next, record);
            next.screen = if record.passcode_enabled() {
                Screen::Login
            } else {
                Screen::Main
            };
            next.pending_first = None;
            next.pending_second = None;
            if record.failed_attempts >= MAX_FAILED_ATTEMPTS {
                next.lockout_error = Some(MSG_TOO_MANY_ATTEMPTS.to_string());
            } else {
                next.lockout_error = None;
                next.lockout_until = None;
            }
        }

        SessionResult::UnlockResult { success, record } => {
            next.loading = false;
            mirror_record(&mut next, record);
            next.pending_first = None;
            next.pending_second = None;
            next.second_entry_error = None;
            if *success {
                next.screen = Screen::Main;
                next.login_error = None;
                next.lockout_error = None;
                next.lockout_until = None;
            } else {
                next.screen = Screen::Login;
                next.login_error = Some(MSG_INCORRECT_PASSCODE.to_string());
                if record.failed_attempts >= MAX_FAILED_ATTEMPTS {
                    next.lockout_error = Some(MSG_TOO_MANY_ATTEMPTS.to_string());
                } else {
                    next.lockout_error = None;
                    next.lockout_until = None;
                }
            }
        }

        SessionResult::UnlockSkipped => {
            next = state.clone();
            next.suppress_emit = true;
        }

        SessionResult::PasscodeSetResult(record)
        | SessionResult::PasscodeClearedResult(record) => {
            next.loading = false;
            mirror_record(&mut next, record);
            next.screen = Screen::Main;
            next.pending_first = None;
            next.pending_second = None;
            next.login_error = None;
            next.second_entry_error = None;
            next.lockout_error = None;
            next.lockout_until = None;
        }

        SessionResult::EnablePasscodeRequested => {
            next.loading = false;
            next.screen = Screen::SetupFirst;
            next.pending_first = None;
            next.pending_second = None;
            next.login_error = None;
            next.second_entry_error = None;
            next.lockout_error = None;
        }

        SessionResult::FirstEntryConfirmed => {
            // Transition only on a complete first entry; the confirmation
            // screen must never appear without one.
            let complete = next
                .pending_first
                .as_ref()
                .is_some_and(|entry| entry.chars().count() == PASSCODE_LEN);
            if complete {
                next.loading = false;
                next.screen = Screen::SetupSecond;
                next.login_error = None;
                next.second_entry_error = None;
                next.lockout_error = None;
            }
        }

        SessionResult::FirstEntryChanged(text) => {
            next.pending_first = Some(text.clone());
        }

        SessionResult::SecondEntryChanged(text) => {
            next.pending_second = Some(text.clone());
        }

        SessionResult::EntriesMismatch => {
            // Only meaningful on the confirmation screen; elsewhere a no-op.
            if next.screen == Screen::SetupSecond {
                next.loading = false;
                next.second_entry_error = Some(MSG_ENTRIES_MISMATCH.to_string());
                next.login_error = None;
                next.lockout_error = None;
            }
        }

        SessionResult::PersistenceFailed(message) => {
            next.loading = false;
            next.storage_error = Some(message.clone());
        }
    }

    next
}

/// Mirrors record-derived fields into the snapshot.
fn mirror_record(next: &mut SessionState, record: &CredentialRecord) {
    next.passcode_enabled = record.passcode_enabled();
    next.failed_attempts = record.failed_attempts;
    next.lockout_until = record.lockout_until;
    next.storage_error = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: i64 = 1_700_000_000_000;

    fn record(passcode: Option<&str>, failed_attempts: u8, lockout_until: Option<i64>) -> CredentialRecord {
        CredentialRecord {
            passcode: passcode.map(str::to_string),
            lockout_until,
            failed_attempts,
        }
    }

    fn fold(state: SessionState, results: &[SessionResult]) -> SessionState {
        results.iter().fold(state, |state, result| reduce(&state, result))
    }

    #[test]
    fn loading_only_sets_the_flag() {
        let next = reduce(&SessionState::new(), &SessionResult::Loading);
        assert!(next.loading);
        assert_eq!(next.screen, Screen::Splash);
    }

    #[test]
    fn initial_load_without_passcode_goes_to_main() {
        let next = reduce(
            &SessionState::new(),
            &SessionResult::InitialLoadResult(record(None, 0, None)),
        );
        assert_eq!(next.screen, Screen::Main);
        assert!(!next.passcode_enabled);
        assert!(!next.loading);
    }

    #[test]
    fn initial_load_with_passcode_goes_to_login() {
        let next = reduce(
            &SessionState::new(),
            &SessionResult::InitialLoadResult(record(Some("1234"), 0, None)),
        );
        assert_eq!(next.screen, Screen::Login);
        assert!(next.passcode_enabled);
        assert!(next.lockout_error.is_none());
    }

    #[test]
    fn initial_load_with_active_lockout_sets_lockout_error() {
        let until = NOW_MS + 30_000;
        let next = reduce(
            &SessionState::new(),
            &SessionResult::InitialLoadResult(record(Some("1234"), 3, Some(until))),
        );
        assert_eq!(next.screen, Screen::Login);
        assert_eq!(next.lockout_error.as_deref(), Some(MSG_TOO_MANY_ATTEMPTS));
        assert_eq!(next.lockout_until, Some(until));
        assert_eq!(next.failed_attempts, 3);
    }

    #[test]
    fn successful_unlock_clears_errors_and_lockout() {
        let state = SessionState {
            screen: Screen::Login,
            passcode_enabled: true,
            login_error: Some(MSG_INCORRECT_PASSCODE.to_string()),
            lockout_error: Some(MSG_TOO_MANY_ATTEMPTS.to_string()),
            lockout_until: Some(NOW_MS),
            failed_attempts: 3,
            ..SessionState::new()
        };
        let next = reduce(
            &state,
            &SessionResult::UnlockResult {
                success: true,
                record: record(Some("1234"), 0, None),
            },
        );
        assert_eq!(next.screen, Screen::Main);
        assert!(next.login_error.is_none());
        assert!(next.lockout_error.is_none());
        assert!(next.lockout_until.is_none());
        assert_eq!(next.failed_attempts, 0);
    }

    #[test]
    fn failed_unlock_below_threshold_sets_login_error_only() {
        let state = SessionState {
            screen: Screen::Login,
            passcode_enabled: true,
            ..SessionState::new()
        };
        let next = reduce(
            &state,
            &SessionResult::UnlockResult {
                success: false,
                record: record(Some("1234"), 1, Some(NOW_MS + 60_000)),
            },
        );
        assert_eq!(next.screen, Screen::Login);
        assert_eq!(next.login_error.as_deref(), Some(MSG_INCORRECT_PASSCODE));
        assert!(next.lockout_error.is_none());
        assert!(next.lockout_until.is_none());
        assert_eq!(next.failed_attempts, 1);
    }

    #[test]
    fn failed_unlock_at_threshold_sets_both_errors_and_window() {
        let until = NOW_MS + 60_000;
        let state = SessionState {
            screen: Screen::Login,
            passcode_enabled: true,
            failed_attempts: 2,
            ..SessionState::new()
        };
        let next = reduce(
            &state,
            &SessionResult::UnlockResult {
                success: false,
                record: record(Some("1234"), 3, Some(until)),
            },
        );
        assert_eq!(next.login_error.as_deref(), Some(MSG_INCORRECT_PASSCODE));
        assert_eq!(next.lockout_error.as_deref(), Some(MSG_TOO_MANY_ATTEMPTS));
        assert_eq!(next.lockout_until, Some(until));
    }

    #[test]
    fn unlock_skipped_changes_only_the_suppress_flag() {
        let state = SessionState {
            screen: Screen::Login,
            passcode_enabled: true,
            loading: true,
            lockout_error: Some(MSG_TOO_MANY_ATTEMPTS.to_string()),
            lockout_until: Some(NOW_MS + 10_000),
            failed_attempts: 3,
            ..SessionState::new()
        };
        let next = reduce(&state, &SessionResult::UnlockSkipped);
        assert!(next.suppress_emit);
        let mut unsuppressed = next.clone();
        unsuppressed.suppress_emit = state.suppress_emit;
        assert_eq!(unsuppressed, state);
    }

    #[test]
    fn setup_flow_matching_entries_reaches_main() {
        let state = fold(
            SessionState::new(),
            &[
                SessionResult::InitialLoadResult(record(None, 0, None)),
                SessionResult::EnablePasscodeRequested,
                SessionResult::FirstEntryChanged("1234".to_string()),
                SessionResult::FirstEntryConfirmed,
                SessionResult::SecondEntryChanged("1234".to_string()),
                SessionResult::PasscodeSetResult(record(Some("1234"), 0, None)),
            ],
        );
        assert_eq!(state.screen, Screen::Main);
        assert!(state.passcode_enabled);
        assert!(state.pending_first.is_none());
        assert!(state.pending_second.is_none());
        assert!(state.second_entry_error.is_none());
    }

    #[test]
    fn setup_flow_mismatched_entries_stays_on_confirmation() {
        let state = fold(
            SessionState::new(),
            &[
                SessionResult::InitialLoadResult(record(None, 0, None)),
                SessionResult::EnablePasscodeRequested,
                SessionResult::FirstEntryChanged("1234".to_string()),
                SessionResult::FirstEntryConfirmed,
                SessionResult::SecondEntryChanged("5678".to_string()),
                SessionResult::EntriesMismatch,
            ],
        );
        assert_eq!(state.screen, Screen::SetupSecond);
        assert_eq!(state.second_entry_error.as_deref(), Some(MSG_ENTRIES_MISMATCH));
        assert_eq!(state.pending_first.as_deref(), Some("1234"));
    }

    #[test]
    fn first_entry_confirm_requires_four_characters() {
        let state = fold(
            SessionState::new(),
            &[
                SessionResult::EnablePasscodeRequested,
                SessionResult::FirstEntryChanged("12".to_string()),
                SessionResult::FirstEntryConfirmed,
            ],
        );
        assert_eq!(state.screen, Screen::SetupFirst);

        let state = fold(state, &[SessionResult::FirstEntryConfirmed]);
        assert_eq!(state.screen, Screen::SetupFirst);
    }

    #[test]
    fn enable_request_clears_stale_entries_and_errors() {
        let state = SessionState {
            screen: Screen::Main,
            pending_first: Some("9999".to_string()),
            pending_second: Some("1111".to_string()),
            login_error: Some(MSG_INCORRECT_PASSCODE.to_string()),
            second_entry_error: Some(MSG_ENTRIES_MISMATCH.to_string()),
            ..SessionState::new()
        };
        let next = reduce(&state, &SessionResult::EnablePasscodeRequested);
        assert_eq!(next.screen, Screen::SetupFirst);
        assert!(next.pending_first.is_none());
        assert!(next.pending_second.is_none());
        assert!(next.login_error.is_none());
        assert!(next.second_entry_error.is_none());
    }

    #[test]
    fn passcode_cleared_returns_to_main_and_disables_gate() {
        let state = SessionState {
            screen: Screen::Main,
            passcode_enabled: true,
            ..SessionState::new()
        };
        let next = reduce(
            &state,
            &SessionResult::PasscodeClearedResult(record(None, 0, None)),
        );
        assert_eq!(next.screen, Screen::Main);
        assert!(!next.passcode_enabled);
    }

    #[test]
    fn persistence_failure_surfaces_message_without_screen_change() {
        let state = SessionState {
            screen: Screen::Login,
            passcode_enabled: true,
            loading: true,
            ..SessionState::new()
        };
        let next = reduce(
            &state,
            &SessionResult::PersistenceFailed("disk full".to_string()),
        );
        assert_eq!(next.screen, Screen::Login);
        assert!(!next.loading);
        assert_eq!(next.storage_error.as_deref(), Some("disk full"));
    }

    /// Applies every result variant from a set of reachable states and checks
    /// the structural invariants after each application.
    #[test]
    fn invariants_hold_under_exhaustive_result_application() {
        let all_results = |now_ms: i64| -> Vec<SessionResult> {
            vec![
                SessionResult::Loading,
                SessionResult::InitialLoadResult(record(None, 0, None)),
                SessionResult::InitialLoadResult(record(Some("1234"), 0, None)),
                SessionResult::InitialLoadResult(record(Some("1234"), 3, Some(now_ms + 60_000))),
                SessionResult::UnlockResult {
                    success: true,
                    record: record(Some("1234"), 0, None),
                },
                SessionResult::UnlockResult {
                    success: false,
                    record: record(Some("1234"), 1, Some(now_ms + 60_000)),
                },
                SessionResult::UnlockResult {
                    success: false,
                    record: record(Some("1234"), 3, Some(now_ms + 60_000)),
                },
                SessionResult::UnlockSkipped,
                SessionResult::PasscodeSetResult(record(Some("1234"), 0, None)),
                SessionResult::PasscodeClearedResult(record(None, 0, None)),
                SessionResult::EnablePasscodeRequested,
                SessionResult::FirstEntryConfirmed,
                SessionResult::FirstEntryChanged("1234".to_string()),
                SessionResult::FirstEntryChanged("12".to_string()),
                SessionResult::SecondEntryChanged("5678".to_string()),
                SessionResult::EntriesMismatch,
                SessionResult::PersistenceFailed("disk full".to_string()),
            ]
        };

        let check = |state: &SessionState| {
            if state.screen == Screen::SetupSecond {
                assert!(
                    state.pending_first.is_some(),
                    "confirmation screen without a first entry: {state:?}"
                );
            }
            if state.screen == Screen::Login {
                assert!(state.passcode_enabled, "login screen with gate disabled: {state:?}");
            }
            if state.lockout_error.is_some() {
                let until = state
                    .lockout_until
                    .expect("lockout message without a window timestamp");
                assert!(until > NOW_MS, "lockout message with an elapsed window");
            }
        };

        // Breadth-first over reachable states, two folds deep from every
        // reachable frontier state; enough to cross every transition edge.
        let mut frontier = vec![SessionState::new()];
        for _ in 0..2 {
            let mut next_frontier = Vec::new();
            for state in &frontier {
                check(state);
                for result in all_results(NOW_MS) {
                    let next = reduce(state, &result);
                    check(&next);
                    next_frontier.push(next);
                }
            }
            frontier = next_frontier;
            frontier.dedup();
        }
    }
}
