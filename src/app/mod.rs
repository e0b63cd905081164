//! Application layer: the action→result→state reduction pipeline.
//!
//! This module defines the pure core of the passcode gate. It knows nothing
//! about persistence backends or async runtimes; the session layer feeds it
//! results and publishes the snapshots it produces.
//!
//! ```text
//! Intent → Action → Effect (session layer) → Result → reduce() → SessionState
//!                                 ↑                                   ↓
//!                                 └────────── observers ──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`events`]: The closed [`Action`] and [`SessionResult`] vocabulary
//! - [`reducer`]: The pure state machine folding results into state
//! - [`state`]: The [`SessionState`] snapshot and [`Screen`] mode

pub mod events;
pub mod reducer;
pub mod state;

pub use events::{Action, SessionResult};
pub use reducer::reduce;
pub use state::{Screen, SessionState};
