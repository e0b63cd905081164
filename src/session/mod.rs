//! Session layer: asynchronous effect orchestration.
//!
//! This module hosts the moving parts around the pure core: the controller
//! that turns intents into credential store effects and publishes state
//! snapshots, and the countdown timer that renders the lockout window.
//!
//! # Architecture
//!
//! - `controller`: Single-worker effect pipeline and state broadcasting
//! - `countdown`: Cancellable once-per-second lockout countdown

pub mod controller;
pub mod countdown;

pub use controller::SessionController;
pub use countdown::LockoutCountdown;
