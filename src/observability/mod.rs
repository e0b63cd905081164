//! Tracing setup for the passcode gate.
//!
//! All modules instrument with `tracing` spans and events; this module wires
//! the subscriber that collects them. Logging is strictly best-effort: any
//! failure to set it up leaves the gate fully functional, just quiet.

mod init;

pub use init::init_tracing;
