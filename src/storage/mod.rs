//! Storage layer for the persistent credential record.
//!
//! This module provides the persistence abstraction for the passcode record:
//! the configured passcode, the lockout window, and the failed-attempt count.
//! The default backend is a single JSON file with atomic writes.
//!
//! # Modules
//!
//! - `backend`: Credential store trait abstraction
//! - `json`: JSON file-based store implementation
//! - `models`: Persisted record type

pub mod backend;
pub mod json;
pub mod models;

pub use backend::CredentialStore;
pub use json::JsonCredentialStore;
pub use models::CredentialRecord;
