//! Infrastructure layer: platform-specific utilities.
//!
//! - [`paths`]: Data directory and credential file locations

pub mod paths;

pub use paths::{credentials_file, default_data_dir};
