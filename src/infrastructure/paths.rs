//! Filesystem locations for persistent state.
//!
//! This module answers one question: where does the credential record live.
//! The platform-appropriate per-user data directory is resolved through the
//! `dirs` crate, with a current-directory fallback for stripped-down
//! environments that expose no home directory.

use std::path::{Path, PathBuf};

/// Returns the default data directory for applock state.
///
/// Resolves to `<platform data dir>/applock`, e.g.
/// `~/.local/share/applock` on Linux. Falls back to `./applock` when the
/// platform exposes no data directory.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("applock")
}

/// Returns the credential record path inside a data directory.
#[must_use]
pub fn credentials_file(data_dir: &Path) -> PathBuf {
    data_dir.join("credentials.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_file_is_fixed_within_the_data_dir() {
        let path = credentials_file(Path::new("/tmp/applock"));
        assert_eq!(path, PathBuf::from("/tmp/applock/credentials.json"));
    }

    #[test]
    fn default_data_dir_ends_with_crate_directory() {
        assert!(default_data_dir().ends_with("applock"));
    }
}
