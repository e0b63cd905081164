//! JSON file-based credential store.
//!
//! This module provides the default persistence backend: a single JSON file
//! holding one credential record. It uses atomic file writes (write-to-temp +
//! rename) so the record is never observable in a half-written state, even
//! across crashes.
//!
//! The record is cached in memory; every mutation updates the cache and
//! persists synchronously before returning, which is what makes each store
//! operation an atomic read-modify-write from the controller's point of view.

use crate::domain::error::{AppLockError, Result};
use crate::domain::lockout::{LOCKOUT_WINDOW_MS, MAX_FAILED_ATTEMPTS};
use crate::storage::backend::CredentialStore;
use crate::storage::models::CredentialRecord;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JSON container format.
///
/// Top-level structure serialized to disk. Wraps the record together with a
/// format version for future migrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Version of the storage format for future migrations.
    version: u32,

    /// The single credential record.
    #[serde(default)]
    record: CredentialRecord,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            record: CredentialRecord::default(),
        }
    }
}

/// JSON file credential store.
///
/// Stores the credential record in a human-readable JSON file with atomic
/// writes. The record is kept in memory and persisted on every mutation.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It is designed to be owned by the
/// session controller's single worker task, which serializes all access.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "record": {
///     "passcode": "1234",
///     "lockout_until": 1700000060000,
///     "failed_attempts": 2
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonCredentialStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory record cache, loaded on open.
    data: StoreData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonCredentialStore {
    /// Creates or opens a JSON credential store.
    ///
    /// If the file exists, loads the existing record. Otherwise starts from the
    /// all-empty default without touching the filesystem until the first write.
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but contains invalid JSON
    /// - File permissions prevent reading
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use applock::storage::JsonCredentialStore;
    /// use std::path::PathBuf;
    ///
    /// let store = JsonCredentialStore::open(PathBuf::from("/tmp/credentials.json"))?;
    /// # Ok::<(), applock::AppLockError>(())
    /// ```
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening credential store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no persisted record, starting from defaults");
            StoreData::default()
        };

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Loads store data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    fn load_from_file(path: &PathBuf) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StoreData = serde_json::from_str(&contents)
            .map_err(|e| AppLockError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(
            version = data.version,
            passcode_enabled = data.record.passcode_enabled(),
            failed_attempts = data.record.failed_attempts,
            "loaded credential record"
        );

        Ok(data)
    }

    /// Saves store data to disk using an atomic write.
    ///
    /// Writes to a temporary file first, then renames it over the target path,
    /// so the file is never left in a corrupt state if the process dies
    /// mid-write.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the temporary write, or the rename
    /// fails.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| AppLockError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "credential record saved");
        Ok(())
    }

    /// Mutates the cached record and persists before returning it.
    fn commit<F>(&mut self, mutate: F) -> Result<CredentialRecord>
    where
        F: FnOnce(&mut CredentialRecord),
    {
        mutate(&mut self.data.record);
        self.dirty = true;
        self.save_to_file()?;
        Ok(self.data.record.clone())
    }
}

impl CredentialStore for JsonCredentialStore {
    fn read(&self) -> Result<CredentialRecord> {
        Ok(self.data.record.clone())
    }

    fn set_passcode(&mut self, value: &str) -> Result<CredentialRecord> {
        let _span = tracing::debug_span!("store_set_passcode").entered();

        self.commit(|record| {
            record.passcode = Some(value.to_string());
            record.lockout_until = None;
            record.failed_attempts = 0;
        })
    }

    fn clear_passcode(&mut self) -> Result<CredentialRecord> {
        let _span = tracing::debug_span!("store_clear_passcode").entered();

        self.commit(|record| {
            record.passcode = None;
            record.lockout_until = None;
            record.failed_attempts = 0;
        })
    }

    fn record_attempt(&mut self, candidate: &str, now_ms: i64) -> Result<(bool, CredentialRecord)> {
        let _span = tracing::debug_span!("store_record_attempt").entered();

        let matched = self
            .data
            .record
            .passcode
            .as_deref()
            .is_some_and(|stored| stored == candidate);

        let record = if matched {
            self.commit(|record| {
                record.lockout_until = None;
                record.failed_attempts = 0;
            })?
        } else {
            self.commit(|record| {
                record.failed_attempts = record.failed_attempts.saturating_add(1).min(MAX_FAILED_ATTEMPTS);
                record.lockout_until = Some(now_ms + LOCKOUT_WINDOW_MS);
            })?
        };

        tracing::debug!(
            success = matched,
            failed_attempts = record.failed_attempts,
            "attempt recorded"
        );
        Ok((matched, record))
    }

    fn clear_lockout(&mut self) -> Result<CredentialRecord> {
        let _span = tracing::debug_span!("store_clear_lockout").entered();

        self.commit(|record| {
            record.lockout_until = None;
            record.failed_attempts = 0;
        })
    }
}

impl Drop for JsonCredentialStore {
    /// Ensures a dirty record is persisted on drop.
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save credential record on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const NOW_MS: i64 = 1_700_000_000_000;

    fn open_store(dir: &TempDir) -> JsonCredentialStore {
        JsonCredentialStore::open(dir.path().join("credentials.json")).expect("store opens")
    }

    #[test]
    fn read_returns_defaults_when_no_file_exists() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        assert_eq!(store.read().unwrap(), CredentialRecord::default());
        assert!(!dir.path().join("credentials.json").exists());
    }

    #[test]
    fn set_passcode_clears_lockout_state() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store.record_attempt("0000", NOW_MS).unwrap();
        store.record_attempt("0000", NOW_MS).unwrap();

        let record = store.set_passcode("1234").unwrap();
        assert_eq!(record.passcode.as_deref(), Some("1234"));
        assert!(record.lockout_until.is_none());
        assert_eq!(record.failed_attempts, 0);
    }

    #[test]
    fn clear_passcode_resets_everything() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        store.set_passcode("1234").unwrap();
        store.record_attempt("0000", NOW_MS).unwrap();

        let record = store.clear_passcode().unwrap();
        assert_eq!(record, CredentialRecord::default());
    }

    #[test]
    fn matching_attempt_clears_lockout_fields() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.set_passcode("1234").unwrap();
        store.record_attempt("9999", NOW_MS).unwrap();

        let (success, record) = store.record_attempt("1234", NOW_MS + 1_000).unwrap();
        assert!(success);
        assert_eq!(record.failed_attempts, 0);
        assert!(record.lockout_until.is_none());
        assert_eq!(record.passcode.as_deref(), Some("1234"));
    }

    #[test]
    fn mismatch_increments_and_stamps_window() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.set_passcode("1234").unwrap();

        let (success, record) = store.record_attempt("9999", NOW_MS).unwrap();
        assert!(!success);
        assert_eq!(record.failed_attempts, 1);
        assert_eq!(record.lockout_until, Some(NOW_MS + LOCKOUT_WINDOW_MS));
    }

    #[test]
    fn failed_attempts_saturate_but_window_refreshes() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.set_passcode("1234").unwrap();

        for i in 0i64..5 {
            store.record_attempt("9999", NOW_MS + i * 1_000).unwrap();
        }

        let record = store.read().unwrap();
        assert_eq!(record.failed_attempts, MAX_FAILED_ATTEMPTS);
        // The window tracks the most recent mismatch, not the third one.
        assert_eq!(record.lockout_until, Some(NOW_MS + 4_000 + LOCKOUT_WINDOW_MS));
    }

    #[test]
    fn attempt_without_configured_passcode_is_a_mismatch() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let (success, record) = store.record_attempt("1234", NOW_MS).unwrap();
        assert!(!success);
        assert_eq!(record.failed_attempts, 1);
    }

    #[test]
    fn record_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = open_store(&dir);
            store.set_passcode("4321").unwrap();
            store.record_attempt("0000", NOW_MS).unwrap();
        }

        let store = open_store(&dir);
        let record = store.read().unwrap();
        assert_eq!(record.passcode.as_deref(), Some("4321"));
        assert_eq!(record.failed_attempts, 1);
        assert_eq!(record.lockout_until, Some(NOW_MS + LOCKOUT_WINDOW_MS));
    }

    #[test]
    fn corrupt_file_surfaces_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonCredentialStore::open(path).unwrap_err();
        assert!(matches!(err, AppLockError::Storage(_)));
    }
}
