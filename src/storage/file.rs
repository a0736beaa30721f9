//! JSON file-backed key-value store.
//!
//! Persists each key as an entry of a single JSON object on disk, using
//! atomic writes (write-to-temp + rename) so a crash mid-write never leaves a
//! corrupt file behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - the whole file is loaded into memory once
//! - **Write**: O(n) - the full object is serialized on every set
//! - **Best for**: a handful of keys with small values, infrequent writes

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::{LadleError, Result};
use crate::storage::backend::KeyValueStore;

/// File-backed store keeping the full contents cached in memory.
///
/// # Thread Safety
///
/// `Send` but not `Sync`; owned by the session task.
pub struct JsonFileStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory cache, loaded on creation.
    entries: BTreeMap<String, String>,

    /// Tracks whether the cache has unsaved changes.
    dirty: bool,
}

impl JsonFileStore {
    /// Creates or opens a file-backed store.
    ///
    /// If the file exists its contents are loaded; a missing file starts an
    /// empty store. Parent directories are created automatically. An
    /// unreadable file is treated as empty with a warning rather than
    /// failing session start.
    ///
    /// # Errors
    ///
    /// Returns an error if parent directory creation fails.
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening file store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = if file_path.exists() {
            match Self::load_from_file(&file_path) {
                Ok(entries) => entries,
                Err(error) => {
                    tracing::warn!(error = %error, path = ?file_path, "unreadable store file, starting empty");
                    BTreeMap::new()
                }
            }
        } else {
            tracing::debug!("no existing store file, starting empty");
            BTreeMap::new()
        };

        tracing::debug!(entry_count = entries.len(), "file store opened");

        Ok(Self {
            file_path,
            entries,
            dirty: false,
        })
    }

    fn load_from_file(path: &PathBuf) -> Result<BTreeMap<String, String>> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| LadleError::Storage(format!("failed to parse store file: {e}")))
    }

    /// Saves the cache to disk using an atomic write.
    ///
    /// Writes to a temporary file first, then renames it over the target
    /// path, so the file on disk is always a complete JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or the
    /// rename fails.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        tracing::debug!(path = ?self.file_path, "saving store file");

        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| LadleError::Storage(format!("failed to serialize store: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!("store saved");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("store_set", key = %key).entered();
        self.entries.insert(key.to_string(), value.to_string());
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("store_remove", key = %key).entered();
        if self.entries.remove(key).is_some() {
            self.dirty = true;
            self.save_to_file()?;
        }
        Ok(())
    }
}

impl Drop for JsonFileStore {
    /// Flushes unsaved changes on drop.
    fn drop(&mut self) {
        if self.dirty {
            if let Err(error) = self.save_to_file() {
                tracing::error!(error = %error, "failed to save store on drop");
            }
        }
    }
}
