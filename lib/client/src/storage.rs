//! Key/value persistence for client session state.
//!
//! Everything the client remembers between launches lives under the string
//! keys in [`keys`]. Writes are atomic per key only: a failed write leaves
//! the key as it was. Callers that touch several keys must tolerate a crash
//! between them.

use oxcyshop_core::Result;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Storage keys shared with the web client.
pub mod keys {
    /// Token received by the login callback, not yet claimed.
    pub const PENDING_TOKEN: &str = "oxcyshop_pending_token";
    /// User JSON received by the login callback, not yet claimed.
    pub const PENDING_USER: &str = "oxcyshop_pending_user";
    /// Token of the active session.
    pub const TOKEN: &str = "oxcyshop_token";
    /// User JSON of the active session.
    pub const USER: &str = "oxcyshop_user";
    /// `"true"` once the terms of service were accepted.
    pub const TERMS_ACCEPTED: &str = "oxcyshop_terms_accepted";
    /// Preferred interface language, `en` or `es`.
    pub const LANGUAGE: &str = "language";
}

/// A string key/value store.
pub trait KeyValueStore {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store, used in tests and for ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store persisted as one JSON object in a file.
///
/// The whole object is rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let display = path.display().to_string();

        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt {
                    path: display,
                    details: e.to_string(),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StorageError::Read {
                    path: display,
                    details: e.to_string(),
                }
                .into());
            }
        };

        Ok(Self { path, entries })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StorageError> {
        let write_error = |details: String| StorageError::Write {
            path: self.path.display().to_string(),
            details,
        };
        let contents =
            serde_json::to_string_pretty(&self.entries).map_err(|e| write_error(e.to_string()))?;
        std::fs::write(&self.path, contents).map_err(|e| write_error(e.to_string()))?;
        Ok(())
    }

    /// Puts back the value a failed write replaced, so memory matches disk.
    fn restore(&mut self, key: &str, previous: Option<String>) {
        match previous {
            Some(value) => self.entries.insert(key.to_string(), value),
            None => self.entries.remove(key),
        };
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(report) = self.persist() {
            self.restore(key, previous);
            return Err(report);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let Some(previous) = self.entries.remove(key) else {
            return Ok(());
        };
        if let Err(report) = self.persist() {
            self.restore(key, Some(previous));
            return Err(report);
        }
        Ok(())
    }
}
