//! Interface language preference.

use oxcyshop_core::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StorageError;
use crate::storage::{KeyValueStore, keys};

/// Supported interface languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Reads a stored value. Anything unrecognized is English.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("es") => Self::Es,
            _ => Self::En,
        }
    }

    /// Loads the persisted preference.
    pub fn load(store: &impl KeyValueStore) -> Self {
        Self::from_stored(store.get(keys::LANGUAGE).as_deref())
    }

    /// Persists this preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn save(self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        store.set(keys::LANGUAGE, self.as_str())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
