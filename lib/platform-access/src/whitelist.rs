//! Whitelist-based platform access.
//!
//! The whitelist is the only authorization mechanism: an identity whose ID
//! is in the set may log in, every other identity is denied. Membership is
//! exact string equality on the Discord ID, with no wildcards or roles.

use oxcyshop_core::IdentityId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::HandshakeError;
use crate::identity::Identity;

/// Access configuration loaded with the rest of the server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Authorized Discord IDs as a comma-separated string.
    #[serde(default = "default_whitelist")]
    whitelist: String,
}

fn default_whitelist() -> String {
    "998836610516914236,1384032725014548591".to_string()
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            whitelist: default_whitelist(),
        }
    }
}

impl AccessConfig {
    #[must_use]
    pub fn new(whitelist: impl Into<String>) -> Self {
        Self {
            whitelist: whitelist.into(),
        }
    }

    /// Builds the whitelist, skipping blank and malformed entries.
    #[must_use]
    pub fn whitelist(&self) -> Whitelist {
        Whitelist::from_ids(
            self.whitelist
                .split(',')
                .filter(|entry| !entry.trim().is_empty())
                .filter_map(|entry| match entry.parse::<IdentityId>() {
                    Ok(id) => Some(id),
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping whitelist entry");
                        None
                    }
                }),
        )
    }
}

/// Fixed set of authorized identity IDs.
///
/// Built once at startup and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
    ids: HashSet<IdentityId>,
}

impl Whitelist {
    /// Creates a whitelist from a list of IDs.
    #[must_use]
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<IdentityId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, id: &IdentityId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Admits or denies an identity.
    ///
    /// # Errors
    ///
    /// Returns [`HandshakeError::Forbidden`] if the identity is not listed.
    /// The decision is final; there is no other way in.
    pub fn authorize(&self, identity: &Identity) -> Result<(), HandshakeError> {
        if self.contains(identity.id()) {
            return Ok(());
        }

        tracing::warn!(
            identity_id = %identity.id(),
            username = identity.username(),
            "identity is not in the whitelist, access denied"
        );
        Err(HandshakeError::Forbidden {
            identity_id: identity.id().clone(),
            username: identity.username().to_string(),
        })
    }
}
