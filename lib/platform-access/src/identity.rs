//! The Discord identity resolved during login.
//!
//! An `Identity` is fetched once per login attempt from Discord's profile
//! endpoint and is never mutated afterwards.

use oxcyshop_core::IdentityId;
use serde::{Deserialize, Serialize};

/// Base URL of Discord's avatar CDN.
pub const AVATAR_CDN: &str = "https://cdn.discordapp.com/avatars";

/// An authenticated Discord account.
///
/// Deserializes directly from the profile endpoint's JSON; unknown fields
/// (email, discriminator, flags) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Discord snowflake ID.
    id: IdentityId,
    /// Discord username.
    username: String,
    /// Avatar hash, absent when the account uses a default avatar.
    #[serde(rename = "avatar", default)]
    avatar_hash: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(
        id: impl Into<IdentityId>,
        username: impl Into<String>,
        avatar_hash: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            avatar_hash,
        }
    }

    #[must_use]
    pub fn id(&self) -> &IdentityId {
        &self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn avatar_hash(&self) -> Option<&str> {
        self.avatar_hash.as_deref()
    }

    /// CDN URL of the avatar, or an empty string for default avatars.
    #[must_use]
    pub fn avatar_url(&self) -> String {
        match self.avatar_hash.as_deref() {
            Some(hash) if !hash.is_empty() => format!("{AVATAR_CDN}/{}/{hash}.png", self.id),
            _ => String::new(),
        }
    }
}
