//! Session types for authenticated users.
//!
//! A session is created at the end of a successful handshake and travels to
//! the client, which keeps it in a pending slot until bootstrap and in a
//! durable slot once the terms of service are accepted. Nothing here
//! enforces an expiry: the lifetime of the token is owned by the storage
//! backend.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::plan::Plan;

/// Where a session token came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSource {
    /// Issued by the storage backend's auth endpoint.
    Issued(String),
    /// Synthesized locally because the backend was unreachable or declined.
    Synthesized(String),
}

impl SessionSource {
    /// Returns the token regardless of origin.
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Issued(token) | Self::Synthesized(token) => token,
        }
    }

    /// Consumes the source, returning the token.
    #[must_use]
    pub fn into_token(self) -> String {
        match self {
            Self::Issued(token) | Self::Synthesized(token) => token,
        }
    }

    /// Returns true for degraded-mode tokens.
    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        matches!(self, Self::Synthesized(_))
    }

    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Issued(_) => "issued",
            Self::Synthesized(_) => "synthesized",
        }
    }
}

/// The user half of a session, as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    username: String,
    /// Serialized as `avatar` to match the stored and wire format.
    #[serde(rename = "avatar", default)]
    avatar_url: String,
    #[serde(default)]
    plan: Plan,
}

impl SessionUser {
    #[must_use]
    pub fn new(username: impl Into<String>, avatar_url: impl Into<String>, plan: Plan) -> Self {
        Self {
            username: username.into(),
            avatar_url: avatar_url.into(),
            plan,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    #[must_use]
    pub fn plan(&self) -> Plan {
        self.plan
    }
}

/// An authenticated session: an opaque backend token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    user: SessionUser,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Builds the session granted to a whitelisted identity.
    ///
    /// Every admitted identity receives the premium plan.
    #[must_use]
    pub fn for_identity(identity: &Identity, source: SessionSource) -> Self {
        Self {
            token: source.into_token(),
            user: SessionUser::new(identity.username(), identity.avatar_url(), Plan::Premium),
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    /// Splits the session into its token and user.
    #[must_use]
    pub fn into_parts(self) -> (String, SessionUser) {
        (self.token, self.user)
    }
}
