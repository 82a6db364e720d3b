//! Error types for the platform-access crate.
//!
//! - `HandshakeError`: terminal failures of the login handshake, each mapped
//!   to the HTTP status and JSON error text the exchange endpoint returns
//! - `UploadRejection`: local plan-limit checks that refuse an upload before
//!   it reaches the storage backend

use oxcyshop_core::IdentityId;
use std::fmt;

use crate::plan::{Plan, allowed_extensions, format_bytes};

/// Errors that terminate the login handshake.
///
/// Backend transport failures are deliberately absent: the session issuer
/// absorbs them into a synthesized token, so they never reach the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    /// The request carried no usable authorization code.
    BadRequest { reason: String },
    /// Discord client credentials are not configured.
    ServerConfig { missing: String },
    /// Discord answered with a failure status or an unusable body.
    Upstream {
        status: u16,
        message: String,
        body: Option<String>,
    },
    /// The identity is not on the whitelist.
    Forbidden {
        identity_id: IdentityId,
        username: String,
    },
    /// Transport failure or other unexpected error.
    Internal { details: String },
}

impl HandshakeError {
    /// A missing or blank authorization code.
    #[must_use]
    pub fn missing_code() -> Self {
        Self::BadRequest {
            reason: "No code provided".to_string(),
        }
    }

    /// The token endpoint answered with a non-success status.
    #[must_use]
    pub fn token_rejected(status: u16, body: String) -> Self {
        Self::Upstream {
            status,
            message: format!("Discord API error: {status}"),
            body: Some(body),
        }
    }

    /// The identity provider answered with a body that is not the expected JSON.
    #[must_use]
    pub fn invalid_provider_response() -> Self {
        Self::Upstream {
            status: 500,
            message: "Invalid response from Discord".to_string(),
            body: None,
        }
    }

    /// The token endpoint answered successfully but without an access token.
    #[must_use]
    pub fn missing_access_token() -> Self {
        Self::Upstream {
            status: 400,
            message: "No access token received from Discord".to_string(),
            body: None,
        }
    }

    /// The profile endpoint answered with a non-success status.
    #[must_use]
    pub fn profile_rejected(status: u16, body: String) -> Self {
        Self::Upstream {
            status,
            message: "Failed to fetch user info from Discord".to_string(),
            body: Some(body),
        }
    }

    /// HTTP status the exchange endpoint answers with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::ServerConfig { .. } | Self::Internal { .. } => 500,
            Self::Upstream { status, .. } => *status,
            Self::Forbidden { .. } => 403,
        }
    }

    /// The `error` text shown to the user.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest { reason } => reason.clone(),
            Self::ServerConfig { .. } => {
                "Server configuration error - missing credentials".to_string()
            }
            Self::Upstream { message, .. } => message.clone(),
            Self::Forbidden { .. } => {
                "Access denied. You are not authorized to access this application.".to_string()
            }
            Self::Internal { .. } => "Internal server error".to_string(),
        }
    }

    /// The optional `details` text.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Upstream { body, .. } => body.as_deref(),
            Self::Internal { details } => Some(details),
            _ => None,
        }
    }
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest { reason } => write!(f, "bad request: {reason}"),
            Self::ServerConfig { missing } => {
                write!(f, "server configuration error: {missing} not configured")
            }
            Self::Upstream {
                status, message, ..
            } => write!(f, "upstream error ({status}): {message}"),
            Self::Forbidden {
                identity_id,
                username,
            } => write!(f, "identity {username} ({identity_id}) is not whitelisted"),
            Self::Internal { details } => write!(f, "internal error: {details}"),
        }
    }
}

impl std::error::Error for HandshakeError {}

/// Reasons an upload is refused before it is sent to the storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    /// File exceeds the plan's per-file limit.
    TooLarge {
        plan: Plan,
        max_bytes: u64,
        actual_bytes: u64,
    },
    /// File extension is not on the allowed list.
    InvalidType { file_name: String },
    /// File would push total usage over the plan's storage quota.
    StorageFull { available_bytes: u64 },
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge {
                plan,
                max_bytes,
                actual_bytes,
            } => write!(
                f,
                "Your {plan} plan allows files up to {} MB. This file is {:.2} MB.",
                max_bytes / (1024 * 1024),
                *actual_bytes as f64 / (1024.0 * 1024.0)
            ),
            Self::InvalidType { file_name } => write!(
                f,
                "'{file_name}' is not an allowed type. Allowed types: {}",
                allowed_extensions().join(", ")
            ),
            Self::StorageFull { available_bytes } => write!(
                f,
                "You have {} available. Upgrade to Premium for 9 GB storage.",
                format_bytes(*available_bytes)
            ),
        }
    }
}

impl std::error::Error for UploadRejection {}
