//! Error types for the client crate.
//!
//! - `StorageError`: the key/value store could not be read or written
//! - `ExchangeError`: the local code-exchange endpoint failed
//! - `CallbackError`: the login callback was driven incorrectly
//! - `FilesError`: a storage backend file operation failed

use oxcyshop_platform_access::UploadRejection;
use std::fmt;

/// Errors from a [`KeyValueStore`](crate::storage::KeyValueStore).
#[derive(Debug)]
pub enum StorageError {
    /// The backing file could not be read.
    Read { path: String, details: String },
    /// The backing file could not be written.
    Write { path: String, details: String },
    /// The backing file is not a JSON object of strings.
    Corrupt { path: String, details: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, details } => write!(f, "failed to read '{}': {}", path, details),
            Self::Write { path, details } => write!(f, "failed to write '{}': {}", path, details),
            Self::Corrupt { path, details } => {
                write!(f, "store file '{}' is corrupt: {}", path, details)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Failures of the local code-exchange call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// The endpoint answered with a failure status.
    ///
    /// `message` is the `error` field of a JSON body, or the raw text of a
    /// non-JSON body; `None` when neither yields anything.
    Rejected { status: u16, message: Option<String> },
    /// The request never completed.
    Transport { details: String },
    /// A success status with a body that is not a session.
    InvalidResponse { details: String },
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { status, message } => write!(
                f,
                "exchange rejected ({}): {}",
                status,
                message.as_deref().unwrap_or("Unknown error")
            ),
            Self::Transport { details } => write!(f, "exchange request failed: {}", details),
            Self::InvalidResponse { details } => {
                write!(f, "invalid exchange response: {}", details)
            }
        }
    }
}

impl std::error::Error for ExchangeError {}

/// Misuse of the login callback orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The orchestrator already handled a landing.
    AlreadyRun,
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRun => write!(f, "login callback already handled"),
        }
    }
}

impl std::error::Error for CallbackError {}

/// Errors from [`FileHostClient`](crate::files::FileHostClient) operations.
#[derive(Debug)]
pub enum FilesError {
    /// The upload was refused locally by plan limits.
    Rejected(UploadRejection),
    /// Network-level failure.
    Transport { endpoint: String, details: String },
    /// The backend answered with a failure status.
    Declined { endpoint: String, status: u16 },
    /// The backend's body could not be decoded.
    InvalidResponse { endpoint: String, details: String },
}

impl fmt::Display for FilesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "upload refused: {}", rejection),
            Self::Transport { endpoint, details } => {
                write!(f, "failed to reach '{}': {}", endpoint, details)
            }
            Self::Declined { endpoint, status } => {
                write!(f, "'{}' declined with status {}", endpoint, status)
            }
            Self::InvalidResponse { endpoint, details } => {
                write!(f, "invalid response from '{}': {}", endpoint, details)
            }
        }
    }
}

impl std::error::Error for FilesError {}

impl From<UploadRejection> for FilesError {
    fn from(rejection: UploadRejection) -> Self {
        Self::Rejected(rejection)
    }
}
