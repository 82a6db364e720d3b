//! Error types for server startup and upstream clients.
//!
//! Request-level failures are [`HandshakeError`](oxcyshop_platform_access::HandshakeError)s
//! rendered by the auth routes; the types here cover what happens around them.

use std::fmt;

/// Failures that stop the server from starting or serving.
#[derive(Debug)]
pub enum StartupError {
    /// The shared HTTP client could not be built.
    HttpClient { details: String },
    /// The listener could not bind.
    Bind { addr: String, details: String },
    /// The server loop exited with an error.
    Serve { details: String },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpClient { details } => {
                write!(f, "failed to build HTTP client: {}", details)
            }
            Self::Bind { addr, details } => {
                write!(f, "failed to bind to '{}': {}", addr, details)
            }
            Self::Serve { details } => write!(f, "server error: {}", details),
        }
    }
}

impl std::error::Error for StartupError {}

/// Failures talking to the storage backend's auth endpoint.
///
/// None of these reach the user: the session issuer falls back to a
/// synthesized token whenever one occurs.
#[derive(Debug)]
pub enum BackendError {
    /// Network-level failure (refused, DNS, TLS, reset).
    Transport { endpoint: String, details: String },
    /// The backend answered with a non-success status.
    Declined { endpoint: String, status: u16 },
    /// The success body was not JSON.
    InvalidResponse { endpoint: String, details: String },
    /// The success body had no usable `token` field.
    MissingToken { endpoint: String },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { endpoint, details } => {
                write!(f, "failed to reach '{}': {}", endpoint, details)
            }
            Self::Declined { endpoint, status } => {
                write!(f, "'{}' declined with status {}", endpoint, status)
            }
            Self::InvalidResponse { endpoint, details } => {
                write!(f, "invalid response from '{}': {}", endpoint, details)
            }
            Self::MissingToken { endpoint } => {
                write!(f, "response from '{}' carried no token", endpoint)
            }
        }
    }
}

impl std::error::Error for BackendError {}
