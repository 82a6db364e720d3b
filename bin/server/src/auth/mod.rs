//! Authentication module for the OxcyShop server.
//!
//! This module provides:
//! - The Discord OAuth2 client used for the code exchange and profile lookup
//! - The storage backend client that issues session tokens
//! - The handshake that ties both together behind the whitelist
//! - Axum routes for the login redirect and the code exchange
//!
//! # Authorization Model
//!
//! Access is decided once, at login, against the configured whitelist of
//! Discord account IDs. The server keeps no session state: the token handed
//! back is either issued by the storage backend or synthesized locally when
//! the backend cannot be reached, and the storage backend validates it on
//! every later request.

pub mod backend;
pub mod discord;
pub mod handshake;
pub mod routes;

pub use backend::BackendClient;
pub use discord::DiscordClient;
pub use handshake::{Handshake, HandshakeOutcome, IdentityProvider, SessionBackend, SessionIssuer};
pub use routes::{AuthError, exchange, login};

use oxcyshop_platform_access::{DiscordConfig, Whitelist};
use rootcause::Report;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::StartupError;

/// Shared application state.
pub struct AppState {
    /// The login handshake.
    pub handshake: Handshake,
    /// Discord settings, used by the login redirect.
    pub discord: DiscordConfig,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        backend: Arc<dyn SessionBackend>,
        whitelist: Whitelist,
        discord: DiscordConfig,
    ) -> Self {
        Self {
            handshake: Handshake::new(provider, whitelist, SessionIssuer::new(backend)),
            discord,
        }
    }

    /// Builds the state from configuration, sharing one HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ServerConfig) -> Result<Self, Report<StartupError>> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("oxcyshop-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StartupError::HttpClient {
                details: e.to_string(),
            })?;

        let whitelist = config.access.whitelist();
        if whitelist.is_empty() {
            tracing::warn!("whitelist is empty, every login will be denied");
        }
        if config.discord.credentials().is_err() {
            tracing::warn!("Discord credentials not configured, logins will fail");
        }

        Ok(Self::new(
            Arc::new(DiscordClient::new(config.discord.clone(), http.clone())),
            Arc::new(BackendClient::new(&config.backend.base_url, http)),
            whitelist,
            config.discord.clone(),
        ))
    }
}
