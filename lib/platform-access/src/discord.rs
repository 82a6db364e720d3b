//! Discord OAuth2 configuration.
//!
//! This module provides configuration types for exchanging authorization
//! codes with Discord and looking up the authenticated account.

use serde::{Deserialize, Serialize};

use crate::error::HandshakeError;

/// Configuration for the Discord OAuth2 application.
///
/// Credentials are optional so that the server can start without them; a
/// handshake attempted while they are missing fails with
/// [`HandshakeError::ServerConfig`] instead of refusing to boot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// The OAuth2 client ID registered with Discord.
    #[serde(default)]
    client_id: Option<String>,
    /// The OAuth2 client secret.
    #[serde(default)]
    client_secret: Option<String>,
    /// The redirect URI registered for the OAuth2 callback.
    #[serde(default)]
    redirect_uri: Option<String>,
    /// Token endpoint.
    /// Default: "https://discord.com/api/oauth2/token"
    #[serde(default = "default_token_url")]
    token_url: String,
    /// Profile endpoint of the authenticated account.
    /// Default: "https://discord.com/api/users/@me"
    #[serde(default = "default_profile_url")]
    profile_url: String,
    /// Authorization page the login route redirects to.
    /// Default: "https://discord.com/oauth2/authorize"
    #[serde(default = "default_authorize_url")]
    authorize_url: String,
    /// OAuth2 scopes to request as a comma-separated string.
    /// Default: "identify,email"
    #[serde(default = "default_scopes")]
    scopes: String,
}

fn default_token_url() -> String {
    "https://discord.com/api/oauth2/token".to_string()
}

fn default_profile_url() -> String {
    "https://discord.com/api/users/@me".to_string()
}

fn default_authorize_url() -> String {
    "https://discord.com/oauth2/authorize".to_string()
}

fn default_scopes() -> String {
    "identify,email".to_string()
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: None,
            token_url: default_token_url(),
            profile_url: default_profile_url(),
            authorize_url: default_authorize_url(),
            scopes: default_scopes(),
        }
    }
}

impl DiscordConfig {
    /// Creates a fully credentialed configuration with default endpoints.
    #[must_use]
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self::builder()
            .client_id(client_id)
            .client_secret(client_secret)
            .redirect_uri(redirect_uri)
            .build()
    }

    /// Creates a configuration builder starting from the defaults.
    #[must_use]
    pub fn builder() -> DiscordConfigBuilder {
        DiscordConfigBuilder::default()
    }

    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        non_blank(self.client_id.as_deref())
    }

    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        non_blank(self.client_secret.as_deref())
    }

    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        non_blank(self.redirect_uri.as_deref())
    }

    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    #[must_use]
    pub fn profile_url(&self) -> &str {
        &self.profile_url
    }

    #[must_use]
    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    /// Returns the OAuth2 scopes, parsed from the comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Returns the client ID and secret needed for the code exchange.
    ///
    /// # Errors
    ///
    /// Returns [`HandshakeError::ServerConfig`] naming the first missing value.
    pub fn credentials(&self) -> Result<(&str, &str), HandshakeError> {
        let client_id = self.client_id().ok_or_else(|| HandshakeError::ServerConfig {
            missing: "client_id".to_string(),
        })?;
        let client_secret = self
            .client_secret()
            .ok_or_else(|| HandshakeError::ServerConfig {
                missing: "client_secret".to_string(),
            })?;
        Ok((client_id, client_secret))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Builder for `DiscordConfig`.
#[derive(Debug, Default)]
pub struct DiscordConfigBuilder {
    config: DiscordConfig,
}

impl DiscordConfigBuilder {
    #[must_use]
    pub fn client_id(mut self, client_id: String) -> Self {
        self.config.client_id = Some(client_id);
        self
    }

    #[must_use]
    pub fn client_secret(mut self, client_secret: String) -> Self {
        self.config.client_secret = Some(client_secret);
        self
    }

    #[must_use]
    pub fn redirect_uri(mut self, redirect_uri: String) -> Self {
        self.config.redirect_uri = Some(redirect_uri);
        self
    }

    /// Points the token endpoint somewhere else (e.g. a local fake in tests).
    #[must_use]
    pub fn token_url(mut self, url: String) -> Self {
        self.config.token_url = url;
        self
    }

    #[must_use]
    pub fn profile_url(mut self, url: String) -> Self {
        self.config.profile_url = url;
        self
    }

    #[must_use]
    pub fn authorize_url(mut self, url: String) -> Self {
        self.config.authorize_url = url;
        self
    }

    /// Sets the OAuth2 scopes to request.
    #[must_use]
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.config.scopes = scopes.join(",");
        self
    }

    #[must_use]
    pub fn build(self) -> DiscordConfig {
        self.config
    }
}
