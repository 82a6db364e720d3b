//! Discord OAuth2 client.
//!
//! Performs the two outbound calls of the handshake: the authorization-code
//! exchange and the profile lookup of the authenticated account.

use async_trait::async_trait;
use oxcyshop_platform_access::{DiscordConfig, HandshakeError, Identity};
use serde::Deserialize;

use super::handshake::IdentityProvider;

/// Grant type sent with every code exchange.
const GRANT_TYPE: &str = "authorization_code";

/// Discord OAuth2 client wrapper.
#[derive(Clone)]
pub struct DiscordClient {
    config: DiscordConfig,
    http: reqwest::Client,
}

/// Subset of the profile endpoint's body the handshake reads.
#[derive(Debug, Deserialize)]
struct DiscordProfile {
    id: String,
    username: String,
    #[serde(default)]
    avatar: Option<String>,
}

impl From<DiscordProfile> for Identity {
    fn from(profile: DiscordProfile) -> Self {
        Identity::new(profile.id, profile.username, profile.avatar)
    }
}

impl DiscordClient {
    /// Creates a client sharing the given HTTP connection pool.
    #[must_use]
    pub fn new(config: DiscordConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DiscordConfig {
        &self.config
    }
}

fn transport_error(err: reqwest::Error) -> HandshakeError {
    HandshakeError::Internal {
        details: err.to_string(),
    }
}

#[async_trait]
impl IdentityProvider for DiscordClient {
    fn ensure_configured(&self) -> Result<(), HandshakeError> {
        self.config.credentials().map(|_| ())
    }

    #[tracing::instrument(skip_all, fields(token_url = self.config.token_url()))]
    async fn exchange_code(&self, code: &str) -> Result<String, HandshakeError> {
        let (client_id, client_secret) = self.config.credentials()?;

        let form = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", GRANT_TYPE),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri().unwrap_or_default()),
        ];

        let response = self
            .http
            .post(self.config.token_url())
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %body, "token exchange rejected");
            return Err(HandshakeError::token_rejected(status.as_u16(), body));
        }

        let payload: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "token endpoint returned non-JSON body");
            HandshakeError::invalid_provider_response()
        })?;

        payload
            .get("access_token")
            .and_then(serde_json::Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(HandshakeError::missing_access_token)
    }

    #[tracing::instrument(skip_all, fields(profile_url = self.config.profile_url()))]
    async fn fetch_identity(&self, access_token: &str) -> Result<Identity, HandshakeError> {
        let response = self
            .http
            .get(self.config.profile_url())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "profile lookup rejected");
            return Err(HandshakeError::profile_rejected(status.as_u16(), body));
        }

        let profile: DiscordProfile = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "profile endpoint returned unexpected body");
            HandshakeError::invalid_provider_response()
        })?;

        Ok(profile.into())
    }
}
