//! Client for the storage backend's session endpoint.

use async_trait::async_trait;
use rootcause::Report;
use serde::Deserialize;

use super::handshake::SessionBackend;
use crate::error::BackendError;

/// Path of the backend endpoint that issues session tokens.
const AUTH_PATH: &str = "/auth_discord";

/// Storage backend client.
#[derive(Clone)]
pub struct BackendClient {
    endpoint: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    token: Option<String>,
}

impl BackendClient {
    /// Creates a client for the backend rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), AUTH_PATH),
            http,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SessionBackend for BackendClient {
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn request_token(&self, username: &str) -> Result<String, Report<BackendError>> {
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("username", username)])
            .send()
            .await
            .map_err(|e| BackendError::Transport {
                endpoint: self.endpoint.clone(),
                details: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Declined {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let body: TokenBody = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse {
                endpoint: self.endpoint.clone(),
                details: e.to_string(),
            })?;

        body.token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                BackendError::MissingToken {
                    endpoint: self.endpoint.clone(),
                }
                .into()
            })
    }
}
