//! Client for the local code-exchange endpoint.

use async_trait::async_trait;
use oxcyshop_platform_access::{ExchangeRequest, ExchangeResponse, Session};

use crate::error::ExchangeError;

/// Path of the exchange endpoint on the application origin.
pub const EXCHANGE_PATH: &str = "/api/auth/discord";

/// Turns an authorization code into a session.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    async fn exchange(&self, code: &str) -> Result<Session, ExchangeError>;
}

/// HTTP implementation talking to the application's own server.
#[derive(Clone)]
pub struct HttpExchangeApi {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpExchangeApi {
    /// Creates a client for the application served at `origin`.
    #[must_use]
    pub fn new(origin: &str, http: reqwest::Client) -> Self {
        Self {
            endpoint: format!("{}{}", origin.trim_end_matches('/'), EXCHANGE_PATH),
            http,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Extracts the user-facing reason from a failure body.
fn rejection_message(body: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => json
            .get("error")
            .and_then(serde_json::Value::as_str)
            .filter(|e| !e.is_empty())
            .map(str::to_string),
        Err(_) => Some(body.trim())
            .filter(|b| !b.is_empty())
            .map(str::to_string),
    }
}

#[async_trait]
impl ExchangeApi for HttpExchangeApi {
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn exchange(&self, code: &str) -> Result<Session, ExchangeError> {
        let transport = |e: reqwest::Error| ExchangeError::Transport {
            details: e.to_string(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&ExchangeRequest::new(code))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            let message = rejection_message(&body);
            tracing::warn!(status = status.as_u16(), message = ?message, "exchange rejected");
            return Err(ExchangeError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let response: ExchangeResponse =
            serde_json::from_str(&body).map_err(|e| ExchangeError::InvalidResponse {
                details: e.to_string(),
            })?;

        Ok(response.into())
    }
}
