//! Authentication routes: the login redirect and the code exchange.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use oxcyshop_platform_access::{ErrorBody, ExchangeRequest, ExchangeResponse, HandshakeError};
use std::sync::Arc;

use super::AppState;

/// Redirects the browser to Discord's authorization page.
pub async fn login(State(state): State<Arc<AppState>>) -> Result<Redirect, AuthError> {
    let config = &state.discord;
    let client_id = config.client_id().ok_or_else(|| HandshakeError::ServerConfig {
        missing: "client_id".to_string(),
    })?;
    let redirect_uri = config
        .redirect_uri()
        .ok_or_else(|| HandshakeError::ServerConfig {
            missing: "redirect_uri".to_string(),
        })?;
    let scope = config.scopes().join(" ");

    let url = reqwest::Url::parse_with_params(
        config.authorize_url(),
        [
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
        ],
    )
    .map_err(|e| HandshakeError::Internal {
        details: format!("invalid authorize URL: {e}"),
    })?;

    Ok(Redirect::to(url.as_str()))
}

/// Completes a login: exchanges the code and returns the session.
pub async fn exchange(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExchangeRequest>, JsonRejection>,
) -> Result<Json<ExchangeResponse>, AuthError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable exchange body");
        HandshakeError::missing_code()
    })?;

    let outcome = state.handshake.complete(&request).await?;
    Ok(Json(outcome.session.into()))
}

/// Authentication errors, rendered as `{ "error", "details" }`.
#[derive(Debug)]
pub struct AuthError(HandshakeError);

impl From<HandshakeError> for AuthError {
    fn from(err: HandshakeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &err {
            HandshakeError::BadRequest { .. } | HandshakeError::Forbidden { .. } => {
                tracing::info!(error = %err, "login refused");
            }
            HandshakeError::Upstream { .. } => {
                tracing::warn!(error = %err, "Discord rejected the login");
            }
            HandshakeError::ServerConfig { .. } | HandshakeError::Internal { .. } => {
                tracing::error!(error = %err, "login failed");
            }
        }

        (status, Json(ErrorBody::from(&err))).into_response()
    }
}
