//! The login handshake: code exchange, identity lookup, whitelist check and
//! session issuance, run strictly in that order.
//!
//! Each step depends on the previous one's result, so nothing runs
//! concurrently and the first failure ends the attempt. Nothing is persisted
//! server-side; the only output is the session handed back to the caller.

use async_trait::async_trait;
use oxcyshop_platform_access::{
    ExchangeRequest, FallbackToken, HandshakeError, Identity, Session, SessionSource, Whitelist,
};
use rootcause::Report;
use std::sync::Arc;

use crate::error::BackendError;

/// Identity provider that turns an authorization code into an identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Checks that client credentials are present without touching the network.
    fn ensure_configured(&self) -> Result<(), HandshakeError>;

    /// Exchanges an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, HandshakeError>;

    /// Fetches the identity the access token belongs to.
    async fn fetch_identity(&self, access_token: &str) -> Result<Identity, HandshakeError>;
}

/// Storage backend endpoint that issues session tokens.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Requests a session token for `username`.
    async fn request_token(&self, username: &str) -> Result<String, Report<BackendError>>;
}

/// Obtains a session token, falling back to a synthesized one.
#[derive(Clone)]
pub struct SessionIssuer {
    backend: Arc<dyn SessionBackend>,
}

impl SessionIssuer {
    #[must_use]
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    /// Issues a token for an admitted identity. Never fails.
    pub async fn issue(&self, identity: &Identity) -> SessionSource {
        match self.backend.request_token(identity.username()).await {
            Ok(token) => {
                tracing::info!(identity_id = %identity.id(), "received token from storage backend");
                SessionSource::Issued(token)
            }
            Err(report) => {
                tracing::warn!(
                    identity_id = %identity.id(),
                    error = %report,
                    "storage backend did not issue a token, synthesizing fallback"
                );
                SessionSource::Synthesized(FallbackToken::now(identity.id().clone()).encode())
            }
        }
    }
}

/// Result of a completed handshake.
#[derive(Debug, Clone)]
pub struct HandshakeOutcome {
    pub identity: Identity,
    pub source: SessionSource,
    pub session: Session,
}

/// Runs the login handshake end to end.
#[derive(Clone)]
pub struct Handshake {
    provider: Arc<dyn IdentityProvider>,
    whitelist: Whitelist,
    issuer: SessionIssuer,
}

impl Handshake {
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        whitelist: Whitelist,
        issuer: SessionIssuer,
    ) -> Self {
        Self {
            provider,
            whitelist,
            issuer,
        }
    }

    #[must_use]
    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Completes a login attempt.
    ///
    /// # Errors
    ///
    /// - `BadRequest` when the code is missing or blank (no outbound call)
    /// - `ServerConfig` when Discord credentials are missing (no outbound call)
    /// - `Upstream` / `Internal` when Discord fails
    /// - `Forbidden` when the identity is not whitelisted
    #[tracing::instrument(skip_all)]
    pub async fn complete(
        &self,
        request: &ExchangeRequest,
    ) -> Result<HandshakeOutcome, HandshakeError> {
        let code = request.code().ok_or_else(HandshakeError::missing_code)?;
        self.provider.ensure_configured()?;

        tracing::debug!("exchanging code for token");
        let access_token = self.provider.exchange_code(code).await?;

        let identity = self.provider.fetch_identity(&access_token).await?;
        tracing::debug!(username = identity.username(), "identity received");

        self.whitelist.authorize(&identity)?;

        let source = self.issuer.issue(&identity).await;
        let session = Session::for_identity(&identity, source.clone());

        tracing::info!(
            identity_id = %identity.id(),
            token_source = source.kind(),
            "authentication successful"
        );

        Ok(HandshakeOutcome {
            identity,
            source,
            session,
        })
    }
}
