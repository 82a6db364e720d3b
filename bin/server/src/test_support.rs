//! Fakes shared by the server's unit tests.

use async_trait::async_trait;
use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use oxcyshop_platform_access::{DiscordConfig, HandshakeError, Identity};
use rootcause::Report;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use crate::auth::{IdentityProvider, SessionBackend};
use crate::error::BackendError;

pub const WHITELISTED_ID: &str = "998836610516914236";
pub const OUTSIDER_ID: &str = "000000000000000000";

/// Serves `app` on an ephemeral local port.
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

/// In-process identity provider that records every outbound call.
pub struct FakeProvider {
    identity_id: String,
    configured: bool,
    exchange_failure: Option<HandshakeError>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn returning(identity_id: &str) -> Self {
        Self {
            identity_id: identity_id.to_string(),
            configured: true,
            exchange_failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn failing_exchange(mut self, err: HandshakeError) -> Self {
        self.exchange_failure = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn ensure_configured(&self) -> Result<(), HandshakeError> {
        if self.configured {
            Ok(())
        } else {
            Err(HandshakeError::ServerConfig {
                missing: "client_id".to_string(),
            })
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<String, HandshakeError> {
        self.calls.lock().unwrap().push(format!("exchange:{code}"));
        match &self.exchange_failure {
            Some(err) => Err(err.clone()),
            None => Ok(format!("access-{code}")),
        }
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<Identity, HandshakeError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("profile:{access_token}"));
        Ok(Identity::new(
            self.identity_id.as_str(),
            format!("user-{}", self.identity_id),
            None,
        ))
    }
}

/// In-process session backend.
pub struct FakeBackend {
    token: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn issuing(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            token: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionBackend for FakeBackend {
    async fn request_token(&self, username: &str) -> Result<String, Report<BackendError>> {
        self.calls.lock().unwrap().push(username.to_string());
        self.token.clone().ok_or_else(|| {
            BackendError::Transport {
                endpoint: "fake".to_string(),
                details: "connection refused".to_string(),
            }
            .into()
        })
    }
}

#[derive(Clone, Default)]
struct DiscordState {
    identity_id: String,
    token_forms: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

/// Local HTTP stand-in for Discord's token and profile endpoints.
///
/// The token endpoint reacts to magic codes: `bad` is rejected with 400,
/// `garbled` answers with a non-JSON body, `tokenless` answers without an
/// access token. Any other code yields `access-{code}`.
pub struct FakeDiscord {
    addr: SocketAddr,
    state: DiscordState,
}

impl FakeDiscord {
    pub async fn spawn(identity_id: &str) -> Self {
        let state = DiscordState {
            identity_id: identity_id.to_string(),
            ..DiscordState::default()
        };
        let app = Router::new()
            .route("/api/oauth2/token", post(discord_token))
            .route("/api/users/me", get(discord_profile))
            .with_state(state.clone());
        let addr = spawn(app).await;
        Self { addr, state }
    }

    /// A credentialed configuration pointing at this fake.
    pub fn config(&self) -> DiscordConfig {
        DiscordConfig::builder()
            .client_id("client".to_string())
            .client_secret("secret".to_string())
            .redirect_uri("http://localhost:3000/auth/callback".to_string())
            .token_url(format!("http://{}/api/oauth2/token", self.addr))
            .profile_url(format!("http://{}/api/users/me", self.addr))
            .build()
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_forms.lock().unwrap().len()
    }

    pub fn last_token_form(&self) -> Option<HashMap<String, String>> {
        self.state.token_forms.lock().unwrap().last().cloned()
    }
}

async fn discord_token(
    State(state): State<DiscordState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let code = form.get("code").cloned().unwrap_or_default();
    state.token_forms.lock().unwrap().push(form);

    match code.as_str() {
        "bad" => (StatusCode::BAD_REQUEST, r#"{"error":"invalid_grant"}"#).into_response(),
        "garbled" => (StatusCode::OK, "<html>oops</html>").into_response(),
        "tokenless" => Json(serde_json::json!({ "token_type": "Bearer" })).into_response(),
        _ => Json(serde_json::json!({
            "access_token": format!("access-{code}"),
            "token_type": "Bearer",
            "expires_in": 604800,
            "scope": "identify email",
        }))
        .into_response(),
    }
}

async fn discord_profile(State(state): State<DiscordState>, headers: HeaderMap) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer access-"));

    if !authorized {
        return (StatusCode::UNAUTHORIZED, r#"{"message":"401: Unauthorized"}"#).into_response();
    }

    Json(serde_json::json!({
        "id": state.identity_id,
        "username": "oxcy",
        "avatar": "a1b2c3",
        "email": "oxcy@example.com",
    }))
    .into_response()
}

/// Behaviour of the fake storage backend's session endpoint.
#[derive(Clone, Copy)]
pub enum StorageMode {
    Issue(&'static str),
    Fail,
    Tokenless,
}

#[derive(Clone)]
struct StorageState {
    mode: StorageMode,
    usernames: Arc<Mutex<Vec<String>>>,
}

/// Local HTTP stand-in for the storage backend's `/auth_discord`.
pub struct FakeStorage {
    addr: SocketAddr,
    state: StorageState,
}

impl FakeStorage {
    pub async fn spawn(mode: StorageMode) -> Self {
        let state = StorageState {
            mode,
            usernames: Arc::default(),
        };
        let app = Router::new()
            .route("/auth_discord", post(storage_auth))
            .with_state(state.clone());
        let addr = spawn(app).await;
        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn usernames(&self) -> Vec<String> {
        self.state.usernames.lock().unwrap().clone()
    }
}

async fn storage_auth(
    State(state): State<StorageState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if let Some(username) = form.get("username") {
        state.usernames.lock().unwrap().push(username.clone());
    }

    match state.mode {
        StorageMode::Issue(token) => Json(serde_json::json!({ "token": token })).into_response(),
        StorageMode::Fail => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        StorageMode::Tokenless => Json(serde_json::json!({ "status": "ok" })).into_response(),
    }
}
