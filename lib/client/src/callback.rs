//! Landing page of the Discord redirect.
//!
//! The orchestrator reads the `code`/`error` query parameters, drives the
//! exchange, hands a successful session to the bootstrap through the pending
//! storage slots, and reports where to go next. Delays in [`Navigation`] are
//! presentation hints for how long the status line should stay visible; the
//! orchestrator itself never waits.

use oxcyshop_core::Result;
use oxcyshop_platform_access::Session;
use std::time::Duration;

use crate::error::{CallbackError, ExchangeError, StorageError};
use crate::exchange::ExchangeApi;
use crate::storage::{KeyValueStore, keys};

const INITIAL_STATUS: &str = "Authenticating with Discord...";
const CANCELLED_STATUS: &str = "Discord authentication cancelled. Redirecting...";
const EXCHANGING_STATUS: &str = "Exchanging code for token...";
const ERROR_STATUS: &str = "Authentication error. Redirecting...";
const SUCCESS_STATUS: &str = "Login successful! Redirecting...";

const CANCELLED_DELAY: Duration = Duration::from_millis(1500);
const FAILURE_DELAY: Duration = Duration::from_millis(2500);
const SUCCESS_DELAY: Duration = Duration::from_millis(500);

/// Query parameters Discord appends to the redirect URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

impl CallbackParams {
    /// Builds params directly; empty strings count as absent.
    #[must_use]
    pub fn new(code: Option<String>, error: Option<String>) -> Self {
        Self {
            code: code.filter(|c| !c.is_empty()),
            error: error.filter(|e| !e.is_empty()),
        }
    }

    /// Reads the params from the landing URL.
    #[must_use]
    pub fn from_url(url: &reqwest::Url) -> Self {
        let mut code = None;
        let mut error = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" if code.is_none() => code = Some(value.into_owned()),
                "error" if error.is_none() => error = Some(value.into_owned()),
                _ => {}
            }
        }
        Self::new(code, error)
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Progress of the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackState {
    Idle,
    Authenticating,
    Success,
    Failure,
}

/// Where to go once the landing page is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Back to the entry screen right away.
    Home,
    /// Back to the entry screen after showing a failure.
    HomeAfter { delay: Duration },
    /// Full reload of the application root so the bootstrap runs.
    ReloadRoot { delay: Duration },
}

impl Navigation {
    #[must_use]
    pub fn delay(&self) -> Duration {
        match self {
            Self::Home => Duration::ZERO,
            Self::HomeAfter { delay } | Self::ReloadRoot { delay } => *delay,
        }
    }
}

/// Drives one landing from redirect to navigation.
pub struct CallbackOrchestrator<A> {
    api: A,
    state: CallbackState,
    status: String,
    ran: bool,
}

impl<A: ExchangeApi> CallbackOrchestrator<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: CallbackState::Idle,
            status: INITIAL_STATUS.to_string(),
            ran: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> CallbackState {
        self.state
    }

    /// Status line to display.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Handles the landing. May only be called once.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::AlreadyRun`] on a second call. Exchange and
    /// storage failures are not errors: they end in `Failure` with a status
    /// line and a navigation back home.
    pub async fn run(
        &mut self,
        params: &CallbackParams,
        store: &mut impl KeyValueStore,
    ) -> Result<Navigation, CallbackError> {
        if self.ran {
            return Err(CallbackError::AlreadyRun.into());
        }
        self.ran = true;

        if let Some(error) = params.error() {
            tracing::warn!(error, "Discord authorization was not granted");
            self.finish(CallbackState::Failure, CANCELLED_STATUS.to_string());
            return Ok(Navigation::HomeAfter {
                delay: CANCELLED_DELAY,
            });
        }

        let Some(code) = params.code() else {
            tracing::debug!("no code on callback, returning home");
            return Ok(Navigation::Home);
        };

        self.finish(CallbackState::Authenticating, EXCHANGING_STATUS.to_string());

        let session = match self.api.exchange(code).await {
            Ok(session) => session,
            Err(ExchangeError::Rejected { message, .. }) => {
                self.finish(
                    CallbackState::Failure,
                    format!(
                        "Authentication failed: {}. Redirecting...",
                        message.as_deref().unwrap_or("Unknown error")
                    ),
                );
                return Ok(Navigation::HomeAfter {
                    delay: FAILURE_DELAY,
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "exchange failed");
                return Ok(self.fail_with_error());
            }
        };

        if let Err(report) = store_pending(store, &session) {
            tracing::error!(error = %report, "failed to store pending session");
            return Ok(self.fail_with_error());
        }

        tracing::info!(username = session.user().username(), "login handed to bootstrap");
        self.finish(CallbackState::Success, SUCCESS_STATUS.to_string());
        Ok(Navigation::ReloadRoot {
            delay: SUCCESS_DELAY,
        })
    }

    fn finish(&mut self, state: CallbackState, status: String) {
        self.state = state;
        self.status = status;
    }

    fn fail_with_error(&mut self) -> Navigation {
        self.finish(CallbackState::Failure, ERROR_STATUS.to_string());
        Navigation::HomeAfter {
            delay: FAILURE_DELAY,
        }
    }
}

fn store_pending(store: &mut impl KeyValueStore, session: &Session) -> Result<(), StorageError> {
    let user = serde_json::to_string(session.user()).map_err(|e| StorageError::Write {
        path: keys::PENDING_USER.to_string(),
        details: e.to_string(),
    })?;
    store.set(keys::PENDING_TOKEN, session.token())?;
    if let Err(report) = store.set(keys::PENDING_USER, &user) {
        if let Err(cleanup) = store.remove(keys::PENDING_TOKEN) {
            tracing::warn!(error = %cleanup, "failed to clear orphaned pending token");
        }
        return Err(report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{SessionShell, ShellState};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use oxcyshop_platform_access::{Plan, SessionUser};
    use std::sync::Mutex;

    struct FakeExchange {
        result: std::result::Result<Session, ExchangeError>,
        codes: Mutex<Vec<String>>,
    }

    impl FakeExchange {
        fn returning(result: std::result::Result<Session, ExchangeError>) -> Self {
            Self {
                result,
                codes: Mutex::new(Vec::new()),
            }
        }

        fn codes(&self) -> Vec<String> {
            self.codes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExchangeApi for FakeExchange {
        async fn exchange(&self, code: &str) -> std::result::Result<Session, ExchangeError> {
            self.codes.lock().unwrap().push(code.to_string());
            self.result.clone()
        }
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                path: key.to_string(),
                details: "read-only".to_string(),
            }
            .into())
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn premium_session() -> Session {
        Session::new("tok", SessionUser::new("oxcy", "", Plan::Premium))
    }

    fn with_code(code: &str) -> CallbackParams {
        CallbackParams::new(Some(code.to_string()), None)
    }

    #[test]
    fn params_from_url() {
        let url = reqwest::Url::parse("http://localhost:3000/auth/callback?code=abc123&state=x")
            .unwrap();
        let params = CallbackParams::from_url(&url);
        assert_eq!(params.code(), Some("abc123"));
        assert!(params.error().is_none());

        let url = reqwest::Url::parse(
            "http://localhost:3000/auth/callback?error=access_denied&code=",
        )
        .unwrap();
        let params = CallbackParams::from_url(&url);
        assert_eq!(params.error(), Some("access_denied"));
        assert!(params.code().is_none());
    }

    #[tokio::test]
    async fn cancelled_authorization_goes_home() {
        let mut orchestrator =
            CallbackOrchestrator::new(FakeExchange::returning(Ok(premium_session())));
        let mut store = MemoryStore::new();

        let params = CallbackParams::new(Some("abc".into()), Some("access_denied".into()));
        let nav = orchestrator.run(&params, &mut store).await.unwrap();

        assert_eq!(nav.delay(), Duration::from_millis(1500));
        assert_eq!(orchestrator.state(), CallbackState::Failure);
        assert_eq!(
            orchestrator.status(),
            "Discord authentication cancelled. Redirecting..."
        );
        assert!(orchestrator.api.codes().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn missing_code_returns_home_without_status_change() {
        let mut orchestrator =
            CallbackOrchestrator::new(FakeExchange::returning(Ok(premium_session())));
        let mut store = MemoryStore::new();

        let nav = orchestrator
            .run(&CallbackParams::default(), &mut store)
            .await
            .unwrap();

        assert_eq!(nav, Navigation::Home);
        assert_eq!(orchestrator.state(), CallbackState::Idle);
        assert_eq!(orchestrator.status(), "Authenticating with Discord...");
    }

    #[tokio::test]
    async fn success_writes_pending_slots() {
        let mut orchestrator =
            CallbackOrchestrator::new(FakeExchange::returning(Ok(premium_session())));
        let mut store = MemoryStore::new();

        let nav = orchestrator.run(&with_code("abc123"), &mut store).await.unwrap();

        assert_eq!(
            nav,
            Navigation::ReloadRoot {
                delay: Duration::from_millis(500)
            }
        );
        assert_eq!(orchestrator.state(), CallbackState::Success);
        assert_eq!(orchestrator.status(), "Login successful! Redirecting...");
        assert_eq!(orchestrator.api.codes(), vec!["abc123".to_string()]);
        assert_eq!(store.get(keys::PENDING_TOKEN).as_deref(), Some("tok"));
        let user: SessionUser =
            serde_json::from_str(&store.get(keys::PENDING_USER).unwrap()).unwrap();
        assert_eq!(user.plan(), Plan::Premium);
    }

    #[tokio::test]
    async fn rejection_shows_server_reason() {
        let mut orchestrator = CallbackOrchestrator::new(FakeExchange::returning(Err(
            ExchangeError::Rejected {
                status: 403,
                message: Some(
                    "Access denied. You are not authorized to access this application."
                        .to_string(),
                ),
            },
        )));
        let mut store = MemoryStore::new();

        let nav = orchestrator.run(&with_code("abc123"), &mut store).await.unwrap();

        assert_eq!(nav.delay(), Duration::from_millis(2500));
        assert_eq!(
            orchestrator.status(),
            "Authentication failed: Access denied. You are not authorized to access this application.. Redirecting..."
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rejection_without_reason_reads_unknown() {
        let mut orchestrator = CallbackOrchestrator::new(FakeExchange::returning(Err(
            ExchangeError::Rejected {
                status: 500,
                message: None,
            },
        )));

        orchestrator
            .run(&with_code("abc123"), &mut MemoryStore::new())
            .await
            .unwrap();

        assert_eq!(
            orchestrator.status(),
            "Authentication failed: Unknown error. Redirecting..."
        );
    }

    #[tokio::test]
    async fn transport_failure_is_generic_error() {
        let mut orchestrator = CallbackOrchestrator::new(FakeExchange::returning(Err(
            ExchangeError::Transport {
                details: "connection refused".to_string(),
            },
        )));

        let nav = orchestrator
            .run(&with_code("abc123"), &mut MemoryStore::new())
            .await
            .unwrap();

        assert_eq!(nav.delay(), Duration::from_millis(2500));
        assert_eq!(orchestrator.state(), CallbackState::Failure);
        assert_eq!(orchestrator.status(), "Authentication error. Redirecting...");
    }

    #[tokio::test]
    async fn storage_failure_is_generic_error() {
        let mut orchestrator =
            CallbackOrchestrator::new(FakeExchange::returning(Ok(premium_session())));

        let nav = orchestrator
            .run(&with_code("abc123"), &mut ReadOnlyStore)
            .await
            .unwrap();

        assert!(matches!(nav, Navigation::HomeAfter { .. }));
        assert_eq!(orchestrator.status(), "Authentication error. Redirecting...");
    }

    /// Memory store that refuses the pending user write.
    #[derive(Default)]
    struct NoPendingUserStore(MemoryStore);

    impl KeyValueStore for NoPendingUserStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == keys::PENDING_USER {
                return Err(StorageError::Write {
                    path: key.to_string(),
                    details: "quota exceeded".to_string(),
                }
                .into());
            }
            self.0.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.0.remove(key)
        }
    }

    #[tokio::test]
    async fn half_stored_login_leaves_no_pending_token() {
        let mut orchestrator =
            CallbackOrchestrator::new(FakeExchange::returning(Ok(premium_session())));
        let mut store = NoPendingUserStore::default();

        let nav = orchestrator.run(&with_code("abc123"), &mut store).await.unwrap();

        assert!(matches!(nav, Navigation::HomeAfter { .. }));
        assert_eq!(orchestrator.state(), CallbackState::Failure);
        assert!(store.get(keys::PENDING_TOKEN).is_none());
        assert!(store.0.is_empty());
    }

    #[tokio::test]
    async fn second_run_is_rejected() {
        let mut orchestrator =
            CallbackOrchestrator::new(FakeExchange::returning(Ok(premium_session())));
        let mut store = MemoryStore::new();

        orchestrator.run(&with_code("abc123"), &mut store).await.unwrap();
        let report = orchestrator
            .run(&with_code("abc123"), &mut store)
            .await
            .unwrap_err();

        assert!(report.to_string().contains("already handled"));
        assert_eq!(orchestrator.api.codes().len(), 1);
    }

    #[tokio::test]
    async fn callback_then_bootstrap_consumes_pending_once() {
        let mut orchestrator =
            CallbackOrchestrator::new(FakeExchange::returning(Ok(premium_session())));
        let mut store = MemoryStore::new();
        store.set(keys::TERMS_ACCEPTED, "true").unwrap();
        orchestrator.run(&with_code("abc123"), &mut store).await.unwrap();

        let mut shell = SessionShell::new(store);
        let state = shell.bootstrap().unwrap().clone();

        assert_eq!(state, ShellState::Active(premium_session()));
        assert!(shell.store().get(keys::PENDING_TOKEN).is_none());
        assert!(shell.store().get(keys::PENDING_USER).is_none());

        let mut relaunched = SessionShell::new(shell.into_store());
        assert_eq!(
            relaunched.bootstrap().unwrap(),
            &ShellState::Active(premium_session())
        );
    }
}
