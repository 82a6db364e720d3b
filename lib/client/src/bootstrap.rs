//! Session bootstrap at application start.
//!
//! On launch the client reads the store once into a [`StorageSnapshot`] and
//! resolves it to exactly one [`SessionResolution`], first match wins:
//!
//! 1. a pending token and pending user left by the login callback
//! 2. a durable token and user from an earlier session
//! 3. nothing usable
//!
//! A pending login is only consumed when the caller commits it, which removes
//! both pending keys. A fresh login then passes the terms gate before it is
//! written to the durable slot; a restored session never sees the gate.

use oxcyshop_core::Result;
use oxcyshop_platform_access::{Session, SessionUser};

use crate::error::StorageError;
use crate::language::Language;
use crate::storage::{KeyValueStore, keys};

/// Value stored under the terms key once accepted.
const TERMS_ACCEPTED_VALUE: &str = "true";

/// One consistent read of every key the bootstrap looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSnapshot {
    pending_token: Option<String>,
    pending_user: Option<SessionUser>,
    token: Option<String>,
    user: Option<SessionUser>,
    terms_accepted: bool,
}

impl StorageSnapshot {
    /// Reads the store.
    pub fn capture(store: &impl KeyValueStore) -> Self {
        Self {
            pending_token: store.get(keys::PENDING_TOKEN),
            pending_user: read_user(store, keys::PENDING_USER),
            token: store.get(keys::TOKEN),
            user: read_user(store, keys::USER),
            terms_accepted: store.get(keys::TERMS_ACCEPTED).as_deref()
                == Some(TERMS_ACCEPTED_VALUE),
        }
    }

    #[must_use]
    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    /// Resolves the snapshot.
    #[must_use]
    pub fn resolve(self) -> SessionResolution {
        if let (Some(token), Some(user)) = (self.pending_token, self.pending_user) {
            return SessionResolution::PendingLogin(PendingLogin {
                session: Session::new(token, user),
            });
        }
        if let (Some(token), Some(user)) = (self.token, self.user) {
            return SessionResolution::RestoredSession(Session::new(token, user));
        }
        SessionResolution::LoggedOut
    }
}

fn read_user(store: &impl KeyValueStore, key: &str) -> Option<SessionUser> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring unreadable stored user");
            None
        }
    }
}

/// Outcome of resolving a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResolution {
    /// The login callback left a session to claim.
    PendingLogin(PendingLogin),
    /// An earlier session is still stored.
    RestoredSession(Session),
    /// No usable session.
    LoggedOut,
}

/// A session handed over by the login callback, not yet claimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLogin {
    session: Session,
}

impl PendingLogin {
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Claims the session, removing both pending keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written; the pending keys may
    /// then still be present.
    pub fn commit(self, store: &mut impl KeyValueStore) -> Result<Session, StorageError> {
        store.remove(keys::PENDING_TOKEN)?;
        store.remove(keys::PENDING_USER)?;
        Ok(self.session)
    }
}

/// Where the application shell stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellState {
    LoggedOut,
    /// A fresh login held in memory until the terms are answered.
    AwaitingTerms(Session),
    Active(Session),
}

/// Warning shown when the terms of service are declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermsNotice {
    pub title: &'static str,
    pub description: &'static str,
}

impl TermsNotice {
    #[must_use]
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::En => Self {
                title: "Terms Required",
                description: "You must accept the terms of service to use this platform.",
            },
            Language::Es => Self {
                title: "Términos Requeridos",
                description: "Debes aceptar los términos de servicio para usar esta plataforma.",
            },
        }
    }
}

/// Application shell: owns the store and the current session state.
#[derive(Debug)]
pub struct SessionShell<S> {
    store: S,
    state: ShellState,
}

impl<S: KeyValueStore> SessionShell<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: ShellState::LoggedOut,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// The session the dashboard may use, if any.
    #[must_use]
    pub fn active_session(&self) -> Option<&Session> {
        match &self.state {
            ShellState::Active(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    #[must_use]
    pub fn language(&self) -> Language {
        Language::load(&self.store)
    }

    /// Persists a new language preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set_language(&mut self, language: Language) -> Result<(), StorageError> {
        language.save(&mut self.store)
    }

    /// Resolves the stored state. Only acts while logged out, so a second
    /// call in the same launch changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a pending login cannot be claimed or written. A
    /// login whose durable write fails stays in the pending slot for the
    /// next launch.
    pub fn bootstrap(&mut self) -> Result<&ShellState, StorageError> {
        if self.state != ShellState::LoggedOut {
            return Ok(&self.state);
        }

        let snapshot = StorageSnapshot::capture(&self.store);
        let terms_accepted = snapshot.terms_accepted();

        self.state = match snapshot.resolve() {
            SessionResolution::PendingLogin(pending) => {
                if terms_accepted {
                    persist_session(&mut self.store, pending.session())?;
                    let session = pending.commit(&mut self.store)?;
                    tracing::info!(username = session.user().username(), "login completed");
                    ShellState::Active(session)
                } else {
                    let session = pending.commit(&mut self.store)?;
                    tracing::debug!("login awaiting terms acceptance");
                    ShellState::AwaitingTerms(session)
                }
            }
            SessionResolution::RestoredSession(session) => {
                tracing::debug!(username = session.user().username(), "session restored");
                ShellState::Active(session)
            }
            SessionResolution::LoggedOut => ShellState::LoggedOut,
        };

        Ok(&self.state)
    }

    /// Records acceptance and activates the held session.
    ///
    /// Does nothing unless a session is awaiting terms.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn accept_terms(&mut self) -> Result<&ShellState, StorageError> {
        if let ShellState::AwaitingTerms(session) = &self.state {
            let session = session.clone();
            self.store.set(keys::TERMS_ACCEPTED, TERMS_ACCEPTED_VALUE)?;
            persist_session(&mut self.store, &session)?;
            self.state = ShellState::Active(session);
        }
        Ok(&self.state)
    }

    /// Discards the held session without writing anything.
    ///
    /// Returns the notice to show, or `None` if nothing was awaiting terms.
    pub fn reject_terms(&mut self) -> Option<TermsNotice> {
        if !matches!(self.state, ShellState::AwaitingTerms(_)) {
            return None;
        }
        self.state = ShellState::LoggedOut;
        Some(TermsNotice::for_language(self.language()))
    }

    /// Clears the durable session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.store.remove(keys::TOKEN)?;
        self.store.remove(keys::USER)?;
        self.state = ShellState::LoggedOut;
        Ok(())
    }
}

fn persist_session(store: &mut impl KeyValueStore, session: &Session) -> Result<(), StorageError> {
    let user = serde_json::to_string(session.user()).map_err(|e| StorageError::Write {
        path: keys::USER.to_string(),
        details: e.to_string(),
    })?;
    store.set(keys::TOKEN, session.token())?;
    store.set(keys::USER, &user)?;
    Ok(())
}
