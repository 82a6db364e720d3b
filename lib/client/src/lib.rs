//! Client-side session handling for the OxcyShop file host.
//!
//! This crate provides:
//! - Key/value persistence for session state (`KeyValueStore`)
//! - The login callback landing logic (`CallbackOrchestrator`)
//! - Session bootstrap and the terms-of-service gate (`SessionShell`)
//! - A typed client for the storage backend's file operations (`FileHostClient`)
//!
//! # Login flow
//!
//! The callback exchanges the authorization code and leaves the session in
//! the pending slots. After the reload, the bootstrap claims it exactly once
//! and, once the terms are accepted, moves it to the durable slot where later
//! launches find it.
//!
//! ```
//! use oxcyshop_client::{MemoryStore, KeyValueStore, SessionShell, ShellState, keys};
//!
//! let mut store = MemoryStore::new();
//! store.set(keys::PENDING_TOKEN, "tok").unwrap();
//! store
//!     .set(keys::PENDING_USER, r#"{"username":"oxcy","avatar":"","plan":"premium"}"#)
//!     .unwrap();
//!
//! let mut shell = SessionShell::new(store);
//! assert!(matches!(shell.bootstrap().unwrap(), ShellState::AwaitingTerms(_)));
//!
//! shell.accept_terms().unwrap();
//! assert_eq!(shell.active_session().map(|s| s.token()), Some("tok"));
//! ```

pub mod bootstrap;
pub mod callback;
pub mod error;
pub mod exchange;
pub mod files;
pub mod language;
pub mod storage;

pub use bootstrap::{
    PendingLogin, SessionResolution, SessionShell, ShellState, StorageSnapshot, TermsNotice,
};
pub use callback::{CallbackOrchestrator, CallbackParams, CallbackState, Navigation};
pub use error::{CallbackError, ExchangeError, FilesError, StorageError};
pub use exchange::{ExchangeApi, HttpExchangeApi};
pub use files::{FileHostClient, StoredFile};
pub use language::Language;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, keys};
