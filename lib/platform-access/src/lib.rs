//! Platform access, identity, and session types for the OxcyShop file host.
//!
//! This crate provides:
//! - The Discord identity resolved during login (`Identity`)
//! - The whitelist that decides who may log in (`Whitelist`)
//! - Session types shared by the server and the client (`Session`, `SessionUser`)
//! - Storage plans and their upload limits (`Plan`, `PlanLimits`)
//! - Locally synthesized fallback tokens (`FallbackToken`)
//! - The error taxonomy of the login handshake (`HandshakeError`)
//!
//! # Access Control Model
//!
//! Login is gated by a fixed set of Discord account IDs. There are no roles
//! or groups: an identity is either on the whitelist or it is denied, and
//! every admitted identity receives the premium plan.
//!
//! # Example
//!
//! ```
//! use oxcyshop_platform_access::{Identity, Plan, Session, SessionSource, Whitelist};
//!
//! let whitelist = Whitelist::from_ids(["998836610516914236"]);
//! let identity = Identity::new("998836610516914236", "oxcy", Some("a1b2c3".to_string()));
//!
//! assert!(whitelist.authorize(&identity).is_ok());
//!
//! let session = Session::for_identity(&identity, SessionSource::Issued("tok".to_string()));
//! assert_eq!(session.user().plan(), Plan::Premium);
//! assert_eq!(
//!     session.user().avatar_url(),
//!     "https://cdn.discordapp.com/avatars/998836610516914236/a1b2c3.png"
//! );
//! ```

pub mod auth;
pub mod discord;
pub mod error;
pub mod identity;
pub mod plan;
pub mod session;
pub mod token;
pub mod whitelist;

// Re-export main types at crate root
pub use auth::{ErrorBody, ExchangeRequest, ExchangeResponse};
pub use discord::{DiscordConfig, DiscordConfigBuilder};
pub use error::{HandshakeError, UploadRejection};
pub use identity::Identity;
pub use plan::{Plan, PlanLimits, format_bytes};
pub use session::{Session, SessionSource, SessionUser};
pub use token::FallbackToken;
pub use whitelist::{AccessConfig, Whitelist};
