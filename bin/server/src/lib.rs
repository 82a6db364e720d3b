//! OxcyShop login server.
//!
//! Exchanges Discord authorization codes for file-host sessions. The browser
//! lands on the callback page with a `code`, the client posts it to
//! `/api/auth/discord`, and this crate runs the handshake: Discord token
//! exchange, profile lookup, whitelist check, session issuance.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;

#[cfg(test)]
mod test_support;
