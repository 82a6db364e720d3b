//! Core types shared by every OxcyShop crate.
//!
//! This crate provides the foundational identifier newtypes and the
//! `Result` alias used by the server and the client libraries.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{FileId, IdentityId, ParseIdError};
