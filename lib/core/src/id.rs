//! Strongly-typed identifiers for domain entities.
//!
//! Identifiers in this system are issued by external services (Discord
//! snowflakes, storage backend file names), so they are opaque strings
//! rather than locally generated values. The newtypes keep an identity ID
//! from being passed where a file ID is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ID string that is empty or contains whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// Name of the ID type, e.g. `IdentityId`.
    pub id_type: &'static str,
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to generate a strongly-typed wrapper around an externally issued string ID.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an ID string without validation.
            ///
            /// Use `parse` when the value comes from configuration.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        id_type: stringify!($name),
                        reason: "empty identifier".to_string(),
                    });
                }
                if trimmed.chars().any(char::is_whitespace) {
                    return Err(ParseIdError {
                        id_type: stringify!($name),
                        reason: format!("identifier '{trimmed}' contains whitespace"),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of a Discord account (a decimal snowflake).
    IdentityId
);

define_id!(
    /// Identifier of a file held by the storage backend.
    FileId
);
