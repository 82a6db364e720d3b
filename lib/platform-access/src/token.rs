//! Locally synthesized session tokens.
//!
//! When the storage backend cannot issue a token, the handshake still
//! completes with a token of the form `base64("{identity_id}:{epoch_millis}")`.
//! The encoding is reversible and unsigned: anyone holding the string can
//! read the identity ID and issuance time back out of it, so it proves
//! nothing about who presented it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use oxcyshop_core::IdentityId;

/// A decoded fallback token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackToken {
    identity_id: IdentityId,
    issued_at_millis: i64,
}

impl FallbackToken {
    #[must_use]
    pub fn new(identity_id: IdentityId, issued_at: DateTime<Utc>) -> Self {
        Self {
            identity_id,
            issued_at_millis: issued_at.timestamp_millis(),
        }
    }

    /// Creates a token stamped with the current time.
    #[must_use]
    pub fn now(identity_id: IdentityId) -> Self {
        Self::new(identity_id, Utc::now())
    }

    #[must_use]
    pub fn identity_id(&self) -> &IdentityId {
        &self.identity_id
    }

    #[must_use]
    pub fn issued_at_millis(&self) -> i64 {
        self.issued_at_millis
    }

    /// Encodes the token in its wire form.
    #[must_use]
    pub fn encode(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.identity_id, self.issued_at_millis))
    }

    /// Decodes a token produced by [`encode`](Self::encode).
    ///
    /// Returns `None` for backend-issued tokens and anything else that does
    /// not have the `{id}:{integer}` shape.
    #[must_use]
    pub fn decode(token: &str) -> Option<Self> {
        let bytes = STANDARD.decode(token).ok()?;
        let text = String::from_utf8(bytes).ok()?;
        let (id, millis) = text.rsplit_once(':')?;
        if id.is_empty() {
            return None;
        }
        let issued_at_millis = millis.parse::<i64>().ok()?;
        Some(Self {
            identity_id: IdentityId::new(id),
            issued_at_millis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn encode_matches_base64_of_id_and_millis() {
        let issued = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let token = FallbackToken::new(IdentityId::new("998836610516914236"), issued);
        assert_eq!(
            token.encode(),
            STANDARD.encode("998836610516914236:1700000000123")
        );
    }

    #[test]
    fn decode_recovers_identity_and_time() {
        let token = FallbackToken::now(IdentityId::new("1384032725014548591"));
        let decoded = FallbackToken::decode(&token.encode()).expect("decodes");
        assert_eq!(decoded, token);
        assert_eq!(decoded.identity_id().as_str(), "1384032725014548591");
    }

    #[test]
    fn decode_rejects_opaque_backend_tokens() {
        assert!(FallbackToken::decode("not base64 !!").is_none());
        assert!(FallbackToken::decode(&STANDARD.encode("no-separator")).is_none());
        assert!(FallbackToken::decode(&STANDARD.encode("id:notanumber")).is_none());
        assert!(FallbackToken::decode(&STANDARD.encode(":123")).is_none());
    }
}
