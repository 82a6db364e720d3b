//! Wire types of the local code-exchange endpoint.
//!
//! The server deserializes `ExchangeRequest` and answers with either an
//! `ExchangeResponse` or an `ErrorBody`; the client library reads the same
//! types back.

use serde::{Deserialize, Serialize};

use crate::error::HandshakeError;
use crate::session::{Session, SessionUser};

/// Body of `POST /api/auth/discord`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    #[serde(default)]
    code: Option<String>,
}

impl ExchangeRequest {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
        }
    }

    /// Returns the authorization code if it is present and not blank.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Successful exchange: the session token and its user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResponse {
    pub token: String,
    pub user: SessionUser,
}

impl From<Session> for ExchangeResponse {
    fn from(session: Session) -> Self {
        let (token, user) = session.into_parts();
        Self { token, user }
    }
}

impl From<ExchangeResponse> for Session {
    fn from(response: ExchangeResponse) -> Self {
        Session::new(response.token, response.user)
    }
}

/// Failure body: `{ "error": ..., "details": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&HandshakeError> for ErrorBody {
    fn from(err: &HandshakeError) -> Self {
        Self {
            error: err.public_message(),
            details: err.details().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Plan;

    #[test]
    fn blank_code_reads_as_missing() {
        let empty: ExchangeRequest = serde_json::from_str(r#"{"code": ""}"#).unwrap();
        let spaces: ExchangeRequest = serde_json::from_str(r#"{"code": "  \t"}"#).unwrap();
        let absent: ExchangeRequest = serde_json::from_str("{}").unwrap();
        let null: ExchangeRequest = serde_json::from_str(r#"{"code": null}"#).unwrap();

        assert!(empty.code().is_none());
        assert!(spaces.code().is_none());
        assert!(absent.code().is_none());
        assert!(null.code().is_none());
        assert_eq!(ExchangeRequest::new("abc123").code(), Some("abc123"));
    }

    #[test]
    fn response_shape() {
        let session = Session::new("tok", SessionUser::new("oxcy", "", Plan::Premium));
        let json = serde_json::to_value(ExchangeResponse::from(session)).unwrap();

        assert_eq!(json["token"], "tok");
        assert_eq!(json["user"]["username"], "oxcy");
        assert_eq!(json["user"]["avatar"], "");
        assert_eq!(json["user"]["plan"], "premium");
    }

    #[test]
    fn error_body_omits_missing_details() {
        let body = ErrorBody::from(&HandshakeError::missing_code());
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"No code provided"}"#);
    }

    #[test]
    fn error_body_carries_upstream_details() {
        let body = ErrorBody::from(&HandshakeError::token_rejected(400, "bad code".to_string()));
        assert_eq!(body.error, "Discord API error: 400");
        assert_eq!(body.details.as_deref(), Some("bad code"));
    }
}
