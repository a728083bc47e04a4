//! Token endpoint response
//!
//! Mixcloud answers a successful code exchange with `{"access_token": "..."}`.
//! Tokens carry no expiry; a revoked token shows up later as a rejected
//! status on an API call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Decoded token endpoint response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Any other fields the endpoint returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenResponse {
    /// Interpret a decoded token endpoint body.
    ///
    /// Error payloads such as `{"error":"invalid_grant"}` arrive with a
    /// success status, so a missing `access_token` is the failure signal.
    pub fn from_json(value: Value) -> Result<Self> {
        match value.get("access_token") {
            Some(Value::String(_)) => serde_json::from_value(value)
                .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}"))),
            Some(_) => Err(Error::TokenExchange(
                "access_token is not a string".into(),
            )),
            None => {
                let reason = value
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("no access_token in response");
                Err(Error::TokenExchange(reason.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_response_deserializes() {
        let token = TokenResponse::from_json(json!({"access_token": "tok123"})).unwrap();
        assert_eq!(token.access_token, "tok123");
        assert!(token.extra.is_empty());
    }

    #[test]
    fn extra_fields_are_kept() {
        let token =
            TokenResponse::from_json(json!({"access_token": "tok123", "scope": "read"})).unwrap();
        assert_eq!(token.extra.get("scope"), Some(&json!("read")));

        let json = serde_json::to_string(&token).unwrap();
        assert!(json.contains("\"access_token\":\"tok123\""));
        assert!(json.contains("\"scope\":\"read\""));
    }

    #[test]
    fn error_payload_is_token_exchange_error() {
        let err = TokenResponse::from_json(json!({"error": "invalid_grant"})).unwrap_err();
        match err {
            Error::TokenExchange(msg) => assert_eq!(msg, "invalid_grant"),
            other => panic!("expected TokenExchange, got: {other:?}"),
        }
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = TokenResponse::from_json(Value::Null).unwrap_err();
        assert!(matches!(err, Error::TokenExchange(_)), "got: {err:?}");
    }

    #[test]
    fn non_string_token_is_rejected() {
        let err = TokenResponse::from_json(json!({"access_token": 42})).unwrap_err();
        assert!(matches!(err, Error::TokenExchange(_)), "got: {err:?}");
    }
}
