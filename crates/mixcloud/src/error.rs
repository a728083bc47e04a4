//! Error types for Mixcloud API operations

/// Errors from Mixcloud API operations.
///
/// Every failure mode of the client surfaces here: transport failures,
/// rejected status codes, token responses without a token, and bodies that
/// are not valid JSON.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("invalid HTTP response code {status}")]
    InvalidHttpResponseCode { status: u16, body: String },

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid JSON response: {0}")]
    Decode(String),
}

impl Error {
    /// Status code of a rejected response, if this is a status error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::InvalidHttpResponseCode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body of a rejected response, if this is a status error.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::InvalidHttpResponseCode { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

/// Result alias for Mixcloud operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_exposes_code_and_body() {
        let err = Error::InvalidHttpResponseCode {
            status: 404,
            body: r#"{"error":{"type":"NotFound"}}"#.into(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(r#"{"error":{"type":"NotFound"}}"#));
        assert_eq!(err.to_string(), "invalid HTTP response code 404");
    }

    #[test]
    fn other_errors_have_no_status_payload() {
        let err = Error::TokenExchange("missing access_token".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
        assert_eq!(
            err.to_string(),
            "token exchange failed: missing access_token"
        );
    }

    #[test]
    fn error_debug_includes_variant_name() {
        let err = Error::Http("connection refused".into());
        let debug = format!("{err:?}");
        assert!(
            debug.contains("Http"),
            "Debug output must include variant name, got: {debug}"
        );
    }
}
