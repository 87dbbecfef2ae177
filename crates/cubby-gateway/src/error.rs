//! Gateway error taxonomy.

use serde::Deserialize;
use thiserror::Error;

/// A failed gateway call.
///
/// Closed taxonomy: every transport or backend failure lands in exactly one
/// of these variants with a human-readable message. Callers surface the
/// message on the current screen; none of these change session phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backend rejected the request payload (HTTP 422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Authentication required (HTTP 401).
    #[error("unauthorized: authentication required")]
    Unauthorized,

    /// The caller is not allowed to perform this action (HTTP 403).
    #[error("forbidden: no permission for this action")]
    Forbidden,

    /// The locker or resource does not exist (HTTP 404).
    #[error("resource not found")]
    NotFound,

    /// Any other backend failure, including malformed success bodies.
    #[error("backend error {status}: {message}")]
    Server {
        /// HTTP status code of the response.
        status: u16,
        /// Status text or decode failure description.
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),
}

/// FastAPI-style 422 body: `{"detail": [{"loc": [...], "msg": "...", ...}]}`.
#[derive(Debug, Deserialize)]
struct ValidationBody {
    #[serde(default)]
    detail: Vec<ValidationDetail>,
}

#[derive(Debug, Deserialize)]
struct ValidationDetail {
    #[serde(default)]
    msg: String,
}

impl GatewayError {
    /// Map a non-success HTTP response to its taxonomy variant.
    ///
    /// `body` is the raw response text; only 422 attempts to parse it (first
    /// detail message). An unparsable 422 body falls back to a generic
    /// validation message rather than leaking a decode error.
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            422 => {
                let message = serde_json::from_str::<ValidationBody>(body)
                    .ok()
                    .and_then(|v| v.detail.into_iter().next())
                    .map(|d| d.msg)
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "invalid request data".to_string());
                Self::Validation(message)
            },
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            status => {
                Self::Server { status, message: "request failed".to_string() }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_validation_detail() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address","type":"value_error.email"}]}"#;
        assert_eq!(
            GatewayError::from_response(422, body),
            GatewayError::Validation("value is not a valid email address".to_string())
        );
    }

    #[test]
    fn unparsable_validation_body_falls_back() {
        assert_eq!(
            GatewayError::from_response(422, "<html>oops</html>"),
            GatewayError::Validation("invalid request data".to_string())
        );
        assert_eq!(
            GatewayError::from_response(422, r#"{"detail":[]}"#),
            GatewayError::Validation("invalid request data".to_string())
        );
    }

    #[test]
    fn maps_auth_and_missing() {
        assert_eq!(GatewayError::from_response(401, ""), GatewayError::Unauthorized);
        assert_eq!(GatewayError::from_response(403, ""), GatewayError::Forbidden);
        assert_eq!(GatewayError::from_response(404, ""), GatewayError::NotFound);
    }

    #[test]
    fn other_statuses_are_generic() {
        assert!(matches!(
            GatewayError::from_response(500, ""),
            GatewayError::Server { status: 500, .. }
        ));
        assert!(matches!(
            GatewayError::from_response(418, ""),
            GatewayError::Server { status: 418, .. }
        ));
    }
}
