//! Error types for the hosted backend client.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a gateway or availability failure.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The service rejected the request.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// Credentials or token were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by the service.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// The configured project URL cannot take path segments.
    #[error("project url cannot be used as a base")]
    BaseUrl,
}

impl BackendError {
    /// Whether the service could not be reached at all.
    ///
    /// Gates treat this as "still pending" instead of a denial.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Unavailable(_))
    }
}

/// Error body shapes returned by the auth, rest, and storage services.
///
/// Each service names its message field differently; [`Self::message`]
/// picks whichever is present.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Most descriptive message available.
    #[must_use]
    pub fn message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

/// Best-effort message from a raw error body.
pub(crate) fn message_from_body(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::message)
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::RateLimited(30);
        assert_eq!(err.to_string(), "rate limited, retry after 30 seconds");

        let err = BackendError::Status {
            status: 409,
            message: "duplicate key value".to_string(),
        };
        assert_eq!(err.to_string(), "API error (409): duplicate key value");
    }

    #[test]
    fn test_unreachable_classification() {
        assert!(BackendError::Unavailable("502".to_string()).is_unreachable());
        assert!(!BackendError::Unauthorized("bad token".to_string()).is_unreachable());
        assert!(!BackendError::Parse("eof".to_string()).is_unreachable());
    }

    #[test]
    fn test_message_from_auth_body() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(message_from_body(body), "Invalid login credentials");
    }

    #[test]
    fn test_message_from_rest_body() {
        let body = r#"{"code":"42501","details":null,"hint":null,"message":"permission denied for table products"}"#;
        assert_eq!(message_from_body(body), "permission denied for table products");
    }

    #[test]
    fn test_message_from_plain_body() {
        assert_eq!(message_from_body(" Bad Gateway \n"), "Bad Gateway");
    }
}
