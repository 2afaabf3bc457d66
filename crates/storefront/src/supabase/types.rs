//! Wire types for the auth service.

use chrono::{DateTime, Duration, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use gemini_glam_core::{AppRole, UserId};

/// The authenticated user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens issued by sign-in, sign-up, or refresh.
#[derive(Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token in seconds.
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    pub user: AuthUser,
}

const fn default_expires_in() -> i64 {
    3600
}

impl AuthSession {
    /// When the access token stops being accepted, measured from `issued`.
    #[must_use]
    pub fn expires_at(&self, issued: DateTime<Utc>) -> DateTime<Utc> {
        issued + Duration::seconds(self.expires_in)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish()
    }
}

/// Result of a sign-up.
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// Email confirmation is off; the visitor is signed in right away.
    SignedIn(AuthSession),
    /// A confirmation mail was sent; no session yet.
    ConfirmationRequired,
}

/// Sign-up response: a session when auto-confirm is on, a bare user otherwise.
///
/// The bare user is not needed; it only means no session was issued.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpResponse {
    Session(AuthSession),
    User(IgnoredAny),
}

impl From<SignUpResponse> for SignUpOutcome {
    fn from(response: SignUpResponse) -> Self {
        match response {
            SignUpResponse::Session(session) => Self::SignedIn(session),
            SignUpResponse::User(_) => Self::ConfirmationRequired,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

#[derive(Serialize)]
pub(crate) struct SignUpBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
pub(crate) struct SignUpMetadata<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<&'a str>,
}

/// Insert body for `user_roles`.
#[derive(Serialize)]
pub(crate) struct NewUserRole {
    pub user_id: UserId,
    pub role: AppRole,
}

/// Update body for `user_roles`.
#[derive(Serialize)]
pub(crate) struct RolePatch {
    pub role: AppRole,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const SESSION_JSON: &str = r#"{
        "access_token": "eyJhbGciOiJIUzI1NiJ9.access",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1735689600,
        "refresh_token": "r3fr3sh",
        "user": {
            "id": "7d3b0a52-90a1-4c8e-8f3e-0e1f2a3b4c5d",
            "aud": "authenticated",
            "email": "ada@glam.test"
        }
    }"#;

    #[test]
    fn test_session_deserializes_and_expires() {
        let session: AuthSession = serde_json::from_str(SESSION_JSON).expect("deserialize");
        assert_eq!(session.user.email.as_deref(), Some("ada@glam.test"));

        let issued = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            session.expires_at(issued),
            Utc.with_ymd_and_hms(2025, 1, 1, 1, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_session_debug_redacts_tokens() {
        let session: AuthSession = serde_json::from_str(SESSION_JSON).expect("deserialize");
        let debug = format!("{session:?}");
        assert!(!debug.contains("r3fr3sh"));
        assert!(!debug.contains("eyJhbGci"));
    }

    #[test]
    fn test_sign_up_without_session_needs_confirmation() {
        let json = r#"{"id":"7d3b0a52-90a1-4c8e-8f3e-0e1f2a3b4c5d","email":"ada@glam.test","confirmation_sent_at":"2025-01-01T00:00:00Z"}"#;
        let response: SignUpResponse = serde_json::from_str(json).expect("deserialize");
        assert!(matches!(
            SignUpOutcome::from(response),
            SignUpOutcome::ConfirmationRequired
        ));
    }

    #[test]
    fn test_sign_up_with_session_signs_in() {
        let response: SignUpResponse = serde_json::from_str(SESSION_JSON).expect("deserialize");
        assert!(matches!(
            SignUpOutcome::from(response),
            SignUpOutcome::SignedIn(_)
        ));
    }

    #[test]
    fn test_sign_up_body_omits_missing_name() {
        let body = SignUpBody {
            email: "ada@glam.test",
            password: "pw",
            data: SignUpMetadata { full_name: None },
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["data"], serde_json::json!({}));
    }
}
