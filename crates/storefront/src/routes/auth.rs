//! Authentication route handlers.
//!
//! Email and password sign-in and sign-up against the hosted auth service.
//! Outcomes are reported as notices on the next page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use gemini_glam_core::Email;
use gemini_glam_core::gate::SessionCheck;

use crate::error::Result;
use crate::filters;
use crate::htmx;
use crate::middleware::{resolve_session, sign_in_user};
use crate::models::session::{push_notice, take_notices};
use crate::models::{CurrentUser, Notice, session_keys};
use crate::state::AppState;
use crate::supabase::{AuthSession, BackendError, SignUpOutcome};

// =============================================================================
// Form Types
// =============================================================================

/// Sign-in form data.
#[derive(Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Sign-up form data.
#[derive(Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
}

/// Which form the auth page opens on.
#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    pub mode: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-in / sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth.html")]
pub struct AuthTemplate {
    pub notices: Vec<Notice>,
    pub sign_up: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the auth page, or go home if already signed in.
#[instrument(skip_all)]
pub async fn page(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<AuthQuery>,
) -> Result<Response> {
    if let SessionCheck::Signed(_) = resolve_session(&session, state.backend()).await? {
        return Ok(htmx::redirect(&headers, "/"));
    }

    Ok(AuthTemplate {
        notices: take_notices(&session).await?,
        sign_up: query.mode.as_deref() == Some("sign-up"),
    }
    .into_response())
}

/// Handle sign-in form submission.
#[instrument(skip_all)]
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<SignInForm>,
) -> Result<Response> {
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            push_notice(&session, Notice::error("Sign In Failed", &e.to_string())).await?;
            return Ok(htmx::redirect(&headers, "/auth"));
        }
    };

    match state.backend().sign_in(&email, &form.password).await {
        Ok(auth) => {
            start_session(&session, &auth).await?;
            tracing::info!(user_id = %auth.user.id, "Signed in");
            Ok(htmx::redirect(&headers, "/"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign-in failed");
            push_notice(&session, Notice::error("Sign In Failed", &auth_failure_message(&e)))
                .await?;
            Ok(htmx::redirect(&headers, "/auth"))
        }
    }
}

/// Handle sign-up form submission.
#[instrument(skip_all)]
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<SignUpForm>,
) -> Result<Response> {
    let retry = "/auth?mode=sign-up";
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            push_notice(&session, Notice::error("Sign Up Failed", &e.to_string())).await?;
            return Ok(htmx::redirect(&headers, retry));
        }
    };
    let full_name = Some(form.full_name.trim()).filter(|name| !name.is_empty());

    match state
        .backend()
        .sign_up(&email, &form.password, full_name)
        .await
    {
        Ok(SignUpOutcome::SignedIn(auth)) => {
            start_session(&session, &auth).await?;
            tracing::info!(user_id = %auth.user.id, "Signed up");
            Ok(htmx::redirect(&headers, "/"))
        }
        Ok(SignUpOutcome::ConfirmationRequired) => {
            push_notice(
                &session,
                Notice::success(
                    "Check your email",
                    &format!("We sent a confirmation link to {email}."),
                ),
            )
            .await?;
            Ok(htmx::redirect(&headers, "/auth"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign-up failed");
            push_notice(&session, Notice::error("Sign Up Failed", &auth_failure_message(&e)))
                .await?;
            Ok(htmx::redirect(&headers, retry))
        }
    }
}

/// Sign out and drop the whole session.
///
/// The local session is cleared even if the provider call fails.
#[instrument(skip_all)]
pub async fn sign_out(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    if let Some(user) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await?
    {
        if let Err(e) = state.backend().sign_out(&user.access_token).await {
            tracing::warn!(error = %e, "Provider sign-out failed");
        }
        tracing::info!(user_id = %user.id, "Signed out");
    }

    crate::middleware::clear_current_user(&session).await?;
    session.flush().await?;
    Ok(htmx::redirect(&headers, "/auth"))
}

/// Store a fresh identity and start the shell from the landing view.
async fn start_session(session: &Session, auth: &AuthSession) -> Result<()> {
    session.remove_value(session_keys::SCREEN).await?;
    sign_in_user(session, &CurrentUser::from_auth(auth, Utc::now())).await?;
    Ok(())
}

/// Text shown when the provider refuses or cannot be reached.
fn auth_failure_message(err: &BackendError) -> String {
    match err {
        BackendError::Status { message, .. } | BackendError::Unauthorized(message) => {
            message.clone()
        }
        BackendError::RateLimited(_) => "Too many attempts. Please wait and try again.".to_string(),
        _ => "Unable to reach the sign-in service. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_is_shown_verbatim() {
        let err = BackendError::Status {
            status: 400,
            message: "Invalid login credentials".to_string(),
        };
        assert_eq!(auth_failure_message(&err), "Invalid login credentials");
    }

    #[test]
    fn test_transport_failure_is_generic() {
        let err = BackendError::Unavailable("502 Bad Gateway".to_string());
        assert_eq!(
            auth_failure_message(&err),
            "Unable to reach the sign-in service. Please try again."
        );
    }
}
