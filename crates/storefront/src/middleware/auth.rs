//! Session resolution and page gates.
//!
//! [`SignedIn`] and [`AdminUser`] run the two-stage gate from
//! `gemini_glam_core::gate` on every request: resolve the stored identity
//! (refreshing its token when due), then, for admin pages, look up the
//! admin role. The role lookup never runs for anonymous visitors.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{HeaderMap, Method, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tower_sessions::Session;

use gemini_glam_core::{AppRole, UserId};
use gemini_glam_core::gate::{Access, Denial, Gate, RoleCheck, SessionCheck};

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::htmx;
use crate::models::session::push_notice;
use crate::models::{CurrentUser, Notice, session_keys};
use crate::state::AppState;
use crate::supabase::Backend;

/// Seconds before the loading page checks again.
pub const RETRY_SECONDS: u32 = 2;

// =============================================================================
// Session Resolution
// =============================================================================

/// Resolve the visitor's identity.
///
/// An expired access token is refreshed through the auth provider. When
/// the provider cannot be reached the check stays pending; when it rejects
/// the refresh token the stored identity is dropped.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn resolve_session(
    session: &Session,
    backend: &dyn Backend,
) -> Result<SessionCheck<CurrentUser>, tower_sessions::session::Error> {
    let Some(user) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await?
    else {
        return Ok(SessionCheck::Anonymous);
    };

    let now = Utc::now();
    if !user.needs_refresh(now) {
        return Ok(SessionCheck::Signed(user));
    }

    match backend.refresh_session(&user.refresh_token).await {
        Ok(auth) => {
            let refreshed = CurrentUser::from_auth(&auth, now);
            set_current_user(session, &refreshed).await?;
            tracing::debug!(user_id = %refreshed.id, "Access token refreshed");
            Ok(SessionCheck::Signed(refreshed))
        }
        Err(e) if e.is_unreachable() => {
            tracing::warn!(error = %e, "Auth provider unreachable during refresh");
            Ok(SessionCheck::Pending)
        }
        Err(e) => {
            tracing::info!(error = %e, user_id = %user.id, "Refresh rejected, signing out");
            clear_current_user(session).await?;
            Ok(SessionCheck::Anonymous)
        }
    }
}

/// Second gate stage: does this identity hold the admin role?
async fn admin_role(backend: &dyn Backend, token: &str, user: UserId) -> RoleCheck {
    match backend.has_role(token, user, AppRole::Admin).await {
        Ok(is_admin) => RoleCheck::from(is_admin),
        Err(e) if e.is_unreachable() => {
            tracing::warn!(error = %e, "Role lookup unreachable");
            RoleCheck::Pending
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user, "Role lookup failed");
            RoleCheck::Missing
        }
    }
}

/// Store the signed-in user.
///
/// The session id is cycled to prevent fixation.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    set_current_user(session, user).await?;
    set_sentry_user(&user.id, Some(&user.email));
    Ok(())
}

async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Forget the signed-in user.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    clear_sentry_user();
    Ok(())
}

// =============================================================================
// Extractors
// =============================================================================

/// Extractor for pages that require a signed-in visitor.
///
/// # Example
///
/// ```rust,ignore
/// async fn shell(SignedIn(user): SignedIn) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct SignedIn(pub CurrentUser);

/// Extractor for pages that require the admin role.
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<AppState> for SignedIn {
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        guard(Gate::Session, parts, state).await.map(Self)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        guard(Gate::Admin, parts, state).await.map(Self)
    }
}

async fn guard(gate: Gate, parts: &Parts, state: &AppState) -> Result<CurrentUser, GateRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

    let backend = state.backend();
    let check = resolve_session(&session, backend).await.map_err(AppError::from)?;

    let access = gate
        .run(check, |user| {
            let token = user.access_token.clone();
            let id = user.id;
            async move { admin_role(backend, &token, id).await }
        })
        .await;

    match access {
        Access::Allowed(user) => {
            set_sentry_user(&user.id, Some(&user.email));
            Ok(user)
        }
        Access::Pending => Err(GateRejection::Pending {
            retry: retry_target(parts),
        }),
        Access::Denied(Denial::Unauthenticated) => Err(GateRejection::Redirect {
            location: "/auth",
            headers: parts.headers.clone(),
        }),
        Access::Denied(Denial::NotAdmin) => {
            push_notice(
                &session,
                Notice::error(
                    "Access Denied",
                    "You don't have permission to access the admin panel.",
                ),
            )
            .await
            .map_err(AppError::from)?;
            Err(GateRejection::Redirect {
                location: "/",
                headers: parts.headers.clone(),
            })
        }
    }
}

/// Where the loading page should check again.
///
/// A GET is simply repeated. Anything else returns to the page it came
/// from instead of replaying the submission.
fn retry_target(parts: &Parts) -> String {
    // nested routers see a stripped path
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map_or(&parts.uri, |original| &original.0);

    if parts.method == Method::GET {
        return uri
            .path_and_query()
            .map_or_else(|| "/".to_string(), ToString::to_string);
    }
    if uri.path().starts_with("/admin") {
        "/admin".to_string()
    } else {
        "/".to_string()
    }
}

// =============================================================================
// Rejection
// =============================================================================

/// Loading page shown while a gate is pending.
#[derive(Template, WebTemplate)]
#[template(path = "loading.html")]
pub struct LoadingTemplate {
    pub retry: String,
    pub retry_seconds: u32,
}

/// Why a gated request did not reach its handler.
pub enum GateRejection {
    /// A check is still pending; show the loading page.
    Pending { retry: String },
    /// Denied; send the visitor elsewhere.
    Redirect {
        location: &'static str,
        headers: HeaderMap,
    },
    /// The session store failed.
    Error(AppError),
}

impl From<AppError> for GateRejection {
    fn from(err: AppError) -> Self {
        Self::Error(err)
    }
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Pending { retry } => LoadingTemplate {
                retry,
                retry_seconds: RETRY_SECONDS,
            }
            .into_response(),
            Self::Redirect { location, headers } => htmx::redirect(&headers, location),
            Self::Error(err) => err.into_response(),
        }
    }
}
