//! The multi-view shell at `/`.
//!
//! The mounted view lives in the session, never in the URL. Navigating
//! swaps the view and drops whatever the previous screens held.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use gemini_glam_core::{AppRole, View};

use crate::error::{AppError, Result};
use crate::filters;
use crate::htmx;
use crate::middleware::SignedIn;
use crate::models::session::{load_screen, save_screen, take_notices};
use crate::models::{CurrentUser, Notice};
use crate::routes::designer::DesignerView;
use crate::routes::quiz::QuizView;
use crate::routes::showroom::{COLLECTION, ShowroomPiece};
use crate::state::AppState;

// =============================================================================
// Navigation
// =============================================================================

/// A navigation bar entry.
pub struct NavItem {
    pub view: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Navigation bar contents.
pub struct NavView {
    pub items: Vec<NavItem>,
    pub email: String,
    pub is_admin: bool,
}

impl NavView {
    #[must_use]
    pub fn new(current: View, email: &str, is_admin: bool) -> Self {
        Self {
            items: View::NAV
                .iter()
                .map(|&view| NavItem {
                    view: view.as_str(),
                    label: view.nav_label(),
                    active: view == current,
                })
                .collect(),
            email: email.to_string(),
            is_admin,
        }
    }
}

/// Whether to show the admin entry. Lookup failures hide it.
pub async fn nav_is_admin(state: &AppState, user: &CurrentUser) -> bool {
    match state
        .backend()
        .has_role(&user.access_token, user.id, AppRole::Admin)
        .await
    {
        Ok(is_admin) => is_admin,
        Err(e) => {
            tracing::warn!(error = %e, "Admin status lookup failed");
            false
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Shell page template.
#[derive(Template, WebTemplate)]
#[template(path = "shell.html")]
pub struct ShellTemplate {
    pub nav: NavView,
    pub notices: Vec<Notice>,
    pub view: &'static str,
    pub quiz: Option<QuizView>,
    pub designer: Option<DesignerView>,
    pub showroom: &'static [ShowroomPiece],
}

// =============================================================================
// Handlers
// =============================================================================

/// Render the shell with the current view.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    session: Session,
) -> Result<Response> {
    let screen = load_screen(&session).await?;
    let is_admin = nav_is_admin(&state, &user).await;
    let notices = take_notices(&session).await?;

    let template = ShellTemplate {
        nav: NavView::new(screen.view, &user.email, is_admin),
        notices,
        view: screen.view.as_str(),
        quiz: (screen.view == View::Quiz).then(|| QuizView::from_state(&screen.quiz)),
        designer: (screen.view == View::Designer).then(|| DesignerView::from(&screen.designer)),
        showroom: if screen.view == View::Showroom {
            COLLECTION.as_slice()
        } else {
            &[]
        },
    };

    Ok(template.into_response())
}

/// Navigation form data.
#[derive(Debug, Deserialize)]
pub struct NavigateForm {
    pub view: String,
}

/// Switch the mounted view.
#[instrument(skip_all)]
pub async fn navigate(
    SignedIn(_user): SignedIn,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<NavigateForm>,
) -> Result<Response> {
    let view = form
        .view
        .parse::<View>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut screen = load_screen(&session).await?;
    screen.navigate(view);
    save_screen(&session, &screen).await?;

    tracing::debug!(view = %view, "Navigated");
    Ok(htmx::redirect(&headers, "/"))
}

/// Drop any queued notices.
///
/// The dismiss button removes its toast client-side; a plain form post
/// falls back to reloading the shell.
#[instrument(skip_all)]
pub async fn dismiss_notices(session: Session, headers: HeaderMap) -> Result<Response> {
    take_notices(&session).await?;
    if htmx::is_fragment_request(&headers) {
        return Ok(StatusCode::OK.into_response());
    }
    Ok(htmx::redirect(&headers, "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_marks_only_current_view_active() {
        let nav = NavView::new(View::Designer, "ada@glam.test", false);
        let active: Vec<_> = nav.items.iter().filter(|i| i.active).map(|i| i.label).collect();
        assert_eq!(active, ["AI Designer"]);
    }

    #[test]
    fn test_nav_on_landing_has_no_active_item() {
        let nav = NavView::new(View::Landing, "ada@glam.test", true);
        assert!(nav.items.iter().all(|i| !i.active));
        assert_eq!(nav.items.len(), 3);
    }
}
