//! Admin panel at `/admin`.
//!
//! Every handler here takes [`AdminUser`], so data is only fetched after
//! both gate stages pass. Mutations push a notice and redirect back to the
//! panel, which refetches everything it shows.

pub mod products;
pub mod users;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::AdminUser;
use crate::models::session::{load_product_form, push_notice, save_roster, take_notices};
use crate::models::{CurrentUser, Notice, RosterSnapshot};
use crate::state::AppState;

use products::{ProductDialog, ProductRow};
use users::UserRow;

/// Panel tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Users,
    Products,
}

impl Tab {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Products => "products",
        }
    }
}

/// Query parameters for the panel.
#[derive(Debug, Default, Deserialize)]
pub struct PanelQuery {
    #[serde(default)]
    pub tab: Tab,
    #[serde(default)]
    pub q: String,
}

/// Admin panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/panel.html")]
pub struct AdminTemplate {
    pub notices: Vec<Notice>,
    pub email: String,
    pub tab: &'static str,
    pub total_users: usize,
    pub admin_users: usize,
    pub active_sessions: usize,
    pub query: String,
    pub rows: Vec<UserRow>,
    pub products: Vec<ProductRow>,
    pub dialog: Option<ProductDialog>,
}

/// Fetch profiles and role records, reporting failure as a notice.
async fn fetch_roster(state: &AppState, user: &CurrentUser, session: &Session) -> Result<RosterSnapshot> {
    let backend = state.backend();
    let fetched = match backend.list_profiles(&user.access_token).await {
        Ok(profiles) => backend
            .list_user_roles(&user.access_token)
            .await
            .map(|roles| RosterSnapshot { profiles, roles }),
        Err(e) => Err(e),
    };

    match fetched {
        Ok(snapshot) => {
            save_roster(session, &snapshot).await?;
            Ok(snapshot)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load admin data");
            push_notice(session, Notice::error("Error", "Failed to load admin data.")).await?;
            Ok(RosterSnapshot::default())
        }
    }
}

/// Render the admin panel.
#[instrument(skip_all)]
pub async fn panel(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    session: Session,
    Query(query): Query<PanelQuery>,
) -> Result<Response> {
    let snapshot = fetch_roster(&state, &user, &session).await?;
    let roster = snapshot.roster();

    let (products, dialog) = match query.tab {
        Tab::Users => (Vec::new(), None),
        Tab::Products => (
            products::fetch_rows(&state, &user, &session).await?,
            load_product_form(&session).await?.map(|form| ProductDialog::from(&form)),
        ),
    };

    let template = AdminTemplate {
        notices: take_notices(&session).await?,
        email: user.email.clone(),
        tab: query.tab.as_str(),
        total_users: roster.total_users(),
        admin_users: roster.admin_users(),
        active_sessions: roster.total_users(),
        rows: roster.search(&query.q).into_iter().map(UserRow::from).collect(),
        query: query.q,
        products,
        dialog,
    };

    Ok(template.into_response())
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(panel))
        .route("/users/rows", get(users::rows))
        .route("/users/{id}/role", post(users::set_role))
        .route("/products", post(products::save))
        .route("/products/new", get(products::open_new))
        .route("/products/{id}/edit", get(products::open_edit))
        .route("/products/dialog/close", post(products::close))
        .route(
            "/products/image",
            post(products::upload_image).layer(DefaultBodyLimit::max(products::MAX_IMAGE_BYTES)),
        )
        .route("/products/{id}/delete", post(products::delete))
}
