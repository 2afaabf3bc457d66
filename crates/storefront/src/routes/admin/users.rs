//! User management: search and role assignment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use gemini_glam_core::roster::{RoleWrite, RosterEntry, role_write};
use gemini_glam_core::{AppRole, UserId};

use crate::error::Result;
use crate::htmx;
use crate::middleware::AdminUser;
use crate::models::Notice;
use crate::models::session::{load_roster, push_notice};
use crate::state::AppState;

use super::fetch_roster;

/// An option in a row's role select.
pub struct RoleChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// A user table row.
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: &'static str,
    pub is_admin: bool,
    /// Locale-style short date, e.g. `6/1/2025`.
    pub joined: String,
    pub choices: Vec<RoleChoice>,
}

impl From<&RosterEntry> for UserRow {
    fn from(entry: &RosterEntry) -> Self {
        Self {
            id: entry.profile.id.to_string(),
            email: entry.email_or_na().to_string(),
            full_name: entry.full_name_or_na().to_string(),
            role: entry.role.as_str(),
            is_admin: entry.role == AppRole::Admin,
            joined: entry.profile.created_at.format("%-m/%-d/%Y").to_string(),
            choices: AppRole::ALL
                .iter()
                .map(|&role| RoleChoice {
                    value: role.as_str(),
                    label: role.label(),
                    selected: role == entry.role,
                })
                .collect(),
        }
    }
}

/// User table body, swapped as the search box changes.
#[derive(Template, WebTemplate)]
#[template(path = "admin/user_rows.html")]
pub struct UserRowsTemplate {
    pub rows: Vec<UserRow>,
}

/// Search query.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Filter the fetched roster.
///
/// Runs over the copy fetched by the last panel load; it is only fetched
/// here when no copy exists yet.
#[instrument(skip_all)]
pub async fn rows(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let snapshot = match load_roster(&session).await? {
        Some(snapshot) => snapshot,
        None => fetch_roster(&state, &user, &session).await?,
    };
    let roster = snapshot.roster();

    Ok(UserRowsTemplate {
        rows: roster.search(&query.q).into_iter().map(UserRow::from).collect(),
    }
    .into_response())
}

/// Role form data.
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: AppRole,
}

/// Assign a role, updating the user's record or creating one.
#[instrument(skip_all)]
pub async fn set_role(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    session: Session,
    headers: HeaderMap,
    Path(target): Path<UserId>,
    Form(form): Form<RoleForm>,
) -> Result<Response> {
    let roles = match load_roster(&session).await? {
        Some(snapshot) => snapshot.roles,
        None => fetch_roster(&state, &user, &session).await?.roles,
    };

    let backend = state.backend();
    let written = match role_write(&roles, target) {
        RoleWrite::Update => {
            backend
                .update_user_role(&user.access_token, target, form.role)
                .await
        }
        RoleWrite::Insert => {
            backend
                .insert_user_role(&user.access_token, target, form.role)
                .await
        }
    };

    let notice = match written {
        Ok(()) => {
            tracing::info!(target_user = %target, role = %form.role, "Role updated");
            Notice::success("Success", "User role updated successfully.")
        }
        Err(e) => {
            tracing::error!(error = %e, target_user = %target, "Failed to update role");
            Notice::error("Error", "Failed to update user role.")
        }
    };
    push_notice(&session, notice).await?;

    Ok(htmx::redirect(&headers, "/admin?tab=users"))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use gemini_glam_core::Profile;

    use super::*;

    #[test]
    fn test_row_formats_missing_fields_and_date() {
        let entry = RosterEntry {
            profile: Profile {
                id: UserId::random(),
                email: None,
                full_name: None,
                created_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).single().unwrap_or_default(),
            },
            role: AppRole::Moderator,
        };

        let row = UserRow::from(&entry);
        assert_eq!(row.email, "N/A");
        assert_eq!(row.full_name, "N/A");
        assert_eq!(row.joined, "6/1/2025");
        assert!(!row.is_admin);

        let selected: Vec<_> = row.choices.iter().filter(|c| c.selected).map(|c| c.label).collect();
        assert_eq!(selected, ["Moderator"]);
    }
}
