//! Session-related types.
//!
//! The shell's per-visitor UI state (current view, quiz progress, designer
//! draft, pending notices, product dialog) lives in the session instead of
//! the browser, so every screen renders server-side.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use gemini_glam_core::design::DesignArtifact;
use gemini_glam_core::product_form::ProductForm;
use gemini_glam_core::quiz::QuizState;
use gemini_glam_core::roster::Roster;
use gemini_glam_core::{Profile, UserId, UserRole, View};

use crate::supabase::AuthSession;

/// Refresh this long before the provider would reject the token.
const REFRESH_MARGIN_SECONDS: i64 = 60;

/// Session-stored identity with the provider tokens needed to act as the
/// user.
///
/// `Debug` redacts both tokens.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CurrentUser {
    /// Identity from a freshly issued session.
    #[must_use]
    pub fn from_auth(session: &AuthSession, now: DateTime<Utc>) -> Self {
        Self {
            id: session.user.id,
            email: session.user.email.clone().unwrap_or_default(),
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            expires_at: session.expires_at(now),
        }
    }

    /// Whether the access token should be refreshed before use.
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(REFRESH_MARGIN_SECONDS) <= now
    }
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Designer screen state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignerState {
    /// Textarea contents, as typed.
    pub prompt: String,
    /// Last successful design.
    pub artifact: Option<DesignArtifact>,
}

impl DesignerState {
    /// Whether the generate control is enabled.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        !self.prompt.trim().is_empty()
    }
}

/// Everything the shell remembers between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenState {
    pub view: View,
    pub quiz: QuizState,
    pub designer: DesignerState,
}

impl ScreenState {
    /// Switch views. The target screen starts fresh.
    pub fn navigate(&mut self, view: View) {
        *self = Self {
            view,
            ..Self::default()
        };
    }
}

/// Notice styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Destructive,
}

impl NoticeLevel {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notice notice-success",
            Self::Destructive => "notice notice-destructive",
        }
    }
}

/// A toast-style notification shown once on the next render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notice {
    #[must_use]
    pub fn success(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            level: NoticeLevel::Success,
        }
    }

    #[must_use]
    pub fn error(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            level: NoticeLevel::Destructive,
        }
    }
}

/// Profiles and role records as last fetched by the admin panel.
///
/// User search and role writes run against this copy; the panel refetches
/// it on every full load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub profiles: Vec<Profile>,
    pub roles: Vec<UserRole>,
}

impl RosterSnapshot {
    /// Join into a searchable roster.
    #[must_use]
    pub fn roster(&self) -> Roster {
        Roster::new(self.profiles.clone(), self.roles.clone())
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the shell's screen state.
    pub const SCREEN: &str = "screen";

    /// Key for queued notices.
    pub const NOTICES: &str = "notices";

    /// Key for the open product dialog, absent when closed.
    pub const PRODUCT_FORM: &str = "product_form";

    /// Key for the admin panel's last fetched roster.
    pub const ROSTER: &str = "roster";
}

// =============================================================================
// Session Helpers
// =============================================================================

type SessionResult<T> = Result<T, tower_sessions::session::Error>;

/// Load the screen state, defaulting to the landing view.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_screen(session: &Session) -> SessionResult<ScreenState> {
    Ok(session
        .get::<ScreenState>(keys::SCREEN)
        .await?
        .unwrap_or_default())
}

/// Persist the screen state.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_screen(session: &Session, screen: &ScreenState) -> SessionResult<()> {
    session.insert(keys::SCREEN, screen).await
}

/// Queue a notice for the next render.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn push_notice(session: &Session, notice: Notice) -> SessionResult<()> {
    let mut notices = session
        .get::<Vec<Notice>>(keys::NOTICES)
        .await?
        .unwrap_or_default();
    notices.push(notice);
    session.insert(keys::NOTICES, notices).await
}

/// Remove and return queued notices.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn take_notices(session: &Session) -> SessionResult<Vec<Notice>> {
    Ok(session
        .remove::<Vec<Notice>>(keys::NOTICES)
        .await?
        .unwrap_or_default())
}

/// The open product dialog, if any.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_product_form(session: &Session) -> SessionResult<Option<ProductForm>> {
    session.get::<ProductForm>(keys::PRODUCT_FORM).await
}

/// Open (or update) the product dialog.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_product_form(session: &Session, form: &ProductForm) -> SessionResult<()> {
    session.insert(keys::PRODUCT_FORM, form).await
}

/// Close the product dialog and drop its values.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn close_product_form(session: &Session) -> SessionResult<()> {
    session.remove::<ProductForm>(keys::PRODUCT_FORM).await?;
    Ok(())
}

/// The roster fetched by the last admin panel load.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_roster(session: &Session) -> SessionResult<Option<RosterSnapshot>> {
    session.get::<RosterSnapshot>(keys::ROSTER).await
}

/// Remember the fetched roster.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_roster(session: &Session, snapshot: &RosterSnapshot) -> SessionResult<()> {
    session.insert(keys::ROSTER, snapshot).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use gemini_glam_core::quiz::QuizStage;
    use tower_sessions::MemoryStore;

    use super::*;

    fn user(expires_at: DateTime<Utc>) -> CurrentUser {
        CurrentUser {
            id: UserId::random(),
            email: "ada@glam.test".to_string(),
            access_token: "secret-access".to_string(),
            refresh_token: "secret-refresh".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_needs_refresh_inside_margin() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert!(!user(now + Duration::minutes(10)).needs_refresh(now));
        assert!(user(now + Duration::seconds(30)).needs_refresh(now));
        assert!(user(now - Duration::minutes(1)).needs_refresh(now));
    }

    #[test]
    fn test_current_user_debug_redacts_tokens() {
        let debug = format!("{:?}", user(Utc::now()));
        assert!(debug.contains("ada@glam.test"));
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
    }

    #[test]
    fn test_navigate_discards_screen_state() {
        let mut screen = ScreenState::default();
        screen.navigate(View::Quiz);
        screen.quiz.answer(0).expect("valid answer");
        screen.designer.prompt = "ring".to_string();

        screen.navigate(View::Designer);
        screen.navigate(View::Quiz);

        assert_eq!(screen.view, View::Quiz);
        assert_eq!(screen.quiz.stage(), QuizStage::Question(0));
        assert!(screen.designer.prompt.is_empty());
    }

    #[test]
    fn test_can_generate_requires_non_blank_prompt() {
        let mut designer = DesignerState::default();
        assert!(!designer.can_generate());
        designer.prompt = " \n ".to_string();
        assert!(!designer.can_generate());
        designer.prompt = "emerald halo".to_string();
        assert!(designer.can_generate());
    }

    #[tokio::test]
    async fn test_notices_are_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        push_notice(&session, Notice::success("Success", "Saved.")).await.unwrap();
        push_notice(&session, Notice::error("Error", "Nope.")).await.unwrap();

        let notices = take_notices(&session).await.unwrap();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[1].level, NoticeLevel::Destructive);
        assert!(take_notices(&session).await.unwrap().is_empty());
    }
}
