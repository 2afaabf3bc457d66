//! AI designer handlers.
//!
//! Each generate click is one attempt: no retry, no timeout, no
//! cancellation. The previous result is cleared before calling.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use gemini_glam_core::View;
use gemini_glam_core::design::{DesignArtifact, DesignOutcome, DesignRequest};

use crate::error::{Result, add_breadcrumb};
use crate::htmx;
use crate::middleware::SignedIn;
use crate::models::session::{load_screen, push_notice, save_screen};
use crate::models::{DesignerState, Notice};
use crate::state::AppState;

const GENERIC_FAILURE: &str = "Failed to generate design. Please try again.";

/// Designer screen.
pub struct DesignerView {
    pub prompt: String,
    pub can_generate: bool,
    pub artifact: Option<DesignArtifact>,
}

impl From<&DesignerState> for DesignerView {
    fn from(state: &DesignerState) -> Self {
        Self {
            prompt: state.prompt.clone(),
            can_generate: state.can_generate(),
            artifact: state.artifact.clone(),
        }
    }
}

/// Generate button, swapped on every keystroke.
#[derive(Template, WebTemplate)]
#[template(path = "partials/generate_control.html")]
pub struct GenerateControlTemplate {
    pub can_generate: bool,
}

/// Prompt form data.
#[derive(Debug, Deserialize)]
pub struct PromptForm {
    #[serde(default)]
    pub prompt: String,
}

/// Remember the draft prompt and re-render the generate control.
#[instrument(skip_all)]
pub async fn draft(
    SignedIn(_user): SignedIn,
    session: Session,
    Form(form): Form<PromptForm>,
) -> Result<Response> {
    let mut screen = load_screen(&session).await?;
    screen.designer.prompt = form.prompt;
    save_screen(&session, &screen).await?;

    Ok(GenerateControlTemplate {
        can_generate: screen.designer.can_generate(),
    }
    .into_response())
}

/// Generate a design from the prompt.
#[instrument(skip_all)]
pub async fn generate(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<PromptForm>,
) -> Result<Response> {
    let mut screen = load_screen(&session).await?;
    screen.view = View::Designer;
    screen.designer.artifact = None;

    let Some(request) = DesignRequest::from_prompt(&form.prompt) else {
        screen.designer.prompt = form.prompt;
        save_screen(&session, &screen).await?;
        return Ok(htmx::redirect(&headers, "/"));
    };

    add_breadcrumb("designer", "Generate design", None);

    let notice = match state
        .backend()
        .generate_design(&user.access_token, &request)
        .await
    {
        Ok(response) => match response.into_outcome(&form.prompt) {
            DesignOutcome::Created(artifact) => {
                tracing::info!(user_id = %user.id, "Design generated");
                screen.designer.artifact = Some(artifact);
                Notice::success("Design Created!", "Your luxury jewelry design has been generated.")
            }
            DesignOutcome::Rejected(message) => {
                tracing::warn!(error = %message, "Design service reported an error");
                Notice::error("Generation Failed", &message)
            }
            DesignOutcome::Malformed => {
                tracing::warn!("Design response had no image");
                Notice::error("Error", GENERIC_FAILURE)
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "Design generation failed");
            Notice::error("Error", GENERIC_FAILURE)
        }
    };

    screen.designer.prompt = form.prompt;
    save_screen(&session, &screen).await?;
    push_notice(&session, notice).await?;
    Ok(htmx::redirect(&headers, "/"))
}
