//! Gem personality quiz handlers.

use axum::{Form, http::HeaderMap, response::Response};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use gemini_glam_core::quiz::{Gem, QUESTIONS, QuizStage, QuizState, progress_percent};

use crate::error::{AppError, Result};
use crate::htmx;
use crate::middleware::SignedIn;
use crate::models::session::{load_screen, save_screen};

// =============================================================================
// View Models
// =============================================================================

/// A selectable answer.
pub struct OptionView {
    pub index: usize,
    pub text: &'static str,
}

/// The question currently shown.
pub struct QuestionView {
    /// One-based position.
    pub number: usize,
    pub total: usize,
    pub prompt: &'static str,
    pub progress: usize,
    pub options: Vec<OptionView>,
}

/// The result card.
pub struct GemView {
    pub name: &'static str,
    pub description: &'static str,
    pub swatch_class: &'static str,
}

impl From<Gem> for GemView {
    fn from(gem: Gem) -> Self {
        Self {
            name: gem.name(),
            description: gem.description(),
            swatch_class: gem.swatch_class(),
        }
    }
}

/// Quiz screen: either a question or the result.
pub struct QuizView {
    pub question: Option<QuestionView>,
    pub result: Option<GemView>,
}

impl QuizView {
    #[must_use]
    pub fn from_state(state: &QuizState) -> Self {
        match state.stage() {
            QuizStage::Result(gem) => Self {
                question: None,
                result: Some(gem.into()),
            },
            QuizStage::Question(index) => Self {
                question: QUESTIONS.get(index).map(|question| QuestionView {
                    number: index + 1,
                    total: QUESTIONS.len(),
                    prompt: question.prompt,
                    progress: progress_percent(index),
                    options: question
                        .options
                        .iter()
                        .enumerate()
                        .map(|(index, option)| OptionView {
                            index,
                            text: option.text,
                        })
                        .collect(),
                }),
                result: None,
            },
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Answer form data.
#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    pub option: usize,
}

/// Record an answer and advance.
#[instrument(skip_all)]
pub async fn answer(
    SignedIn(_user): SignedIn,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AnswerForm>,
) -> Result<Response> {
    let mut screen = load_screen(&session).await?;
    let stage = screen
        .quiz
        .answer(form.option)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if let QuizStage::Result(gem) = stage {
        tracing::info!(gem = gem.name(), "Quiz completed");
    }

    save_screen(&session, &screen).await?;
    Ok(htmx::redirect(&headers, "/"))
}

/// Start the quiz over.
#[instrument(skip_all)]
pub async fn reset(
    SignedIn(_user): SignedIn,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let mut screen = load_screen(&session).await?;
    screen.quiz.reset();
    save_screen(&session, &screen).await?;
    Ok(htmx::redirect(&headers, "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_shows_first_question() {
        let view = QuizView::from_state(&QuizState::default());
        let question = view.question.expect("question");
        assert_eq!(question.number, 1);
        assert_eq!(question.total, 3);
        assert_eq!(question.options.len(), 4);
        assert!(view.result.is_none());
    }

    #[test]
    fn test_finished_state_shows_result() {
        let mut state = QuizState::default();
        for _ in 0..3 {
            state.answer(0).expect("valid answer");
        }
        let view = QuizView::from_state(&state);
        assert!(view.question.is_none());
        assert_eq!(view.result.map(|gem| gem.name), Some("Emerald"));
    }
}
