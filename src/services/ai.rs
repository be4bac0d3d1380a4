//! AI service: generate a card from a prompt, translate text.
//!
//! Generation and translation run in serverless functions; this module only
//! shapes requests and turns replies into cards.

use canvas::element::{CanvasElement, ElementKind};
use canvas::geometry::fit_element_to_canvas;
use canvas::template::fresh_element_id;
use serde::{Deserialize, Serialize};
use serde_json::json;
use study::card::{CardType, Flashcard};
use tracing::info;
use uuid::Uuid;

use super::{ServiceError, ValidationError, cards, required_text};
use crate::backend::{BackendError, decode_row};
use crate::state::AppState;

const GENERATE_FN: &str = "generate-single-card";
const TRANSLATE_FN: &str = "translate-text";
pub const MAX_PROMPT_LEN: usize = 1000;
pub const MAX_TRANSLATE_LEN: usize = 5000;

const MARGIN: f64 = 50.0;

/// Quiz element to put on the front of a generated card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractiveType {
    #[default]
    None,
    MultipleChoice,
    TrueFalse,
}

/// Reply of the generation function.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCard {
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

/// Ask the generation function for a card and append it to the set.
///
/// # Errors
///
/// The prompt is validated before any request. A reply that cannot form the
/// requested card is a validation error.
pub async fn generate_card(
    state: &AppState,
    set_id: Uuid,
    prompt: &str,
    card_type: CardType,
    interactive: InteractiveType,
) -> Result<Flashcard, ServiceError> {
    let prompt = required_text("prompt", prompt, MAX_PROMPT_LEN)?;
    let body = json!({ "prompt": prompt, "cardType": card_type, "interactiveType": interactive });
    let reply = state.backend.invoke(GENERATE_FN, body).await?;
    let generated: GeneratedCard = decode_row(reply)?;
    let card = build_card(set_id, card_type, interactive, generated)?;
    let card = cards::append_card(state, card).await?;
    info!(card_id = %card.id, %set_id, ?interactive, "card generated");
    Ok(card)
}

/// Translate `text` into `target_language` (a language name or code).
///
/// # Errors
///
/// Empty text or language is rejected before any request.
pub async fn translate(state: &AppState, text: &str, target_language: &str) -> Result<String, ServiceError> {
    let text = required_text("text", text, MAX_TRANSLATE_LEN)?;
    let target_language = required_text("target language", target_language, 50)?;
    let reply = state
        .backend
        .invoke(TRANSLATE_FN, json!({ "text": text, "targetLanguage": target_language }))
        .await?;
    let translation: Translation = decode_row(reply)?;
    if translation.translated_text.trim().is_empty() {
        return Err(BackendError::Parse("empty translation".into()).into());
    }
    Ok(translation.translated_text)
}

/// Lay out a generated card: the question (or quiz) on the front, the answer
/// on the back when the card type has one.
///
/// # Errors
///
/// Returns a validation error when the reply lacks what the quiz type needs.
pub fn build_card(
    set_id: Uuid,
    card_type: CardType,
    interactive: InteractiveType,
    generated: GeneratedCard,
) -> Result<Flashcard, ValidationError> {
    let question = generated.question.trim().to_string();
    if question.is_empty() {
        return Err(ValidationError::Invalid("generated card has no question".into()));
    }
    let front = match interactive {
        InteractiveType::None => ElementKind::Text { content: question },
        InteractiveType::MultipleChoice => {
            let options: Vec<String> =
                generated.options.into_iter().map(|o| o.trim().to_string()).filter(|o| !o.is_empty()).collect();
            if options.len() < 2 {
                return Err(ValidationError::Invalid("generated quiz needs at least two options".into()));
            }
            let correct = generated
                .correct_answer
                .or_else(|| options.iter().position(|o| o.eq_ignore_ascii_case(generated.answer.trim())))
                .filter(|i| *i < options.len())
                .ok_or_else(|| ValidationError::Invalid("generated quiz has no valid correct answer".into()))?;
            ElementKind::MultipleChoice { question, multiple_choice_options: options, correct_answer: correct }
        }
        InteractiveType::TrueFalse => {
            let correct = match generated.correct_answer {
                Some(i @ (0 | 1)) => i,
                Some(_) => return Err(ValidationError::Invalid("true/false answer must be 0 or 1".into())),
                None if generated.answer.trim().eq_ignore_ascii_case("true") => 0,
                None if generated.answer.trim().eq_ignore_ascii_case("false") => 1,
                None => return Err(ValidationError::Invalid("generated quiz has no valid correct answer".into())),
            };
            ElementKind::TrueFalse { question, correct_answer: correct }
        }
    };

    let mut card = Flashcard::new(set_id, 0);
    card.card_type = card_type;
    let (width, height) = (card.canvas_width, card.canvas_height);
    card.front_elements.push(place(front, width, height));
    let answer = generated.answer.trim();
    if card.has_back() && !answer.is_empty() {
        card.back_elements.push(place(ElementKind::Text { content: answer.to_string() }, width, height));
    }
    Ok(card)
}

fn place(kind: ElementKind, canvas_width: f64, canvas_height: f64) -> CanvasElement {
    let el = CanvasElement::new(fresh_element_id(kind.element_type().as_str()), kind, MARGIN, MARGIN);
    fit_element_to_canvas(&el, canvas_width, canvas_height)
}

#[cfg(test)]
#[path = "ai_test.rs"]
mod tests;
