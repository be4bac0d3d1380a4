//! Card service: create from templates, configure, reorder and delete cards.

use canvas::template::{apply_template_to_card, find_template};
use serde_json::json;
use study::card::{CardType, CountdownBehavior, Flashcard};
use tracing::{info, warn};
use uuid::Uuid;

use super::{ServiceError, ValidationError};
use crate::backend::{Filter, Table, decode_row, decode_rows, encode_row};
use crate::prefs::PrefKey;
use crate::state::AppState;

pub const MAX_COUNTDOWN_SECS: u32 = 3600;

/// Per-card study settings. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardSettings {
    pub card_type: Option<CardType>,
    pub countdown_front: Option<u32>,
    pub countdown_back: Option<u32>,
    pub behavior_front: Option<CountdownBehavior>,
    pub behavior_back: Option<CountdownBehavior>,
    pub password: Option<String>,
}

/// Cards of a set in deck order.
///
/// # Errors
///
/// Fails on backend or decoding errors.
pub async fn list_cards(state: &AppState, set_id: Uuid) -> Result<Vec<Flashcard>, ServiceError> {
    let rows = state.backend.select(Table::Flashcards, &Filter::eq("set_id", set_id).order("position")).await?;
    Ok(decode_rows(rows)?)
}

/// # Errors
///
/// Returns [`ServiceError::NotFound`] when the card is missing or not visible.
pub async fn get_card(state: &AppState, id: Uuid) -> Result<Flashcard, ServiceError> {
    let rows = state.backend.select(Table::Flashcards, &Filter::id(id)).await?;
    let row = rows.into_iter().next().ok_or_else(|| ServiceError::NotFound { what: "card", id: id.to_string() })?;
    Ok(decode_row(row)?)
}

/// Append a card built from a template. Without an explicit template the
/// user's preferred one is used; the choice is remembered for next time.
///
/// # Errors
///
/// Returns [`ValidationError::UnknownTemplate`] before any request when the
/// template does not exist.
pub async fn create_card(
    state: &AppState,
    set_id: Uuid,
    template: Option<&str>,
    card_type: CardType,
) -> Result<Flashcard, ServiceError> {
    let key = match template {
        Some(key) => key.to_string(),
        None => state.prefs.lock().await.preferred_template().to_string(),
    };
    let template = find_template(&key).ok_or(ValidationError::UnknownTemplate(key))?;
    let position = next_position(state, set_id).await?;
    let card = Flashcard::from_draft(set_id, position, card_type, apply_template_to_card(&template));
    let card = insert_card(state, &card).await?;
    remember_template(state, &template.id).await;
    Ok(card)
}

/// Persist a card built elsewhere (AI generation, import) at the end of its set.
///
/// # Errors
///
/// Fails on backend errors.
pub async fn append_card(state: &AppState, mut card: Flashcard) -> Result<Flashcard, ServiceError> {
    card.position = next_position(state, card.set_id).await?;
    insert_card(state, &card).await
}

/// Write every field of `card` back to the backend.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] when the card no longer exists.
pub async fn save_card(state: &AppState, card: &Flashcard) -> Result<Flashcard, ServiceError> {
    let rows = state.backend.update(Table::Flashcards, &Filter::id(card.id), encode_row(card)?).await?;
    let row = rows.into_iter().next().ok_or_else(|| ServiceError::NotFound { what: "card", id: card.id.to_string() })?;
    Ok(decode_row(row)?)
}

/// Apply study settings. Switching to a front-only type drops the back side.
///
/// # Errors
///
/// Validation errors are raised before any request.
pub async fn configure_card(state: &AppState, id: Uuid, settings: CardSettings) -> Result<Flashcard, ServiceError> {
    for secs in [settings.countdown_front, settings.countdown_back].into_iter().flatten() {
        if secs > MAX_COUNTDOWN_SECS {
            return Err(ValidationError::Invalid(format!("countdown must be at most {MAX_COUNTDOWN_SECS} seconds")).into());
        }
    }
    let mut card = get_card(state, id).await?;
    if let Some(card_type) = settings.card_type {
        card.card_type = card_type;
    }
    if let Some(secs) = settings.countdown_front {
        card.countdown_timer_front = secs;
    }
    if let Some(secs) = settings.countdown_back {
        card.countdown_timer_back = secs;
    }
    if settings.behavior_front.is_some() {
        card.countdown_behavior_front = settings.behavior_front;
    }
    if settings.behavior_back.is_some() {
        card.countdown_behavior_back = settings.behavior_back;
    }
    if let Some(password) = settings.password {
        card.password = Some(password.trim().to_string()).filter(|p| !p.is_empty());
    }
    if card.card_type == CardType::PasswordProtected && card.password.is_none() {
        return Err(ValidationError::Empty { field: "password" }.into());
    }
    if !card.has_back() {
        card.back_elements.clear();
        card.countdown_timer_back = 0;
        card.countdown_behavior_back = None;
    }
    save_card(state, &card).await
}

/// Rewrite positions so cards follow `order`. Cards missing from `order` keep
/// their relative order after the listed ones.
///
/// # Errors
///
/// Fails on backend errors.
pub async fn reorder_cards(state: &AppState, set_id: Uuid, order: &[Uuid]) -> Result<Vec<Flashcard>, ServiceError> {
    let mut cards = list_cards(state, set_id).await?;
    cards.sort_by_key(|c| order.iter().position(|id| *id == c.id).unwrap_or(order.len()));
    for (position, card) in (0..).zip(cards.iter_mut()) {
        if card.position != position {
            card.position = position;
            state.backend.update(Table::Flashcards, &Filter::id(card.id), json!({ "position": position })).await?;
        }
    }
    Ok(cards)
}

/// # Errors
///
/// Returns [`ServiceError::NotFound`] when nothing was deleted.
pub async fn delete_card(state: &AppState, id: Uuid) -> Result<(), ServiceError> {
    if state.backend.delete(Table::Flashcards, &Filter::id(id)).await? == 0 {
        return Err(ServiceError::NotFound { what: "card", id: id.to_string() });
    }
    info!(card_id = %id, "card deleted");
    Ok(())
}

async fn next_position(state: &AppState, set_id: Uuid) -> Result<i32, ServiceError> {
    let cards = list_cards(state, set_id).await?;
    Ok(cards.iter().map(|c| c.position + 1).max().unwrap_or(0))
}

async fn insert_card(state: &AppState, card: &Flashcard) -> Result<Flashcard, ServiceError> {
    let stored = state.backend.insert(Table::Flashcards, encode_row(card)?).await?;
    let card: Flashcard = decode_row(stored)?;
    info!(card_id = %card.id, set_id = %card.set_id, position = card.position, "card created");
    Ok(card)
}

async fn remember_template(state: &AppState, template_id: &str) {
    let mut prefs = state.prefs.lock().await;
    prefs.set(PrefKey::LastSelectedTemplate, template_id);
    if let Err(e) = prefs.save() {
        warn!(error = %e, "could not remember template choice");
    }
}

#[cfg(test)]
#[path = "cards_test.rs"]
mod tests;
