//! Study service: build sessions from stored sets and record review grades.
//!
//! DESIGN
//! ======
//! Sessions run entirely locally once built. The backend is touched to load
//! the deck, to look up decks linked by embed elements, and to store the
//! next review time after a graded review.

use std::collections::HashMap;

use canvas::element::{CanvasElement, ElementKind};
use canvas::render::EmbeddedDeck;
use study::card::Flashcard;
use study::review::{ReviewGrade, due_cards, next_review_at};
use study::session::{SessionOptions, StudySession};
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ServiceError, cards, sets};
use crate::state::AppState;

/// Load a set and start a session over all its cards.
///
/// # Errors
///
/// Fails when the set is missing or has no cards.
pub async fn start_session(
    state: &AppState,
    set_id: Uuid,
    options: SessionOptions,
) -> Result<StudySession, ServiceError> {
    let set = sets::get_set(state, set_id).await?;
    let cards = cards::list_cards(state, set_id).await?;
    let options = options.for_set(&set);
    info!(%set_id, title = %set.title, cards = cards.len(), "study started");
    Ok(StudySession::new(cards, options)?)
}

/// Start a session over the cards due at `now`, most overdue first.
///
/// # Errors
///
/// Returns [`study::StudyError::NoCards`] when nothing is due.
pub async fn start_review(
    state: &AppState,
    set_id: Uuid,
    options: SessionOptions,
    now: OffsetDateTime,
) -> Result<StudySession, ServiceError> {
    let set = sets::get_set(state, set_id).await?;
    let all = cards::list_cards(state, set_id).await?;
    let due = due_cards(&all, now);
    info!(%set_id, title = %set.title, due = due.len(), total = all.len(), "review started");
    Ok(StudySession::from_queue(due, options)?)
}

/// Store when a reviewed card comes due again.
///
/// # Errors
///
/// Fails when the card is missing.
pub async fn grade_card(
    state: &AppState,
    card_id: Uuid,
    grade: ReviewGrade,
    now: OffsetDateTime,
) -> Result<Flashcard, ServiceError> {
    let mut card = cards::get_card(state, card_id).await?;
    card.next_review_at = Some(next_review_at(now, grade));
    let card = cards::save_card(state, &card).await?;
    debug!(%card_id, ?grade, "card graded");
    Ok(card)
}

/// Look up the decks linked by embed elements. Links that fail to resolve
/// are left out and render as "not found".
pub async fn resolve_embeds(state: &AppState, elements: &[CanvasElement]) -> HashMap<String, EmbeddedDeck> {
    let mut embeds = HashMap::new();
    for element in elements {
        let ElementKind::DeckEmbed { deck_id } = &element.kind else {
            continue;
        };
        if embeds.contains_key(deck_id) {
            continue;
        }
        let Ok(id) = deck_id.parse::<Uuid>() else {
            debug!(%deck_id, "embed is not a deck id");
            continue;
        };
        match embedded_deck(state, id).await {
            Ok(deck) => {
                embeds.insert(deck_id.clone(), deck);
            }
            Err(e) => warn!(%deck_id, error = %e, "embedded deck unavailable"),
        }
    }
    embeds
}

async fn embedded_deck(state: &AppState, id: Uuid) -> Result<EmbeddedDeck, ServiceError> {
    let set = sets::get_set(state, id).await?;
    let card_count = cards::list_cards(state, id).await?.len();
    Ok(EmbeddedDeck { title: set.title, card_count })
}

#[cfg(test)]
#[path = "study_test.rs"]
mod tests;
