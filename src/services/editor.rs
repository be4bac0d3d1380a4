//! Editor service: one card side open in the canvas engine.
//!
//! DESIGN
//! ======
//! The engine edits one side at a time. Switching sides writes the engine's
//! elements back into the card and loads the other side with fresh history.
//! Nothing reaches the backend until [`CardEditor::save`].

use std::collections::HashSet;

use canvas::camera::{Size, ViewportHandle};
use canvas::doc::Command;
use canvas::element::{CanvasElement, ElementId, ElementKind, ElementType};
use canvas::engine::{Action, EditorSettings, Engine};
use canvas::geometry::fit_element_to_canvas;
use canvas::template::{find_template, fresh_element_id};
use study::card::{Flashcard, Side};
use tracing::{debug, info};
use uuid::Uuid;

use super::{ServiceError, ValidationError, cards};
use crate::state::AppState;

pub struct CardEditor {
    card: Flashcard,
    side: Side,
    engine: Engine,
    /// Card as last loaded or saved.
    saved: Flashcard,
}

impl CardEditor {
    /// Load a card and open `side` for editing.
    ///
    /// # Errors
    ///
    /// Fails when the card is missing or the side is not editable.
    pub async fn open(
        state: &AppState,
        card_id: Uuid,
        side: Side,
        viewport: Box<dyn ViewportHandle>,
        settings: EditorSettings,
    ) -> Result<Self, ServiceError> {
        let card = cards::get_card(state, card_id).await?;
        Self::from_card(card, side, viewport, settings)
    }

    /// # Errors
    ///
    /// Returns a validation error when `side` is not editable on this card.
    pub fn from_card(
        card: Flashcard,
        side: Side,
        viewport: Box<dyn ViewportHandle>,
        settings: EditorSettings,
    ) -> Result<Self, ServiceError> {
        let canvas = Size::new(card.canvas_width, card.canvas_height);
        let saved = card.clone();
        let mut editor = Self { card, side, engine: Engine::new(viewport, canvas, settings), saved };
        editor.load(side)?;
        Ok(editor)
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Direct engine access for pointer and wheel input.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Unsaved edits on either side.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.card() != self.saved
    }

    /// The card with the open side's current elements.
    #[must_use]
    pub fn card(&self) -> Flashcard {
        let mut card = self.card.clone();
        card.set_elements(self.side, self.engine.elements().to_vec());
        card
    }

    /// # Errors
    ///
    /// Propagates the engine's rejection (unknown id, type not allowed, ...).
    pub fn dispatch(&mut self, command: Command) -> Result<Vec<Action>, ServiceError> {
        Ok(self.engine.dispatch(command)?)
    }

    /// Insert an empty element of `element_type` at (`x`, `y`), fitted to the canvas.
    ///
    /// # Errors
    ///
    /// Fails when the card's template does not allow the type.
    pub fn add_element(&mut self, element_type: ElementType, x: f64, y: f64) -> Result<ElementId, ServiceError> {
        self.insert(ElementKind::empty(element_type), x, y)
    }

    /// Insert `kind` at (`x`, `y`), fitted to the canvas.
    ///
    /// # Errors
    ///
    /// Fails when the card's template does not allow the element's type.
    pub fn insert(&mut self, kind: ElementKind, x: f64, y: f64) -> Result<ElementId, ServiceError> {
        let id = fresh_element_id(kind.element_type().as_str());
        let element = CanvasElement::new(id.clone(), kind, x, y);
        let element = fit_element_to_canvas(&element, self.card.canvas_width, self.card.canvas_height);
        self.dispatch(Command::Add(element))?;
        Ok(id)
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.engine.undo()
    }

    pub fn redo(&mut self) -> Vec<Action> {
        self.engine.redo()
    }

    /// Keep the open side's edits and open `side` instead.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `side` is not editable on this card.
    pub fn switch_side(&mut self, side: Side) -> Result<(), ServiceError> {
        if side == self.side {
            return Ok(());
        }
        let current = self.engine.elements().to_vec();
        self.card.set_elements(self.side, current);
        self.load(side)
    }

    /// Write the card back to the backend.
    ///
    /// # Errors
    ///
    /// Fails on backend errors; edits stay in the editor.
    pub async fn save(&mut self, state: &AppState) -> Result<Flashcard, ServiceError> {
        let saved = cards::save_card(state, &self.card()).await?;
        self.card = saved.clone();
        self.saved = saved.clone();
        info!(card_id = %saved.id, "card saved");
        Ok(saved)
    }

    fn load(&mut self, side: Side) -> Result<(), ServiceError> {
        if !self.card.editable_sides().contains(&side) {
            return Err(ValidationError::Invalid(format!("{:?} cards have no back side", self.card.card_type)).into());
        }
        self.side = side;
        self.engine.load_side(self.card.elements(side).to_vec(), allowed_types(&self.card));
        debug!(card_id = %self.card.id, ?side, "side opened");
        Ok(())
    }
}

/// Toolbar restriction from the card's template, if it restricts anything.
fn allowed_types(card: &Flashcard) -> Option<HashSet<ElementType>> {
    let template = find_template(card.template_id.as_deref()?)?;
    if !template.restrict_toolbar || template.allowed_element_types.is_empty() {
        return None;
    }
    Some(template.allowed_element_types.into_iter().collect())
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;
