//! Sets and cards as stored in the backend tables.
//!
//! Rows use the backend's snake_case column names. Element arrays are stored
//! as JSON columns and deserialize straight into canvas elements.

#[cfg(test)]
#[path = "card_test.rs"]
mod card_test;

use canvas::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use canvas::element::{CanvasElement, ElementId};
use canvas::template::CardDraft;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// SETS
// =============================================================================

/// A deck of flashcards owned by a user, optionally shared with an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub user_id: Uuid,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    #[serde(default)]
    pub is_public: bool,
    /// Every study session of this set shuffles, regardless of session options.
    #[serde(default)]
    pub permanent_shuffle: bool,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
}

impl FlashcardSet {
    #[must_use]
    pub fn new(user_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            user_id,
            organization_id: None,
            is_public: false,
            permanent_shuffle: false,
            created_at: None,
            updated_at: None,
        }
    }
}

// =============================================================================
// CARD TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardType {
    #[default]
    Normal,
    Simple,
    /// Front only; presents information without a question.
    Informational,
    /// Front only; advances instead of flipping.
    SingleSided,
    /// Studied only through its quiz elements.
    QuizOnly,
    /// Content stays hidden until the card's password is entered.
    PasswordProtected,
}

impl CardType {
    /// Whether the card exposes a back side at all.
    #[must_use]
    pub fn has_back(self) -> bool {
        !matches!(self, Self::SingleSided | Self::Informational)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownBehavior {
    /// Show the other side.
    Flip,
    /// Advance to the next card.
    Next,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
}

impl Side {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

// =============================================================================
// CARDS
// =============================================================================

fn default_canvas_width() -> f64 {
    DEFAULT_CANVAS_WIDTH
}

fn default_canvas_height() -> f64 {
    DEFAULT_CANVAS_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub set_id: Uuid,
    #[serde(default)]
    pub front_elements: Vec<CanvasElement>,
    #[serde(default)]
    pub back_elements: Vec<CanvasElement>,
    #[serde(default)]
    pub card_type: CardType,
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f64,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: f64,
    /// Seconds before the front countdown fires. 0 disables it.
    #[serde(default)]
    pub countdown_timer_front: u32,
    #[serde(default)]
    pub countdown_timer_back: u32,
    #[serde(default)]
    pub countdown_behavior_front: Option<CountdownBehavior>,
    #[serde(default)]
    pub countdown_behavior_back: Option<CountdownBehavior>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub next_review_at: Option<OffsetDateTime>,
}

impl Flashcard {
    /// An empty normal card at `position`.
    #[must_use]
    pub fn new(set_id: Uuid, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            set_id,
            front_elements: Vec::new(),
            back_elements: Vec::new(),
            card_type: CardType::Normal,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            countdown_timer_front: 0,
            countdown_timer_back: 0,
            countdown_behavior_front: None,
            countdown_behavior_back: None,
            template_id: None,
            password: None,
            position,
            next_review_at: None,
        }
    }

    /// A card built from a template draft. The back is dropped for front-only types.
    #[must_use]
    pub fn from_draft(set_id: Uuid, position: i32, card_type: CardType, draft: CardDraft) -> Self {
        let mut card = Self::new(set_id, position);
        card.card_type = card_type;
        card.template_id = Some(draft.template_id);
        card.canvas_width = draft.canvas_width;
        card.canvas_height = draft.canvas_height;
        card.front_elements = draft.front_elements;
        if card_type.has_back() {
            card.back_elements = draft.back_elements;
        }
        card
    }

    #[must_use]
    pub fn has_back(&self) -> bool {
        self.card_type.has_back()
    }

    /// Sides the editor may open. Front-only types never expose the back.
    #[must_use]
    pub fn editable_sides(&self) -> &'static [Side] {
        if self.has_back() { &[Side::Front, Side::Back] } else { &[Side::Front] }
    }

    #[must_use]
    pub fn elements(&self, side: Side) -> &[CanvasElement] {
        match side {
            Side::Front => &self.front_elements,
            Side::Back => &self.back_elements,
        }
    }

    /// Replace a side's elements. Returns false when the side is not editable.
    pub fn set_elements(&mut self, side: Side, elements: Vec<CanvasElement>) -> bool {
        match side {
            Side::Front => self.front_elements = elements,
            Side::Back if self.has_back() => self.back_elements = elements,
            Side::Back => return false,
        }
        true
    }

    #[must_use]
    pub fn find_element(&self, side: Side, id: &ElementId) -> Option<&CanvasElement> {
        self.elements(side).iter().find(|e| &e.id == id)
    }

    #[must_use]
    pub fn countdown_seconds(&self, side: Side) -> u32 {
        match side {
            Side::Front => self.countdown_timer_front,
            Side::Back => self.countdown_timer_back,
        }
    }

    /// What the countdown does when it reaches zero on `side`.
    ///
    /// Cards without a back always advance. Otherwise an unset behavior flips
    /// from the front and advances from the back.
    #[must_use]
    pub fn effective_countdown_behavior(&self, side: Side) -> CountdownBehavior {
        if !self.has_back() {
            return CountdownBehavior::Next;
        }
        let stored = match side {
            Side::Front => self.countdown_behavior_front,
            Side::Back => self.countdown_behavior_back,
        };
        stored.unwrap_or(match side {
            Side::Front => CountdownBehavior::Flip,
            Side::Back => CountdownBehavior::Next,
        })
    }

    #[must_use]
    pub fn requires_password(&self) -> bool {
        self.card_type == CardType::PasswordProtected && self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Number of quiz elements across both sides.
    #[must_use]
    pub fn quiz_count(&self) -> usize {
        self.front_elements
            .iter()
            .chain(&self.back_elements)
            .filter(|e| e.kind.correct_answer().is_some())
            .count()
    }
}
