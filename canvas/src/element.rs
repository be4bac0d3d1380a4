//! Element model: typed canvas elements placed on one side of a card.
//!
//! Every element carries the same geometry (`x`, `y`, `width`, `height`,
//! `rotation`, `z_index`) plus a type-specific payload held in the
//! [`ElementKind`] sum type. The wire format matches the hosted backend's JSON
//! columns: camelCase fields with a kebab-case `type` discriminator.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;

/// Identifier for an element, unique within one card side.
pub type ElementId = String;

/// Discriminant of [`ElementKind`], used for toolbar restrictions and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementType {
    Text,
    Image,
    Audio,
    Drawing,
    MultipleChoice,
    TrueFalse,
    FillInBlank,
    Youtube,
    DeckEmbed,
    Tts,
}

impl ElementType {
    /// Every element type, in toolbar order.
    pub const ALL: [Self; 10] = [
        Self::Text,
        Self::Image,
        Self::Audio,
        Self::Drawing,
        Self::MultipleChoice,
        Self::TrueFalse,
        Self::FillInBlank,
        Self::Youtube,
        Self::DeckEmbed,
        Self::Tts,
    ];

    /// Wire name, as used in the `type` tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Drawing => "drawing",
            Self::MultipleChoice => "multiple-choice",
            Self::TrueFalse => "true-false",
            Self::FillInBlank => "fill-in-blank",
            Self::Youtube => "youtube",
            Self::DeckEmbed => "deck-embed",
            Self::Tts => "tts",
        }
    }

    /// Width and height given to a freshly inserted element of this type.
    #[must_use]
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Self::Text | Self::Tts | Self::FillInBlank => (200.0, 60.0),
            Self::Image | Self::Drawing => (200.0, 150.0),
            Self::Audio => (200.0, 50.0),
            Self::MultipleChoice => (300.0, 200.0),
            Self::TrueFalse => (250.0, 120.0),
            Self::Youtube => (320.0, 180.0),
            Self::DeckEmbed => (240.0, 160.0),
        }
    }

    /// Whether elements of this type take part in quiz scoring.
    #[must_use]
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::MultipleChoice | Self::TrueFalse | Self::FillInBlank)
    }
}

impl std::str::FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or_else(|| format!("unknown element type: {s}"))
    }
}

/// One freehand stroke of a drawing element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    /// Points in element-local coordinates.
    pub points: Vec<[f64; 2]>,
    pub color: String,
    pub width: f64,
}

/// Type-specific payload of a canvas element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ElementKind {
    Text {
        content: String,
    },
    Image {
        image_url: String,
        #[serde(default)]
        alt: String,
    },
    Audio {
        audio_url: String,
    },
    Drawing {
        #[serde(default)]
        strokes: Vec<Stroke>,
    },
    MultipleChoice {
        #[serde(default)]
        question: String,
        multiple_choice_options: Vec<String>,
        correct_answer: usize,
    },
    /// `correct_answer` is an option index: 0 = true, 1 = false.
    TrueFalse {
        #[serde(default)]
        question: String,
        correct_answer: usize,
    },
    /// Blanks are written inline as `[[answer]]`.
    FillInBlank {
        content: String,
    },
    Youtube {
        youtube_id: String,
    },
    DeckEmbed {
        deck_id: String,
    },
    Tts {
        content: String,
        #[serde(default)]
        language: Option<String>,
    },
}

impl ElementKind {
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Text { .. } => ElementType::Text,
            Self::Image { .. } => ElementType::Image,
            Self::Audio { .. } => ElementType::Audio,
            Self::Drawing { .. } => ElementType::Drawing,
            Self::MultipleChoice { .. } => ElementType::MultipleChoice,
            Self::TrueFalse { .. } => ElementType::TrueFalse,
            Self::FillInBlank { .. } => ElementType::FillInBlank,
            Self::Youtube { .. } => ElementType::Youtube,
            Self::DeckEmbed { .. } => ElementType::DeckEmbed,
            Self::Tts { .. } => ElementType::Tts,
        }
    }

    /// An empty payload of the given type, as inserted from the toolbar.
    #[must_use]
    pub fn empty(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Text => Self::Text { content: String::new() },
            ElementType::Image => Self::Image { image_url: String::new(), alt: String::new() },
            ElementType::Audio => Self::Audio { audio_url: String::new() },
            ElementType::Drawing => Self::Drawing { strokes: Vec::new() },
            ElementType::MultipleChoice => Self::MultipleChoice {
                question: String::new(),
                multiple_choice_options: vec!["Option 1".into(), "Option 2".into()],
                correct_answer: 0,
            },
            ElementType::TrueFalse => Self::TrueFalse { question: String::new(), correct_answer: 0 },
            ElementType::FillInBlank => Self::FillInBlank { content: String::new() },
            ElementType::Youtube => Self::Youtube { youtube_id: String::new() },
            ElementType::DeckEmbed => Self::DeckEmbed { deck_id: String::new() },
            ElementType::Tts => Self::Tts { content: String::new(), language: None },
        }
    }

    /// The correct option index for quiz payloads, `None` for everything else.
    #[must_use]
    pub fn correct_answer(&self) -> Option<usize> {
        match self {
            Self::MultipleChoice { correct_answer, .. } | Self::TrueFalse { correct_answer, .. } => {
                Some(*correct_answer)
            }
            _ => None,
        }
    }

    /// Number of selectable options for quiz payloads.
    #[must_use]
    pub fn option_count(&self) -> Option<usize> {
        match self {
            Self::MultipleChoice { multiple_choice_options, .. } => Some(multiple_choice_options.len()),
            Self::TrueFalse { .. } => Some(2),
            _ => None,
        }
    }
}

/// A positioned, typed content block on one card side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasElement {
    pub id: ElementId,
    /// Left edge in card coordinates.
    pub x: f64,
    /// Top edge in card coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the element center.
    #[serde(default)]
    pub rotation: f64,
    /// Stacking order; lower values are drawn beneath higher values.
    #[serde(default)]
    pub z_index: i64,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl CanvasElement {
    /// Create an element of the payload's default size at `(x, y)`.
    #[must_use]
    pub fn new(id: impl Into<ElementId>, kind: ElementKind, x: f64, y: f64) -> Self {
        let (width, height) = kind.element_type().default_size();
        Self { id: id.into(), x, y, width, height, rotation: 0.0, z_index: 0, kind }
    }

    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Whether a card-space point lies inside the element, honoring rotation.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let c = self.center();
        let (sin, cos) = (-self.rotation).to_radians().sin_cos();
        let dx = p.x - c.x;
        let dy = p.y - c.y;
        let local_x = dx * cos - dy * sin;
        let local_y = dx * sin + dy * cos;
        local_x.abs() <= self.width * 0.5 && local_y.abs() <= self.height * 0.5
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// Replacement payload; must keep the element's type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ElementKind>,
}
