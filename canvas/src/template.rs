//! Card templates: immutable bundles of starter elements copied into new cards.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::element::{CanvasElement, ElementId, ElementKind, ElementType};
use crate::geometry::fit_element_to_canvas;

const ID_SUFFIX_LEN: usize = 9;
const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A named starter bundle of front/back elements plus toolbar restrictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTemplate {
    pub id: String,
    pub name: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    #[serde(default)]
    pub front_elements: Vec<CanvasElement>,
    #[serde(default)]
    pub back_elements: Vec<CanvasElement>,
    /// Element types the toolbar offers. Empty means every type.
    #[serde(default)]
    pub allowed_element_types: Vec<ElementType>,
    /// Hide toolbar entries outside `allowed_element_types` instead of merely warning.
    #[serde(default)]
    pub restrict_toolbar: bool,
}

impl CardTemplate {
    /// Whether new elements of `element_type` may be added to cards using this template.
    #[must_use]
    pub fn allows(&self, element_type: ElementType) -> bool {
        !self.restrict_toolbar
            || self.allowed_element_types.is_empty()
            || self.allowed_element_types.contains(&element_type)
    }
}

/// The card fields produced by applying a template. Persisted by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CardDraft {
    pub template_id: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub front_elements: Vec<CanvasElement>,
    pub back_elements: Vec<CanvasElement>,
}

/// Materialize a new card from `template`.
///
/// Every element is deep-cloned under a fresh id and fit to the template's
/// canvas. Ids are `{original}-{millis}-{random}`: collisions are unlikely,
/// not impossible.
#[must_use]
pub fn apply_template_to_card(template: &CardTemplate) -> CardDraft {
    let clone_side = |elements: &[CanvasElement]| -> Vec<CanvasElement> {
        elements
            .iter()
            .map(|el| {
                let mut fitted = fit_element_to_canvas(el, template.canvas_width, template.canvas_height);
                fitted.id = fresh_element_id(&el.id);
                fitted
            })
            .collect()
    };

    CardDraft {
        template_id: template.id.clone(),
        canvas_width: template.canvas_width,
        canvas_height: template.canvas_height,
        front_elements: clone_side(&template.front_elements),
        back_elements: clone_side(&template.back_elements),
    }
}

/// Derive a new element id from `base`.
#[must_use]
pub fn fresh_element_id(base: &str) -> ElementId {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_SUFFIX_ALPHABET[rng.random_range(0..ID_SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{base}-{millis}-{suffix}")
}

fn text(id: &str, content: &str, x: f64, y: f64) -> CanvasElement {
    let mut el = CanvasElement::new(id, ElementKind::Text { content: content.into() }, x, y);
    el.width = 500.0;
    el.height = 80.0;
    el
}

/// The stock templates shipped with the editor.
#[must_use]
pub fn builtin_templates() -> Vec<CardTemplate> {
    let base = |id: &str, name: &str| CardTemplate {
        id: id.into(),
        name: name.into(),
        canvas_width: DEFAULT_CANVAS_WIDTH,
        canvas_height: DEFAULT_CANVAS_HEIGHT,
        front_elements: Vec::new(),
        back_elements: Vec::new(),
        allowed_element_types: Vec::new(),
        restrict_toolbar: false,
    };

    let blank = base("blank", "Blank");

    let mut basic = base("basic", "Basic");
    basic.front_elements = vec![text("question", "Question", 50.0, 160.0)];
    basic.back_elements = vec![text("answer", "Answer", 50.0, 160.0)];

    let mut image_question = base("image-question", "Image question");
    image_question.front_elements = vec![
        {
            let mut img = CanvasElement::new(
                "image",
                ElementKind::Image { image_url: String::new(), alt: String::new() },
                150.0,
                40.0,
            );
            img.width = 300.0;
            img.height = 220.0;
            img
        },
        text("caption", "What is shown?", 50.0, 290.0),
    ];
    image_question.back_elements = vec![text("answer", "Answer", 50.0, 160.0)];

    let mut multiple_choice = base("multiple-choice", "Multiple choice");
    multiple_choice.front_elements = vec![CanvasElement::new(
        "quiz",
        ElementKind::empty(ElementType::MultipleChoice),
        150.0,
        100.0,
    )];
    multiple_choice.allowed_element_types = vec![ElementType::Text, ElementType::Image, ElementType::MultipleChoice];
    multiple_choice.restrict_toolbar = true;

    let mut true_false = base("true-false", "True / false");
    true_false.front_elements =
        vec![CanvasElement::new("quiz", ElementKind::empty(ElementType::TrueFalse), 175.0, 140.0)];
    true_false.allowed_element_types = vec![ElementType::Text, ElementType::Image, ElementType::TrueFalse];
    true_false.restrict_toolbar = true;

    vec![blank, basic, image_question, multiple_choice, true_false]
}

/// Look up a stock template by id or by case-insensitive name.
#[must_use]
pub fn find_template(key: &str) -> Option<CardTemplate> {
    builtin_templates()
        .into_iter()
        .find(|t| t.id == key || t.name.eq_ignore_ascii_case(key))
}
