//! Element renderers: one view model per element type.
//!
//! Rendering is an exhaustive match over [`ElementKind`]. Each variant becomes
//! an [`ElementView`] that a front end can draw without knowing anything about
//! the element model. Renderers only read; they never mutate elements.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::doc::ElementStore;
use crate::element::{CanvasElement, ElementId, ElementKind, Stroke};

const YOUTUBE_ID_LEN: usize = 11;
const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Summary of a deck that an embed element links to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddedDeck {
    pub title: String,
    pub card_count: usize,
}

/// The user's current choice on a quiz element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub selected: usize,
    /// Results are shown; correct and incorrect options are marked.
    pub revealed: bool,
}

/// Lookups the renderers need beyond the element itself.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Linked decks keyed by deck id. Missing entries render as "not found".
    pub embeds: HashMap<String, EmbeddedDeck>,
    pub selections: HashMap<ElementId, Selection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionState {
    Idle,
    Selected,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionView {
    pub label: String,
    pub state: OptionState,
}

/// Part of a fill-in-the-blank sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    Blank { index: usize, answer: String },
}

/// A drawing stroke as SVG path data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathView {
    pub d: String,
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmbedView {
    /// The element has no deck linked yet.
    Unlinked,
    Resolved { deck_id: String, title: String, card_count: usize },
    NotFound { deck_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ElementView {
    Text { lines: Vec<String> },
    Image { src: String, alt: String },
    Audio { src: String },
    Drawing { paths: Vec<PathView> },
    Choice { question: String, options: Vec<OptionView> },
    FillInBlank { segments: Vec<Segment> },
    Youtube { embed_url: String },
    DeckEmbed { embed: EmbedView },
    Tts { text: String, language: Option<String> },
    /// Media element with nothing to show yet.
    Placeholder { label: &'static str },
}

/// A positioned element view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedElement {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub view: ElementView,
}

/// Render every element of a side, bottom of the stack first.
#[must_use]
pub fn render_side(store: &ElementStore, ctx: &RenderContext) -> Vec<RenderedElement> {
    store.sorted().into_iter().map(|el| render_element(el, ctx)).collect()
}

/// Render a single element.
#[must_use]
pub fn render_element(el: &CanvasElement, ctx: &RenderContext) -> RenderedElement {
    let view = match &el.kind {
        ElementKind::Text { content } => ElementView::Text { lines: content.lines().map(str::to_owned).collect() },
        ElementKind::Image { image_url, .. } if image_url.is_empty() => ElementView::Placeholder { label: "image" },
        ElementKind::Image { image_url, alt } => ElementView::Image { src: image_url.clone(), alt: alt.clone() },
        ElementKind::Audio { audio_url } if audio_url.is_empty() => ElementView::Placeholder { label: "audio" },
        ElementKind::Audio { audio_url } => ElementView::Audio { src: audio_url.clone() },
        ElementKind::Drawing { strokes } => ElementView::Drawing { paths: strokes.iter().map(stroke_path).collect() },
        ElementKind::MultipleChoice { question, multiple_choice_options, correct_answer } => ElementView::Choice {
            question: question.clone(),
            options: option_views(multiple_choice_options, *correct_answer, ctx.selections.get(&el.id)),
        },
        ElementKind::TrueFalse { question, correct_answer } => ElementView::Choice {
            question: question.clone(),
            options: option_views(&["True".to_owned(), "False".to_owned()], *correct_answer, ctx.selections.get(&el.id)),
        },
        ElementKind::FillInBlank { content } => ElementView::FillInBlank { segments: parse_blanks(content) },
        ElementKind::Youtube { youtube_id } => match youtube_embed_url(youtube_id) {
            Some(embed_url) => ElementView::Youtube { embed_url },
            None => ElementView::Placeholder { label: "youtube" },
        },
        ElementKind::DeckEmbed { deck_id } => ElementView::DeckEmbed { embed: embed_view(deck_id, ctx) },
        ElementKind::Tts { content, language } => ElementView::Tts { text: content.clone(), language: language.clone() },
    };

    RenderedElement {
        id: el.id.clone(),
        x: el.x,
        y: el.y,
        width: el.width,
        height: el.height,
        rotation: el.rotation,
        view,
    }
}

fn option_views(labels: &[String], correct: usize, selection: Option<&Selection>) -> Vec<OptionView> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let state = match selection {
                None => OptionState::Idle,
                Some(s) if s.revealed && i == correct => OptionState::Correct,
                Some(s) if s.revealed && i == s.selected => OptionState::Incorrect,
                Some(s) if !s.revealed && i == s.selected => OptionState::Selected,
                Some(_) => OptionState::Idle,
            };
            OptionView { label: label.clone(), state }
        })
        .collect()
}

fn embed_view(deck_id: &str, ctx: &RenderContext) -> EmbedView {
    if deck_id.is_empty() {
        return EmbedView::Unlinked;
    }
    match ctx.embeds.get(deck_id) {
        Some(deck) => EmbedView::Resolved {
            deck_id: deck_id.to_owned(),
            title: deck.title.clone(),
            card_count: deck.card_count,
        },
        None => EmbedView::NotFound { deck_id: deck_id.to_owned() },
    }
}

fn stroke_path(stroke: &Stroke) -> PathView {
    let mut d = String::new();
    for (i, [x, y]) in stroke.points.iter().enumerate() {
        let op = if i == 0 { 'M' } else { 'L' };
        if !d.is_empty() {
            d.push(' ');
        }
        // Writing into a String cannot fail.
        if write!(d, "{op}{x} {y}").is_err() {
            break;
        }
    }
    PathView { d, color: stroke.color.clone(), width: stroke.width }
}

/// Split fill-in-the-blank content on `[[answer]]` markers.
///
/// An unterminated `[[` is kept as literal text.
#[must_use]
pub fn parse_blanks(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = content;
    let mut index = 0;
    while let Some(open) = rest.find("[[") {
        let Some(close) = rest[open + 2..].find("]]") else {
            break;
        };
        if open > 0 {
            segments.push(Segment::Text { text: rest[..open].to_owned() });
        }
        let answer = rest[open + 2..open + 2 + close].trim().to_owned();
        segments.push(Segment::Blank { index, answer });
        index += 1;
        rest = &rest[open + 2 + close + 2..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text { text: rest.to_owned() });
    }
    segments
}

/// Resolve a bare video id or any common YouTube URL form to an embed URL.
#[must_use]
pub fn youtube_embed_url(input: &str) -> Option<String> {
    let input = input.trim();
    let id = if is_video_id(input) {
        input
    } else {
        let after_host = input
            .split_once("youtu.be/")
            .or_else(|| input.split_once("/embed/"))
            .or_else(|| input.split_once("/shorts/"))
            .map(|(_, tail)| tail)
            .or_else(|| {
                input
                    .split_once('?')
                    .and_then(|(_, query)| query.split('&').find_map(|kv| kv.strip_prefix("v=")))
            })?;
        after_host.get(..YOUTUBE_ID_LEN)?
    };
    is_video_id(id).then(|| format!("{YOUTUBE_EMBED_BASE}{id}"))
}

fn is_video_id(s: &str) -> bool {
    s.len() == YOUTUBE_ID_LEN && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
