#![allow(clippy::float_cmp)]

use canvas::element::ElementKind;
use canvas::template::{apply_template_to_card, find_template};

use super::*;

#[test]
fn front_only_types_have_no_back() {
    assert!(!CardType::SingleSided.has_back());
    assert!(!CardType::Informational.has_back());
    for t in [CardType::Normal, CardType::Simple, CardType::QuizOnly, CardType::PasswordProtected] {
        assert!(t.has_back(), "{t:?}");
    }
}

#[test]
fn single_sided_unset_behavior_is_next() {
    let mut card = Flashcard::new(Uuid::new_v4(), 0);
    card.card_type = CardType::SingleSided;
    assert_eq!(card.effective_countdown_behavior(Side::Front), CountdownBehavior::Next);
    card.countdown_behavior_front = Some(CountdownBehavior::Flip);
    assert_eq!(card.effective_countdown_behavior(Side::Front), CountdownBehavior::Next);
}

#[test]
fn normal_card_behavior_defaults() {
    let mut card = Flashcard::new(Uuid::new_v4(), 0);
    assert_eq!(card.effective_countdown_behavior(Side::Front), CountdownBehavior::Flip);
    assert_eq!(card.effective_countdown_behavior(Side::Back), CountdownBehavior::Next);
    card.countdown_behavior_front = Some(CountdownBehavior::Next);
    assert_eq!(card.effective_countdown_behavior(Side::Front), CountdownBehavior::Next);
}

#[test]
fn back_is_not_editable_on_front_only_cards() {
    let mut card = Flashcard::new(Uuid::new_v4(), 0);
    card.card_type = CardType::Informational;
    assert_eq!(card.editable_sides(), &[Side::Front]);
    let el = CanvasElement::new("t", ElementKind::Text { content: "x".into() }, 0.0, 0.0);
    assert!(!card.set_elements(Side::Back, vec![el.clone()]));
    assert!(card.back_elements.is_empty());
    assert!(card.set_elements(Side::Front, vec![el]));
}

#[test]
fn from_draft_drops_back_for_single_sided() {
    let Some(template) = find_template("basic") else {
        panic!("basic template exists");
    };
    let draft = apply_template_to_card(&template);
    let set_id = Uuid::new_v4();
    let normal = Flashcard::from_draft(set_id, 3, CardType::Normal, draft.clone());
    assert_eq!(normal.template_id.as_deref(), Some("basic"));
    assert_eq!(normal.back_elements.len(), draft.back_elements.len());
    let single = Flashcard::from_draft(set_id, 4, CardType::SingleSided, draft);
    assert!(single.back_elements.is_empty());
    assert_eq!(single.position, 4);
}

#[test]
fn requires_password_needs_type_and_value() {
    let mut card = Flashcard::new(Uuid::new_v4(), 0);
    card.password = Some("pw".into());
    assert!(!card.requires_password());
    card.card_type = CardType::PasswordProtected;
    assert!(card.requires_password());
    card.password = Some(String::new());
    assert!(!card.requires_password());
}

#[test]
fn row_deserializes_with_defaults() {
    let json = serde_json::json!({
        "id": "6f1c1f2e-8a3b-4c5d-9e6f-0a1b2c3d4e5f",
        "set_id": "0f1c1f2e-8a3b-4c5d-9e6f-0a1b2c3d4e5f",
        "card_type": "single-sided",
        "countdown_behavior_front": "next",
        "next_review_at": "2026-01-02T03:04:05Z",
        "front_elements": [
            { "id": "a", "type": "text", "x": 1.0, "y": 2.0, "width": 100.0, "height": 40.0, "content": "hola" }
        ]
    });
    let card: Flashcard = serde_json::from_value(json).unwrap();
    assert_eq!(card.card_type, CardType::SingleSided);
    assert_eq!(card.canvas_width, DEFAULT_CANVAS_WIDTH);
    assert_eq!(card.countdown_behavior_front, Some(CountdownBehavior::Next));
    assert_eq!(card.front_elements.len(), 1);
    assert!(card.next_review_at.is_some());
}

#[test]
fn set_round_trips_timestamps() {
    let json = serde_json::json!({
        "id": "6f1c1f2e-8a3b-4c5d-9e6f-0a1b2c3d4e5f",
        "title": "Verbs",
        "user_id": "0f1c1f2e-8a3b-4c5d-9e6f-0a1b2c3d4e5f",
        "permanent_shuffle": true,
        "created_at": "2026-03-01T10:00:00Z"
    });
    let set: FlashcardSet = serde_json::from_value(json).unwrap();
    assert!(set.permanent_shuffle);
    let back = serde_json::to_value(&set).unwrap();
    assert_eq!(back["created_at"], "2026-03-01T10:00:00Z");
}

#[test]
fn quiz_count_spans_both_sides() {
    let mut card = Flashcard::new(Uuid::new_v4(), 0);
    card.front_elements.push(CanvasElement::new(
        "tf",
        ElementKind::TrueFalse { question: "?".into(), correct_answer: 0 },
        0.0,
        0.0,
    ));
    card.back_elements.push(CanvasElement::new("t", ElementKind::Text { content: String::new() }, 0.0, 0.0));
    assert_eq!(card.quiz_count(), 1);
}
