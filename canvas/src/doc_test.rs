#![allow(clippy::float_cmp)]

use super::*;
use crate::element::ElementKind;

fn text(id: &str) -> CanvasElement {
    CanvasElement::new(id, ElementKind::Text { content: id.into() }, 0.0, 0.0)
}

fn store_with(ids: &[&str]) -> ElementStore {
    let mut store = ElementStore::new();
    for id in ids {
        store.apply(Command::Add(text(id))).unwrap();
    }
    store
}

// =============================================================
// Add
// =============================================================

#[test]
fn add_appends_on_top() {
    let store = store_with(&["a", "b", "c"]);
    let z: Vec<i64> = store.elements().iter().map(|e| e.z_index).collect();
    assert_eq!(z, vec![0, 1, 2]);
}

#[test]
fn add_duplicate_id_rejected() {
    let mut store = store_with(&["a"]);
    assert_eq!(store.apply(Command::Add(text("a"))), Err(DocError::DuplicateId("a".into())));
    assert_eq!(store.len(), 1);
}

#[test]
fn add_disallowed_type_rejected() {
    let mut store = ElementStore::new();
    store.set_allowed_types(Some(HashSet::from([ElementType::Image])));
    assert_eq!(store.apply(Command::Add(text("a"))), Err(DocError::TypeNotAllowed(ElementType::Text)));
    assert!(store.is_empty());
}

// =============================================================
// Update / Move / Resize
// =============================================================

#[test]
fn update_applies_only_present_fields() {
    let mut store = store_with(&["a"]);
    let fields = PartialElement { x: Some(40.0), rotation: Some(15.0), ..Default::default() };
    store.apply(Command::Update { id: "a".into(), fields }).unwrap();
    let el = store.get("a").unwrap();
    assert_eq!(el.x, 40.0);
    assert_eq!(el.y, 0.0);
    assert_eq!(el.rotation, 15.0);
}

#[test]
fn update_replaces_payload_of_same_type() {
    let mut store = store_with(&["a"]);
    let fields = PartialElement { kind: Some(ElementKind::Text { content: "new".into() }), ..Default::default() };
    store.apply(Command::Update { id: "a".into(), fields }).unwrap();
    assert_eq!(store.get("a").unwrap().kind, ElementKind::Text { content: "new".into() });
}

#[test]
fn update_rejects_type_change() {
    let mut store = store_with(&["a"]);
    let fields = PartialElement {
        x: Some(99.0),
        kind: Some(ElementKind::Audio { audio_url: "a.mp3".into() }),
        ..Default::default()
    };
    let err = store.apply(Command::Update { id: "a".into(), fields }).unwrap_err();
    assert!(matches!(err, DocError::KindMismatch { from: ElementType::Text, to: ElementType::Audio, .. }));
    assert_eq!(store.get("a").unwrap().x, 0.0);
}

#[test]
fn update_missing_element_not_found() {
    let mut store = ElementStore::new();
    let err = store.apply(Command::Update { id: "ghost".into(), fields: PartialElement::default() });
    assert_eq!(err, Err(DocError::NotFound("ghost".into())));
}

#[test]
fn move_sets_origin() {
    let mut store = store_with(&["a"]);
    store.apply(Command::Move { id: "a".into(), x: 12.0, y: 34.0 }).unwrap();
    let el = store.get("a").unwrap();
    assert_eq!((el.x, el.y), (12.0, 34.0));
}

#[test]
fn resize_enforces_minimum() {
    let mut store = store_with(&["a"]);
    store.apply(Command::Resize { id: "a".into(), width: 5.0, height: 500.0 }).unwrap();
    let el = store.get("a").unwrap();
    assert_eq!((el.width, el.height), (MIN_ELEMENT_WIDTH, 500.0));
}

// =============================================================
// Remove / ordering / replace
// =============================================================

#[test]
fn remove_deletes_element() {
    let mut store = store_with(&["a", "b"]);
    store.apply(Command::Remove { id: "a".into() }).unwrap();
    assert!(store.get("a").is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn remove_missing_is_error() {
    let mut store = store_with(&["a"]);
    assert!(store.apply(Command::Remove { id: "b".into() }).is_err());
}

#[test]
fn bring_to_front_and_send_to_back() {
    let mut store = store_with(&["a", "b", "c"]);
    store.apply(Command::BringToFront { id: "a".into() }).unwrap();
    let order: Vec<&str> = store.sorted().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(order, vec!["b", "c", "a"]);

    store.apply(Command::SendToBack { id: "c".into() }).unwrap();
    let order: Vec<&str> = store.sorted().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(order, vec!["c", "b", "a"]);
}

#[test]
fn bring_to_front_on_unique_top_is_stable() {
    let mut store = store_with(&["a", "b"]);
    store.apply(Command::BringToFront { id: "b".into() }).unwrap();
    assert_eq!(store.get("b").unwrap().z_index, 1);
}

#[test]
fn bring_to_front_breaks_ties() {
    let mut store = ElementStore::new();
    store.load(vec![text("a"), text("b")]);
    store.apply(Command::BringToFront { id: "a".into() }).unwrap();
    assert_eq!(store.get("a").unwrap().z_index, 1);
}

#[test]
fn replace_rejects_duplicate_ids() {
    let mut store = store_with(&["x"]);
    let err = store.apply(Command::Replace(vec![text("a"), text("a")]));
    assert_eq!(err, Err(DocError::DuplicateId("a".into())));
    assert!(store.get("x").is_some());
}

#[test]
fn replace_swaps_all_elements() {
    let mut store = store_with(&["x"]);
    store.apply(Command::Replace(vec![text("a"), text("b")])).unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.get("x").is_none());
}

#[test]
fn command_names_are_stable() {
    assert_eq!(Command::Remove { id: "a".into() }.name(), "remove");
    assert_eq!(Command::Replace(Vec::new()).name(), "replace");
}
