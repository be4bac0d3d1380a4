#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::Command;
use crate::element::{CanvasElement, ElementKind};

fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> CanvasElement {
    let mut el = CanvasElement::new(id, ElementKind::Text { content: String::new() }, x, y);
    el.width = w;
    el.height = h;
    el
}

#[test]
fn background_hit_is_none() {
    let mut store = ElementStore::new();
    store.apply(Command::Add(rect("a", 0.0, 0.0, 50.0, 50.0))).unwrap();
    assert!(hit_test(Point::new(200.0, 200.0), &store).is_none());
}

#[test]
fn topmost_element_wins() {
    let mut store = ElementStore::new();
    store.apply(Command::Add(rect("under", 0.0, 0.0, 100.0, 100.0))).unwrap();
    store.apply(Command::Add(rect("over", 50.0, 50.0, 100.0, 100.0))).unwrap();
    let hit = hit_test(Point::new(75.0, 75.0), &store).unwrap();
    assert_eq!(hit.element_id, "over");
    let hit = hit_test(Point::new(10.0, 10.0), &store).unwrap();
    assert_eq!(hit.element_id, "under");
}

#[test]
fn z_order_beats_insertion_order() {
    let mut store = ElementStore::new();
    store.apply(Command::Add(rect("a", 0.0, 0.0, 100.0, 100.0))).unwrap();
    store.apply(Command::Add(rect("b", 0.0, 0.0, 100.0, 100.0))).unwrap();
    store.apply(Command::BringToFront { id: "a".into() }).unwrap();
    assert_eq!(hit_test(Point::new(5.0, 5.0), &store).unwrap().element_id, "a");
}

#[test]
fn grab_offset_is_relative_to_origin() {
    let mut store = ElementStore::new();
    store.apply(Command::Add(rect("a", 20.0, 30.0, 100.0, 100.0))).unwrap();
    let hit = hit_test(Point::new(25.0, 40.0), &store).unwrap();
    assert_eq!(hit.grab_offset, Point::new(5.0, 10.0));
}

#[test]
fn empty_store_hits_nothing() {
    assert!(hit_test(Point::new(0.0, 0.0), &ElementStore::new()).is_none());
}
