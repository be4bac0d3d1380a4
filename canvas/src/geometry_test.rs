#![allow(clippy::float_cmp)]

use super::*;
use crate::element::ElementKind;

fn el(x: f64, y: f64, w: f64, h: f64) -> CanvasElement {
    let mut e = CanvasElement::new("e", ElementKind::Text { content: String::new() }, x, y);
    e.width = w;
    e.height = h;
    e
}

fn assert_within(e: &CanvasElement, cw: f64, ch: f64) {
    assert!(e.x >= 0.0 && e.y >= 0.0, "origin off canvas: {e:?}");
    assert!(e.x + e.width <= cw + 1e-9, "right edge past canvas: {e:?}");
    assert!(e.y + e.height <= ch + 1e-9, "bottom edge past canvas: {e:?}");
    assert!(e.width >= MIN_ELEMENT_WIDTH && e.height >= MIN_ELEMENT_HEIGHT);
}

#[test]
fn element_already_inside_is_unchanged() {
    let e = el(10.0, 20.0, 100.0, 50.0);
    assert_eq!(fit_element_to_canvas(&e, 600.0, 400.0), e);
}

#[test]
fn overhanging_element_is_moved_back() {
    let fitted = fit_element_to_canvas(&el(550.0, 380.0, 100.0, 50.0), 600.0, 400.0);
    assert_eq!((fitted.x, fitted.y), (500.0, 350.0));
    assert_eq!((fitted.width, fitted.height), (100.0, 50.0));
}

#[test]
fn negative_origin_is_clamped() {
    let fitted = fit_element_to_canvas(&el(-40.0, -5.0, 100.0, 50.0), 600.0, 400.0);
    assert_eq!((fitted.x, fitted.y), (0.0, 0.0));
}

#[test]
fn oversized_element_is_shrunk() {
    let fitted = fit_element_to_canvas(&el(90.0, 10.0, 800.0, 100.0), 600.0, 400.0);
    assert_eq!((fitted.x, fitted.width), (0.0, 600.0));
    assert_eq!((fitted.y, fitted.height), (10.0, 100.0));
}

#[test]
fn tiny_element_grows_to_minimum() {
    let fitted = fit_element_to_canvas(&el(580.0, 390.0, 10.0, 5.0), 600.0, 400.0);
    assert_eq!((fitted.width, fitted.height), (MIN_ELEMENT_WIDTH, MIN_ELEMENT_HEIGHT));
    assert_within(&fitted, 600.0, 400.0);
}

#[test]
fn fit_is_idempotent() {
    let cases = [
        el(10.0, 20.0, 100.0, 50.0),
        el(580.0, 390.0, 10.0, 5.0),
        el(-100.0, 900.0, 2000.0, 3.0),
        el(300.0, 300.0, 400.0, 400.0),
        el(f64::NAN, 10.0, f64::INFINITY, 40.0),
    ];
    for (cw, ch) in [(600.0, 400.0), (50.0, 30.0), (1024.0, 768.0)] {
        for e in &cases {
            let once = fit_element_to_canvas(e, cw, ch);
            let twice = fit_element_to_canvas(&once, cw, ch);
            assert_eq!(once, twice);
            assert_within(&once, cw, ch);
        }
    }
}

#[test]
fn canvas_smaller_than_minimum_keeps_minimum() {
    let fitted = fit_element_to_canvas(&el(0.0, 0.0, 100.0, 100.0), 20.0, 10.0);
    assert_eq!((fitted.width, fitted.height), (MIN_ELEMENT_WIDTH, MIN_ELEMENT_HEIGHT));
    assert_eq!((fitted.x, fitted.y), (0.0, 0.0));
}

#[test]
fn fit_preserves_payload_and_id() {
    let e = el(700.0, 0.0, 100.0, 50.0);
    let fitted = fit_element_to_canvas(&e, 600.0, 400.0);
    assert_eq!(fitted.id, e.id);
    assert_eq!(fitted.kind, e.kind);
}

#[test]
fn snap_rounds_to_grid() {
    assert_eq!(snap_to_grid(23.0, 10.0), 20.0);
    assert_eq!(snap_to_grid(25.0, 10.0), 30.0);
    assert_eq!(snap_to_grid(-4.0, 10.0), -0.0);
}

#[test]
fn snap_disabled_for_non_positive_grid() {
    assert_eq!(snap_to_grid(23.7, 0.0), 23.7);
    assert_eq!(snap_to_grid(23.7, -5.0), 23.7);
}
