//! Pure geometry helpers for keeping elements on the card canvas.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::consts::{MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH};
use crate::element::CanvasElement;

/// Return a copy of `element` that fits inside a `canvas_width` × `canvas_height` canvas.
///
/// Oversized elements are shrunk to the canvas, then the 50×30 minimum is
/// enforced, then the origin is clamped so the right and bottom edges stay on
/// the canvas. Aspect ratio is not preserved. The result is a fixed point:
/// fitting it again changes nothing. On a canvas smaller than the minimum size
/// the minimum wins and the element overhangs.
#[must_use]
pub fn fit_element_to_canvas(element: &CanvasElement, canvas_width: f64, canvas_height: f64) -> CanvasElement {
    let mut fitted = element.clone();
    let (x, width) = fit_axis(element.x, element.width, canvas_width, MIN_ELEMENT_WIDTH);
    let (y, height) = fit_axis(element.y, element.height, canvas_height, MIN_ELEMENT_HEIGHT);
    fitted.x = x;
    fitted.y = y;
    fitted.width = width;
    fitted.height = height;
    fitted
}

fn fit_axis(origin: f64, extent: f64, bound: f64, min_extent: f64) -> (f64, f64) {
    let origin = finite_or_zero(origin);
    let extent = finite_or_zero(extent);
    let bound = finite_or_zero(bound).max(0.0);

    let extent = extent.min(bound).max(min_extent);
    let origin = origin.clamp(0.0, (bound - extent).max(0.0));
    (origin, extent)
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Round `value` to the nearest multiple of `grid`. A non-positive grid disables snapping.
#[must_use]
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 || !grid.is_finite() {
        return value;
    }
    (value / grid).round() * grid
}
