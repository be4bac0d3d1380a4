#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Conversions ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
    assert!(point_approx_eq(cam.screen_to_world(Point::new(50.0, 75.0)), Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_world_with_pan_and_zoom() {
    let cam = Camera { pan_x: 20.0, pan_y: 10.0, zoom: 2.0 };
    let world = cam.screen_to_world(Point::new(120.0, 50.0));
    assert!(point_approx_eq(world, Point::new(50.0, 20.0)));
}

#[test]
fn round_trip_fractional_zoom() {
    let cam = Camera { pan_x: 13.7, pan_y: -42.3, zoom: 0.75 };
    let world = Point::new(333.3, -999.9);
    assert!(point_approx_eq(world, cam.screen_to_world(cam.world_to_screen(world))));
}

#[test]
fn screen_dist_to_world_ignores_pan() {
    let cam = Camera { pan_x: 999.0, pan_y: -999.0, zoom: 2.0 };
    assert!(approx_eq(cam.screen_dist_to_world(8.0), 4.0));
}

// --- Pan / zoom ---

#[test]
fn pan_by_accumulates() {
    let mut cam = Camera::default();
    cam.pan_by(10.0, -5.0);
    cam.pan_by(2.5, 1.0);
    assert!(approx_eq(cam.pan_x, 12.5));
    assert!(approx_eq(cam.pan_y, -4.0));
}

#[test]
fn zoom_step_wheel_up_zooms_in() {
    let mut cam = Camera::default();
    assert!(cam.zoom_step(-100.0));
    assert!(approx_eq(cam.zoom, 1.1));
}

#[test]
fn zoom_step_wheel_down_zooms_out() {
    let mut cam = Camera::default();
    assert!(cam.zoom_step(100.0));
    assert!(approx_eq(cam.zoom, 0.9));
}

#[test]
fn zoom_never_exceeds_max() {
    let mut cam = Camera::default();
    for _ in 0..200 {
        cam.zoom_step(-1.0);
        assert!(cam.zoom <= MAX_ZOOM);
    }
    assert_eq!(cam.zoom, MAX_ZOOM);
    assert!(!cam.zoom_step(-1.0));
}

#[test]
fn zoom_never_drops_below_min() {
    let mut cam = Camera::default();
    for _ in 0..200 {
        cam.zoom_step(1.0);
        assert!(cam.zoom >= MIN_ZOOM);
    }
    assert_eq!(cam.zoom, MIN_ZOOM);
}

#[test]
fn set_zoom_ignores_non_finite() {
    let mut cam = Camera::default();
    assert!(!cam.set_zoom(f64::NAN));
    assert_eq!(cam.zoom, 1.0);
}

// --- Fit to view ---

#[test]
fn fit_fullscreen_centers_card() {
    let mut cam = Camera::default();
    cam.fit_to_view(Size::new(600.0, 400.0), Size::new(1328.0, 928.0), FitContext::Fullscreen);
    // avail = 1200 x 800 -> zoom 2.0 (at the fullscreen cap)
    assert!(approx_eq(cam.zoom, 2.0));
    assert!(approx_eq(cam.pan_x, (1328.0 - 1200.0) / 2.0));
    assert!(approx_eq(cam.pan_y, (928.0 - 800.0) / 2.0));
}

#[test]
fn fit_fullscreen_caps_zoom() {
    let mut cam = Camera::default();
    cam.fit_to_view(Size::new(100.0, 100.0), Size::new(4000.0, 4000.0), FitContext::Fullscreen);
    assert!(approx_eq(cam.zoom, FIT_MAX_ZOOM_FULLSCREEN));
}

#[test]
fn fit_embedded_never_magnifies_and_resets_pan() {
    let mut cam = Camera { pan_x: 40.0, pan_y: -12.0, zoom: 2.5 };
    cam.fit_to_view(Size::new(600.0, 400.0), Size::new(2000.0, 2000.0), FitContext::Embedded);
    assert!(approx_eq(cam.zoom, 1.0));
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
}

#[test]
fn fit_embedded_shrinks_to_narrow_viewport() {
    let mut cam = Camera::default();
    cam.fit_to_view(Size::new(600.0, 400.0), Size::new(332.0, 800.0), FitContext::Embedded);
    // (332 - 32) / 600 = 0.5
    assert!(approx_eq(cam.zoom, 0.5));
}

#[test]
fn fit_tiny_viewport_clamps_to_min_zoom() {
    let mut cam = Camera::default();
    cam.fit_to_view(Size::new(600.0, 400.0), Size::new(10.0, 10.0), FitContext::Embedded);
    assert!(approx_eq(cam.zoom, MIN_ZOOM));
}

#[test]
fn fit_degenerate_canvas_is_noop() {
    let mut cam = Camera { pan_x: 5.0, pan_y: 6.0, zoom: 1.5 };
    cam.fit_to_view(Size::new(0.0, 400.0), Size::new(800.0, 600.0), FitContext::Fullscreen);
    assert_eq!(cam, Camera { pan_x: 5.0, pan_y: 6.0, zoom: 1.5 });
}

// --- Viewport handle ---

#[test]
fn fixed_viewport_reports_bounds() {
    assert_eq!(FixedViewport(Some(Size::new(1.0, 2.0))).bounds(), Some(Size::new(1.0, 2.0)));
    assert_eq!(FixedViewport(None).bounds(), None);
}
