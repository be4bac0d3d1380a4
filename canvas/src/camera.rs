//! Pan/zoom camera over a card canvas, plus the viewport handle it fits into.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{
    FIT_MAX_ZOOM_EMBEDDED, FIT_MAX_ZOOM_FULLSCREEN, FIT_PADDING_EMBEDDED_PX, FIT_PADDING_FULLSCREEN_PX, MAX_ZOOM,
    MIN_ZOOM, ZOOM_IN_STEP, ZOOM_OUT_STEP,
};

/// A point in either screen or card space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a viewport or card canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Where the editor canvas is hosted. Controls fit-to-view padding and zoom cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitContext {
    /// Full-window editor; the card is centered.
    Fullscreen,
    /// Editor embedded in a page; the pan offset is reset.
    #[default]
    Embedded,
}

impl FitContext {
    fn padding(self) -> f64 {
        match self {
            Self::Fullscreen => FIT_PADDING_FULLSCREEN_PX,
            Self::Embedded => FIT_PADDING_EMBEDDED_PX,
        }
    }

    fn max_zoom(self) -> f64 {
        match self {
            Self::Fullscreen => FIT_MAX_ZOOM_FULLSCREEN,
            Self::Embedded => FIT_MAX_ZOOM_EMBEDDED,
        }
    }
}

/// Handle to the element hosting the canvas.
///
/// Returns `None` while the host is not mounted; callers treat that as "do nothing".
pub trait ViewportHandle {
    fn bounds(&self) -> Option<Size>;
}

/// A viewport with fixed dimensions, or none at all. Used headless and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedViewport(pub Option<Size>);

impl ViewportHandle for FixedViewport {
    fn bounds(&self) -> Option<Size> {
        self.0
    }
}

#[cfg(feature = "web")]
impl ViewportHandle for web_sys::Element {
    fn bounds(&self) -> Option<Size> {
        if !self.is_connected() {
            return None;
        }
        let rect = self.get_bounding_client_rect();
        Some(Size::new(rect.width(), rect.height()))
    }
}

/// Camera state for pan/zoom over the card canvas.
///
/// `pan_x` / `pan_y` are in screen pixels.
/// `zoom` is a scale factor (1.0 = no zoom), always within `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point to card coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a card-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance to card-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Translate the view by a screen-space offset.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Apply one zoom wheel tick. Negative `dy` (wheel up) zooms in.
    ///
    /// Returns `true` if the zoom level changed.
    pub fn zoom_step(&mut self, dy: f64) -> bool {
        let factor = if dy < 0.0 { ZOOM_IN_STEP } else { ZOOM_OUT_STEP };
        self.set_zoom(self.zoom * factor)
    }

    /// Set the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`. Returns `true` if it changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let next = if zoom.is_finite() { zoom.clamp(MIN_ZOOM, MAX_ZOOM) } else { self.zoom };
        let changed = (next - self.zoom).abs() > f64::EPSILON;
        self.zoom = next;
        changed
    }

    /// Fit a card canvas of `canvas` size into `viewport`.
    ///
    /// Fullscreen centers the card; embedded resets the pan offset to the origin.
    pub fn fit_to_view(&mut self, canvas: Size, viewport: Size, context: FitContext) {
        if canvas.width <= 0.0 || canvas.height <= 0.0 {
            return;
        }
        let padding = context.padding();
        let avail_w = (viewport.width - padding * 2.0).max(0.0);
        let avail_h = (viewport.height - padding * 2.0).max(0.0);
        let fit = (avail_w / canvas.width).min(avail_h / canvas.height);
        self.zoom = fit.clamp(MIN_ZOOM, context.max_zoom().min(MAX_ZOOM));

        match context {
            FitContext::Fullscreen => {
                self.pan_x = (viewport.width - canvas.width * self.zoom) * 0.5;
                self.pan_y = (viewport.height - canvas.height * self.zoom) * 0.5;
            }
            FitContext::Embedded => {
                self.pan_x = 0.0;
                self.pan_y = 0.0;
            }
        }
    }
}
