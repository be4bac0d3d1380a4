//! Shared numeric constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest zoom factor reachable by wheel or fit-to-view.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor reachable by wheel or fit-to-view.
pub const MAX_ZOOM: f64 = 3.0;

/// Multiplier applied per modified wheel tick towards the user (zoom in).
pub const ZOOM_IN_STEP: f64 = 1.1;

/// Multiplier applied per modified wheel tick away from the user (zoom out).
pub const ZOOM_OUT_STEP: f64 = 0.9;

// ── Fit to view ─────────────────────────────────────────────────

/// Padding around the card, in screen pixels, when fitting in fullscreen.
pub const FIT_PADDING_FULLSCREEN_PX: f64 = 64.0;

/// Zoom cap when fitting in fullscreen.
pub const FIT_MAX_ZOOM_FULLSCREEN: f64 = 2.0;

/// Padding around the card, in screen pixels, when fitting an embedded editor.
pub const FIT_PADDING_EMBEDDED_PX: f64 = 16.0;

/// Zoom cap when fitting an embedded editor; never magnify past 1:1.
pub const FIT_MAX_ZOOM_EMBEDDED: f64 = 1.0;

// ── Elements ────────────────────────────────────────────────────

/// Minimum element width after a fit-to-canvas adjustment.
pub const MIN_ELEMENT_WIDTH: f64 = 50.0;

/// Minimum element height after a fit-to-canvas adjustment.
pub const MIN_ELEMENT_HEIGHT: f64 = 30.0;

/// Default card canvas width in card units.
pub const DEFAULT_CANVAS_WIDTH: f64 = 600.0;

/// Default card canvas height in card units.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 400.0;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots held by the undo/redo store.
pub const HISTORY_LIMIT: usize = 10;

// ── Drag ────────────────────────────────────────────────────────

/// Pointer travel, in card units, below which a press-release is a click rather than a drag.
pub const DRAG_THRESHOLD: f64 = 2.0;
