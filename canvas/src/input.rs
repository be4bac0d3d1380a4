//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! `InputState` is the gesture tracked between pointer-down and pointer-up (or
//! pointer-leave). The engine only arbitrates two gestures: panning the view
//! when the press lands on the background, and dragging an element when it
//! lands on one.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::element::ElementId;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the held keys turn a wheel event into a zoom.
    #[must_use]
    pub fn zooms(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button; always pans.
    Middle,
    /// Right mouse button; ignored by the canvas.
    Secondary,
}

/// Wheel / trackpad scroll delta in screen pixels.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive = wheel down.
    pub dy: f64,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the background moves the view.
    Panning {
        /// Screen position of the previous pointer event.
        last_screen: Point,
    },
    /// Dragging an element repositions it.
    DraggingElement {
        id: ElementId,
        /// Pointer position relative to the element origin when the drag began.
        grab_offset: Point,
        /// Pointer position in card space when the drag began.
        start_world: Point,
        /// Set once the pointer travels past the drag threshold.
        moved: bool,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
