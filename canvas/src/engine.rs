//! Canvas engine for one card side: element store, camera, gestures, history.
//!
//! The engine owns everything the editor needs to react to pointer and wheel
//! input. Element changes go through [`Engine::dispatch`], which commits one
//! undo snapshot per command. Drags move the element live and commit a single
//! snapshot on release.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::camera::{Camera, FitContext, Point, Size, ViewportHandle};
use crate::consts::DRAG_THRESHOLD;
use crate::doc::{Command, DocError, ElementStore};
use crate::element::{CanvasElement, ElementId, ElementType};
use crate::geometry::snap_to_grid;
use crate::hit::hit_test;
use crate::history::History;
use crate::input::{Button, InputState, Modifiers, WheelDelta};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Effects the host should react to after an input handler returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Elements changed; persist on the next save.
    ElementsChanged,
    SelectionChanged(Option<ElementId>),
    CameraChanged,
    SetCursor(&'static str),
    RenderNeeded,
}

/// Per-editor options.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorSettings {
    /// Snap dragged elements to this grid on release.
    pub snap_grid: Option<f64>,
    pub fit_context: FitContext,
}

/// Editor state for a single card side.
pub struct Engine {
    pub store: ElementStore,
    pub camera: Camera,
    pub input: InputState,
    pub history: History<Vec<CanvasElement>>,
    pub selected: Option<ElementId>,
    /// Fixed card canvas size in card units.
    pub canvas: Size,
    pub settings: EditorSettings,
    viewport: Box<dyn ViewportHandle>,
}

impl Engine {
    /// Create an engine bound to the host viewport.
    #[must_use]
    pub fn new(viewport: Box<dyn ViewportHandle>, canvas: Size, settings: EditorSettings) -> Self {
        Self {
            store: ElementStore::new(),
            camera: Camera::default(),
            input: InputState::default(),
            history: History::new(),
            selected: None,
            canvas,
            settings,
            viewport,
        }
    }

    /// Swap the host viewport, e.g. after the editor is remounted elsewhere.
    pub fn set_viewport(&mut self, viewport: Box<dyn ViewportHandle>) {
        self.viewport = viewport;
    }

    // --- Data inputs ---

    /// Open a card side for editing. Resets history, selection and gesture.
    pub fn load_side(&mut self, elements: Vec<CanvasElement>, allowed: Option<HashSet<ElementType>>) {
        self.store.set_allowed_types(allowed);
        self.store.load(elements);
        self.history.clear();
        self.history.save_state(&self.store.snapshot());
        self.selected = None;
        self.input = InputState::Idle;
    }

    /// Apply an element command and record it in history.
    ///
    /// # Errors
    ///
    /// Propagates the store's [`DocError`]; nothing is recorded on error.
    pub fn dispatch(&mut self, command: Command) -> Result<Vec<Action>, DocError> {
        let removed = match &command {
            Command::Remove { id } => Some(id.clone()),
            _ => None,
        };
        self.store.apply(command)?;
        self.history.save_state(&self.store.snapshot());

        let mut actions = vec![Action::ElementsChanged, Action::RenderNeeded];
        if removed.is_some() && removed == self.selected {
            self.selected = None;
            actions.push(Action::SelectionChanged(None));
        }
        Ok(actions)
    }

    /// Restore the previous snapshot, if any.
    pub fn undo(&mut self) -> Vec<Action> {
        match self.history.undo() {
            Some(elements) => self.restore(elements),
            None => Vec::new(),
        }
    }

    /// Re-apply the next snapshot, if any.
    pub fn redo(&mut self) -> Vec<Action> {
        match self.history.redo() {
            Some(elements) => self.restore(elements),
            None => Vec::new(),
        }
    }

    fn restore(&mut self, elements: Vec<CanvasElement>) -> Vec<Action> {
        self.store.load(elements);
        self.input = InputState::Idle;
        let mut actions = vec![Action::ElementsChanged, Action::RenderNeeded];
        if let Some(id) = &self.selected {
            if self.store.get(id).is_none() {
                self.selected = None;
                actions.push(Action::SelectionChanged(None));
            }
        }
        actions
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Queries ---

    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        self.store.elements()
    }

    #[must_use]
    pub fn selection(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    // --- Viewport ---

    /// Fit the card canvas into the host viewport. No-op while the host is unmounted.
    pub fn fit_to_view(&mut self) -> Vec<Action> {
        let Some(viewport) = self.viewport.bounds() else {
            trace!("fit_to_view skipped: viewport not mounted");
            return Vec::new();
        };
        self.camera.fit_to_view(self.canvas, viewport, self.settings.fit_context);
        vec![Action::CameraChanged, Action::RenderNeeded]
    }

    // --- Input events ---

    /// Start a gesture. A press on an element selects and starts dragging it;
    /// a press on the background (or with the middle button) starts a pan.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        match button {
            Button::Secondary => Vec::new(),
            Button::Middle => self.begin_pan(screen_pt),
            Button::Primary => {
                let world = self.camera.screen_to_world(screen_pt);
                match hit_test(world, &self.store) {
                    Some(hit) => {
                        let mut actions = Vec::new();
                        if self.selected.as_ref() != Some(&hit.element_id) {
                            self.selected = Some(hit.element_id.clone());
                            actions.push(Action::SelectionChanged(self.selected.clone()));
                        }
                        debug!(id = %hit.element_id, "drag start");
                        self.input = InputState::DraggingElement {
                            id: hit.element_id,
                            grab_offset: hit.grab_offset,
                            start_world: world,
                            moved: false,
                        };
                        actions.push(Action::SetCursor("move"));
                        actions.push(Action::RenderNeeded);
                        actions
                    }
                    None => {
                        let mut actions = Vec::new();
                        if self.selected.take().is_some() {
                            actions.push(Action::SelectionChanged(None));
                        }
                        actions.extend(self.begin_pan(screen_pt));
                        actions
                    }
                }
            }
        }
    }

    fn begin_pan(&mut self, screen_pt: Point) -> Vec<Action> {
        self.input = InputState::Panning { last_screen: screen_pt };
        vec![Action::SetCursor("grabbing")]
    }

    /// Continue the active gesture.
    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                let dx = screen_pt.x - last_screen.x;
                let dy = screen_pt.y - last_screen.y;
                *last_screen = screen_pt;
                self.camera.pan_by(dx, dy);
                vec![Action::CameraChanged, Action::RenderNeeded]
            }
            InputState::DraggingElement { id, grab_offset, start_world, moved } => {
                let world = self.camera.screen_to_world(screen_pt);
                if !*moved {
                    let travel = (world.x - start_world.x).hypot(world.y - start_world.y);
                    if travel < DRAG_THRESHOLD {
                        return Vec::new();
                    }
                    *moved = true;
                }
                let command = Command::Move { id: id.clone(), x: world.x - grab_offset.x, y: world.y - grab_offset.y };
                match self.store.apply(command) {
                    Ok(()) => vec![Action::ElementsChanged, Action::RenderNeeded],
                    Err(e) => {
                        debug!(error = %e, "drag target vanished");
                        self.input = InputState::Idle;
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Finish the active gesture.
    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.end_gesture()
    }

    /// The pointer left the viewport; ends the gesture like a release.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.end_gesture()
    }

    fn end_gesture(&mut self) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        let mut actions = vec![Action::SetCursor("default")];
        if let InputState::DraggingElement { id, moved: true, .. } = state {
            if let (Some(grid), Some(el)) = (self.settings.snap_grid, self.store.get(&id)) {
                let command = Command::Move { id: id.clone(), x: snap_to_grid(el.x, grid), y: snap_to_grid(el.y, grid) };
                if let Err(e) = self.store.apply(command) {
                    debug!(error = %e, "snap target vanished");
                }
            }
            self.history.save_state(&self.store.snapshot());
            debug!(%id, "drag committed");
            actions.push(Action::ElementsChanged);
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Zoom with ctrl/meta held, otherwise pan by the wheel delta.
    pub fn on_wheel(&mut self, _screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.zooms() {
            if delta.dy.abs() < f64::EPSILON || !self.camera.zoom_step(delta.dy) {
                return Vec::new();
            }
        } else {
            self.camera.pan_by(-delta.dx, -delta.dy);
        }
        vec![Action::CameraChanged, Action::RenderNeeded]
    }
}
