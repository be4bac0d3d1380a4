//! Element store and the command reducer that mutates it.
//!
//! Renderers and tools never touch elements directly. They emit a
//! [`Command`], and [`ElementStore::apply`] validates and applies it, logging
//! each one. This keeps every mutation discrete and replayable.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use tracing::debug;

use crate::consts::{MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH};
use crate::element::{CanvasElement, ElementId, ElementType, PartialElement};

/// A discrete mutation of one card side's elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Insert a new element on top of the stack.
    Add(CanvasElement),
    /// Apply a sparse update.
    Update { id: ElementId, fields: PartialElement },
    /// Reposition an element's origin.
    Move { id: ElementId, x: f64, y: f64 },
    /// Resize an element, never below the minimum size.
    Resize { id: ElementId, width: f64, height: f64 },
    Remove { id: ElementId },
    BringToFront { id: ElementId },
    SendToBack { id: ElementId },
    /// Replace every element at once (undo/redo, paste-all).
    Replace(Vec<CanvasElement>),
}

impl Command {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Update { .. } => "update",
            Self::Move { .. } => "move",
            Self::Resize { .. } => "resize",
            Self::Remove { .. } => "remove",
            Self::BringToFront { .. } => "bring_to_front",
            Self::SendToBack { .. } => "send_to_back",
            Self::Replace(_) => "replace",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocError {
    #[error("element not found: {0}")]
    NotFound(ElementId),
    #[error("duplicate element id: {0}")]
    DuplicateId(ElementId),
    #[error("element type {0:?} is not allowed on this card")]
    TypeNotAllowed(ElementType),
    #[error("cannot change element {id} from {from:?} to {to:?}")]
    KindMismatch { id: ElementId, from: ElementType, to: ElementType },
}

/// Ordered elements of one card side.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<CanvasElement>,
    /// `None` allows every type.
    allowed: Option<HashSet<ElementType>>,
}

impl ElementStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict which element types `Command::Add` accepts. `None` lifts the restriction.
    pub fn set_allowed_types(&mut self, allowed: Option<HashSet<ElementType>>) {
        self.allowed = allowed;
    }

    #[must_use]
    pub fn allows(&self, element_type: ElementType) -> bool {
        self.allowed.as_ref().is_none_or(|set| set.contains(&element_type))
    }

    /// Replace all elements with a loaded snapshot.
    pub fn load(&mut self, elements: Vec<CanvasElement>) {
        self.elements = elements;
    }

    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    /// Clone the elements for a history snapshot or a save.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CanvasElement> {
        self.elements.clone()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut CanvasElement, DocError> {
        self.elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DocError::NotFound(id.to_owned()))
    }

    /// Elements sorted by `(z_index, insertion order)` for draw order.
    #[must_use]
    pub fn sorted(&self) -> Vec<&CanvasElement> {
        let mut els: Vec<&CanvasElement> = self.elements.iter().collect();
        els.sort_by_key(|e| e.z_index);
        els
    }

    fn max_z(&self) -> Option<i64> {
        self.elements.iter().map(|e| e.z_index).max()
    }

    fn min_z(&self) -> Option<i64> {
        self.elements.iter().map(|e| e.z_index).min()
    }

    fn count_at_z(&self, z: i64) -> usize {
        self.elements.iter().filter(|e| e.z_index == z).count()
    }

    /// Validate and apply one command.
    ///
    /// # Errors
    ///
    /// Returns a [`DocError`] if the command targets a missing element, reuses
    /// an id, adds a disallowed type, or changes an element's type. The store is
    /// unchanged on error.
    pub fn apply(&mut self, command: Command) -> Result<(), DocError> {
        debug!(command = command.name(), "apply element command");
        match command {
            Command::Add(mut el) => {
                if !self.allows(el.element_type()) {
                    return Err(DocError::TypeNotAllowed(el.element_type()));
                }
                if self.get(&el.id).is_some() {
                    return Err(DocError::DuplicateId(el.id));
                }
                el.z_index = self.max_z().map_or(0, |z| z + 1);
                self.elements.push(el);
            }
            Command::Update { id, fields } => {
                let el = self.get_mut(&id)?;
                if let Some(kind) = &fields.kind {
                    let (from, to) = (el.element_type(), kind.element_type());
                    if from != to {
                        return Err(DocError::KindMismatch { id, from, to });
                    }
                }
                if let Some(x) = fields.x {
                    el.x = x;
                }
                if let Some(y) = fields.y {
                    el.y = y;
                }
                if let Some(w) = fields.width {
                    el.width = w.max(MIN_ELEMENT_WIDTH);
                }
                if let Some(h) = fields.height {
                    el.height = h.max(MIN_ELEMENT_HEIGHT);
                }
                if let Some(r) = fields.rotation {
                    el.rotation = r;
                }
                if let Some(z) = fields.z_index {
                    el.z_index = z;
                }
                if let Some(kind) = fields.kind {
                    el.kind = kind;
                }
            }
            Command::Move { id, x, y } => {
                let el = self.get_mut(&id)?;
                el.x = x;
                el.y = y;
            }
            Command::Resize { id, width, height } => {
                let el = self.get_mut(&id)?;
                el.width = width.max(MIN_ELEMENT_WIDTH);
                el.height = height.max(MIN_ELEMENT_HEIGHT);
            }
            Command::Remove { id } => {
                let before = self.elements.len();
                self.elements.retain(|e| e.id != id);
                if self.elements.len() == before {
                    return Err(DocError::NotFound(id));
                }
            }
            Command::BringToFront { id } => {
                let top = self.max_z().unwrap_or(0);
                let shared = self.count_at_z(top) > 1;
                let el = self.get_mut(&id)?;
                if el.z_index < top || shared {
                    el.z_index = top + 1;
                }
            }
            Command::SendToBack { id } => {
                let bottom = self.min_z().unwrap_or(0);
                let shared = self.count_at_z(bottom) > 1;
                let el = self.get_mut(&id)?;
                if el.z_index > bottom || shared {
                    el.z_index = bottom - 1;
                }
            }
            Command::Replace(elements) => {
                let mut seen = HashSet::new();
                for el in &elements {
                    if !seen.insert(el.id.as_str()) {
                        return Err(DocError::DuplicateId(el.id.clone()));
                    }
                }
                self.elements = elements;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
