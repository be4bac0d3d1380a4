//! Card canvas editing engine.
//!
//! This crate owns everything that happens on one side of a flashcard while it
//! is being edited: the typed element model, the command reducer that mutates
//! it, bounded undo/redo, template materialization, and the pan/zoom/drag
//! controller. Hosts wire pointer and wheel events to [`engine::Engine`] and
//! persist the resulting elements when the user saves.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Per-side editor engine: gestures, dispatch, history |
//! | [`element`] | Element model and the `ElementKind` sum type |
//! | [`doc`] | Element store and the `Command` reducer |
//! | [`history`] | Bounded undo/redo store |
//! | [`geometry`] | Fit-to-canvas and grid snapping |
//! | [`template`] | Card templates and `apply_template_to_card` |
//! | [`camera`] | Pan/zoom camera, fit-to-view, viewport handle |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against elements |
//! | [`render`] | Per-type element view models |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod element;
pub mod engine;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod render;
pub mod template;
