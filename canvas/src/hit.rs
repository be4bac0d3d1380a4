#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::ElementStore;
use crate::element::ElementId;

/// Result of a hit test: the topmost element under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub element_id: ElementId,
    /// Pointer position minus the element origin, in card units.
    pub grab_offset: Point,
}

/// Find the topmost element containing `world_pt`, honoring rotation.
///
/// `None` means the pointer is over the background.
#[must_use]
pub fn hit_test(world_pt: Point, store: &ElementStore) -> Option<Hit> {
    store
        .sorted()
        .into_iter()
        .rev()
        .find(|el| el.contains(world_pt))
        .map(|el| Hit {
            element_id: el.id.clone(),
            grab_offset: Point::new(world_pt.x - el.x, world_pt.y - el.y),
        })
}
