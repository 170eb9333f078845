//! Multi-select state for picking up groups of placed objects.

use crate::frame::{Point3, Vec3};
use crate::query::{CollisionQuery, LayerMask};
use crate::session::{ObjectHandle, SceneObjects};

/// How far a selection pick ray reaches.
pub const PICK_RAY_RANGE: f32 = 6.0;

/// Result of one pick attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Added(ObjectHandle),
    Removed(ObjectHandle),
    Miss,
}

/// Ordered, duplicate-free set of selected objects.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    mode: bool,
    items: Vec<ObjectHandle>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether selection mode is currently active.
    pub fn mode(&self) -> bool {
        self.mode
    }

    /// Toggles selection mode. Leaving the mode clears the set.
    pub fn toggle_mode(&mut self) -> bool {
        self.mode = !self.mode;
        tracing::info!(
            "[selection] selection mode {}",
            if self.mode { "ON" } else { "OFF" }
        );
        if !self.mode {
            self.clear();
        }
        self.mode
    }

    /// Adds the handle if absent, removes it if present. Returns whether it
    /// was added.
    pub fn toggle(&mut self, handle: ObjectHandle) -> bool {
        if let Some(index) = self.items.iter().position(|&h| h == handle) {
            self.items.remove(index);
            false
        } else {
            self.items.push(handle);
            true
        }
    }

    /// Casts a pick ray and toggles membership of the aimed object.
    /// Inactive selection mode and misses leave the set untouched.
    pub fn pick(
        &mut self,
        scene: &dyn CollisionQuery,
        objects: &dyn SceneObjects,
        aim_origin: &Point3,
        aim_dir: &Vec3,
        mask: LayerMask,
    ) -> PickOutcome {
        if !self.mode {
            return PickOutcome::Miss;
        }
        let Some(hit) = scene.raycast(aim_origin, aim_dir, PICK_RAY_RANGE, mask) else {
            return PickOutcome::Miss;
        };
        let Some(handle) = objects.object_for_collider(hit.collider) else {
            return PickOutcome::Miss;
        };

        if self.toggle(handle) {
            tracing::debug!("[selection] added object {handle} ({} selected)", self.len());
            PickOutcome::Added(handle)
        } else {
            tracing::debug!("[selection] removed object {handle} ({} selected)", self.len());
            PickOutcome::Removed(handle)
        }
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            tracing::info!("[selection] selection cleared");
        }
        self.items.clear();
    }

    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.items.contains(&handle)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Selected handles in pick order.
    pub fn handles(&self) -> &[ObjectHandle] {
        &self.items
    }
}
