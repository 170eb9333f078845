//! Collision query provider contract.
//!
//! The placement core never talks to a physics engine directly; the host
//! injects an implementation of [`CollisionQuery`] (see [`crate::scene`] for
//! the bundled static-scene provider).

use parry3d::bounding_volume::Aabb;
use serde::{Deserialize, Serialize};

use crate::frame::{Point3, Quat, Vec3};

/// Bit mask selecting which collision layers a query may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// Opaque identity of a collider owned by the query provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderRef(pub u32);

/// Result of a successful ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub collider: ColliderRef,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    pub point: Point3,
}

/// Overlap and ray queries the placement core needs from its host.
///
/// All queries must ignore trigger-type colliders.
pub trait CollisionQuery {
    /// True when an oriented box overlaps any non-trigger collider in `mask`.
    fn overlap_box(&self, center: &Point3, half_extents: &Vec3, rotation: &Quat, mask: LayerMask)
    -> bool;

    /// The set of non-trigger colliders overlapping an oriented box.
    fn overlap_box_enumerate(
        &self,
        center: &Point3,
        half_extents: &Vec3,
        rotation: &Quat,
        mask: LayerMask,
    ) -> Vec<ColliderRef>;

    /// True when a sphere overlaps any non-trigger collider in `mask`.
    fn overlap_sphere(&self, center: &Point3, radius: f32, mask: LayerMask) -> bool;

    /// Nearest non-trigger collider hit by a ray, if any within `max_distance`.
    fn raycast(
        &self,
        origin: &Point3,
        direction: &Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

/// World-space volume a placement position must stay inside.
#[derive(Debug, Clone, Copy)]
pub struct BuildVolume {
    aabb: Aabb,
}

impl BuildVolume {
    pub fn new(mins: Point3, maxs: Point3) -> Self {
        Self {
            aabb: Aabb::new(mins, maxs),
        }
    }

    pub fn from_half_extents(center: Point3, half_extents: Vec3) -> Self {
        Self {
            aabb: Aabb::from_half_extents(center, half_extents),
        }
    }

    pub fn contains(&self, point: &Point3) -> bool {
        self.aabb.contains_local_point(point)
    }
}
