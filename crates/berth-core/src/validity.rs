//! Physical validity of a candidate placement pose.
//!
//! Recomputed every tick from the live scene; results are never persisted.
//! For identical inputs and an unchanged scene two consecutive evaluations
//! return identical results.

use crate::frame::{Point3, Pose, Vec3};
use crate::query::{BuildVolume, ColliderRef, CollisionQuery, LayerMask};

/// Authored collider extents are shrunk by this factor before the overlap
/// test, so minor float/snap jitter cannot spuriously reject a near-fit.
pub const EXTENT_SAFETY_FACTOR: f32 = 0.57;

/// Radius of the secondary collision-point probe. Catches thin-profile
/// obstructions the box test misses.
pub const COLLISION_POINT_RADIUS: f32 = 1.0;

/// Collision geometry of the object being placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementProbe {
    /// Authored placement collider half extents.
    pub half_extents: Vec3,
    /// Optional secondary check point in local right/up/forward components.
    pub collision_point: Option<Vec3>,
}

/// Outcome of one validity evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityResult {
    /// The pose overlaps scene geometry.
    pub blocked: bool,
    /// The pose position lies within the permitted build volume.
    pub inside_volume: bool,
    /// World-space collision check point, when the secondary probe ran.
    pub collision_point: Option<Point3>,
    /// Overlapping colliders, populated only in diagnostics mode. Computed
    /// from the identical shrunk box as the blocking decision.
    pub overlapping: Vec<ColliderRef>,
}

impl ValidityResult {
    /// Final placement validity.
    pub fn can_confirm(&self) -> bool {
        !self.blocked && self.inside_volume
    }
}

/// Evaluates whether `pose` is a physically valid placement.
///
/// `diagnostics` additionally enumerates the overlapping collider set for
/// visualization; it never influences the decision itself.
pub fn evaluate(
    scene: &dyn CollisionQuery,
    mask: LayerMask,
    volume: &BuildVolume,
    pose: &Pose,
    probe: &PlacementProbe,
    diagnostics: bool,
) -> ValidityResult {
    let shrunk = probe.half_extents * EXTENT_SAFETY_FACTOR;
    let rotation = pose.rotation.quaternion();

    let mut blocked = scene.overlap_box(&pose.position, &shrunk, &rotation, mask);

    let mut collision_point = None;
    if !blocked {
        if let Some(offset) = probe.collision_point {
            let point = pose.position
                + pose.forward() * offset.z
                + pose.right() * offset.x
                + pose.up() * offset.y;
            collision_point = Some(point);
            if scene.overlap_sphere(&point, COLLISION_POINT_RADIUS, mask) {
                blocked = true;
            }
        }
    }

    let inside_volume = volume.contains(&pose.position);

    let overlapping = if diagnostics {
        scene.overlap_box_enumerate(&pose.position, &shrunk, &rotation, mask)
    } else {
        Vec::new()
    };

    ValidityResult {
        blocked,
        inside_volume,
        collision_point,
        overlapping,
    }
}
