//! Bundled [`CollisionQuery`] provider over a set of static colliders.
//!
//! Hosts with their own physics engine adapt it behind [`CollisionQuery`]
//! instead; this provider exists for headless hosts and tests. Queries scan
//! colliders in insertion order, so enumeration results are stable for an
//! unchanged scene.

use std::fmt;

use parry3d::query::{Ray, RayCast, intersection_test};
use parry3d::shape::{Ball, Cuboid, Shape};

use crate::frame::{Iso, Point3, Quat, Vec3};
use crate::query::{ColliderRef, CollisionQuery, LayerMask, RayHit};

#[derive(Debug, Clone, Copy)]
enum SceneShape {
    Cuboid(Cuboid),
    Ball(Ball),
}

impl SceneShape {
    fn as_shape(&self) -> &dyn Shape {
        match self {
            Self::Cuboid(cuboid) => cuboid,
            Self::Ball(ball) => ball,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SceneCollider {
    id: ColliderRef,
    shape: SceneShape,
    pose: Iso,
    layers: LayerMask,
    is_trigger: bool,
}

/// An owned, insertion-ordered collection of static colliders.
#[derive(Default)]
pub struct StaticScene {
    colliders: Vec<SceneCollider>,
    next_id: u32,
}

impl fmt::Debug for StaticScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticScene")
            .field("collider_count", &self.colliders.len())
            .finish_non_exhaustive()
    }
}

impl StaticScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, shape: SceneShape, pose: Iso, layers: LayerMask, is_trigger: bool) -> ColliderRef {
        let id = ColliderRef(self.next_id);
        self.next_id += 1;
        self.colliders.push(SceneCollider {
            id,
            shape,
            pose,
            layers,
            is_trigger,
        });
        id
    }

    /// Adds an oriented box collider.
    pub fn add_cuboid(
        &mut self,
        center: Point3,
        half_extents: Vec3,
        rotation: Quat,
        layers: LayerMask,
    ) -> ColliderRef {
        let pose = Iso::from_parts(
            nalgebra::Translation3::new(center.x, center.y, center.z),
            rotation,
        );
        self.insert(SceneShape::Cuboid(Cuboid::new(half_extents)), pose, layers, false)
    }

    /// Adds a sphere collider.
    pub fn add_ball(&mut self, center: Point3, radius: f32, layers: LayerMask) -> ColliderRef {
        let pose = Iso::translation(center.x, center.y, center.z);
        self.insert(SceneShape::Ball(Ball::new(radius)), pose, layers, false)
    }

    /// Adds an oriented box marked as a trigger volume. Triggers are invisible
    /// to every query.
    pub fn add_trigger_cuboid(
        &mut self,
        center: Point3,
        half_extents: Vec3,
        rotation: Quat,
        layers: LayerMask,
    ) -> ColliderRef {
        let pose = Iso::from_parts(
            nalgebra::Translation3::new(center.x, center.y, center.z),
            rotation,
        );
        self.insert(SceneShape::Cuboid(Cuboid::new(half_extents)), pose, layers, true)
    }

    /// Removes a collider. Returns false when the reference is unknown.
    pub fn remove(&mut self, collider: ColliderRef) -> bool {
        if let Some(index) = self.colliders.iter().position(|c| c.id == collider) {
            self.colliders.remove(index);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    fn candidates(&self, mask: LayerMask) -> impl Iterator<Item = &SceneCollider> {
        self.colliders
            .iter()
            .filter(move |c| !c.is_trigger && c.layers.intersects(mask))
    }
}

impl CollisionQuery for StaticScene {
    fn overlap_box(
        &self,
        center: &Point3,
        half_extents: &Vec3,
        rotation: &Quat,
        mask: LayerMask,
    ) -> bool {
        let probe = Cuboid::new(*half_extents);
        let probe_pose = Iso::from_parts(
            nalgebra::Translation3::new(center.x, center.y, center.z),
            *rotation,
        );
        self.candidates(mask).any(|c| {
            intersection_test(&probe_pose, &probe, &c.pose, c.shape.as_shape()).unwrap_or(false)
        })
    }

    fn overlap_box_enumerate(
        &self,
        center: &Point3,
        half_extents: &Vec3,
        rotation: &Quat,
        mask: LayerMask,
    ) -> Vec<ColliderRef> {
        let probe = Cuboid::new(*half_extents);
        let probe_pose = Iso::from_parts(
            nalgebra::Translation3::new(center.x, center.y, center.z),
            *rotation,
        );
        self.candidates(mask)
            .filter(|c| {
                intersection_test(&probe_pose, &probe, &c.pose, c.shape.as_shape()).unwrap_or(false)
            })
            .map(|c| c.id)
            .collect()
    }

    fn overlap_sphere(&self, center: &Point3, radius: f32, mask: LayerMask) -> bool {
        let probe = Ball::new(radius);
        let probe_pose = Iso::translation(center.x, center.y, center.z);
        self.candidates(mask).any(|c| {
            intersection_test(&probe_pose, &probe, &c.pose, c.shape.as_shape()).unwrap_or(false)
        })
    }

    fn raycast(
        &self,
        origin: &Point3,
        direction: &Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let len = direction.norm();
        if len <= f32::EPSILON || max_distance <= 0.0 {
            return None;
        }
        let dir = direction / len;
        let ray = Ray::new(*origin, dir);

        let mut best: Option<RayHit> = None;
        for c in self.candidates(mask) {
            if let Some(toi) = c.shape.as_shape().cast_ray(&c.pose, &ray, max_distance, true) {
                if best.as_ref().is_none_or(|b| toi < b.distance) {
                    best = Some(RayHit {
                        collider: c.id,
                        distance: toi,
                        point: *origin + dir * toi,
                    });
                }
            }
        }
        best
    }
}
