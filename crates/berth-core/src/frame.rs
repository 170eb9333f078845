//! Poses, Euler rotations and the moving reference frame grid math runs in.

use nalgebra as na;
use serde::{Deserialize, Serialize};

pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Euler rotation in degrees, Y-up convention: yaw about +Y, pitch about +X,
/// roll about +Z, applied yaw ∘ pitch ∘ roll.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerDeg {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl EulerDeg {
    pub const IDENTITY: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Rotation about the vertical axis only.
    pub const fn yaw_only(yaw: f32) -> Self {
        Self {
            pitch: 0.0,
            yaw,
            roll: 0.0,
        }
    }

    pub fn quaternion(&self) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), self.yaw.to_radians())
            * Quat::from_axis_angle(&Vec3::x_axis(), self.pitch.to_radians())
            * Quat::from_axis_angle(&Vec3::z_axis(), self.roll.to_radians())
    }
}

/// World-space position plus Euler rotation of an object being placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point3,
    pub rotation: EulerDeg,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            rotation: EulerDeg::IDENTITY,
        }
    }
}

impl Pose {
    pub const fn new(position: Point3, rotation: EulerDeg) -> Self {
        Self { position, rotation }
    }

    pub const fn from_position(position: Point3) -> Self {
        Self {
            position,
            rotation: EulerDeg::IDENTITY,
        }
    }

    pub fn isometry(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.position.x, self.position.y, self.position.z),
            self.rotation.quaternion(),
        )
    }

    /// Local +Z in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation.quaternion() * Vec3::z()
    }

    /// Local +X in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation.quaternion() * Vec3::x()
    }

    /// Local +Y in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation.quaternion() * Vec3::y()
    }
}

/// A movable local coordinate system (e.g. a vehicle interior) that grid
/// snapping is computed against, so the grid travels with it.
///
/// Implementations must return the LIVE pose on every call; the frame may be
/// in motion and callers never cache it across frames.
pub trait ReferenceFrame {
    fn world_pose(&self) -> Iso;

    fn world_to_local(&self, point: &Point3) -> Point3 {
        self.world_pose().inverse_transform_point(point)
    }

    fn local_to_world(&self, point: &Point3) -> Point3 {
        self.world_pose().transform_point(point)
    }
}

/// A reference frame with a constant pose. Suits static hosts and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedFrame(pub Iso);

impl FixedFrame {
    pub fn identity() -> Self {
        Self(Iso::identity())
    }

    pub fn from_translation(offset: Vec3) -> Self {
        Self(Iso::translation(offset.x, offset.y, offset.z))
    }
}

impl ReferenceFrame for FixedFrame {
    fn world_pose(&self) -> Iso {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaw_rotates_forward() {
        let pose = Pose::new(Point3::origin(), EulerDeg::yaw_only(90.0));
        let fwd = pose.forward();
        // +Z rotated 90° about +Y lands on +X
        assert!((fwd.x - 1.0).abs() < 1e-5);
        assert!(fwd.y.abs() < 1e-5);
        assert!(fwd.z.abs() < 1e-5);
    }

    #[test]
    fn test_identity_basis() {
        let pose = Pose::default();
        assert!((pose.forward() - Vec3::z()).norm() < 1e-6);
        assert!((pose.right() - Vec3::x()).norm() < 1e-6);
        assert!((pose.up() - Vec3::y()).norm() < 1e-6);
    }

    #[test]
    fn test_fixed_frame_round_trip() {
        let frame = FixedFrame::from_translation(Vec3::new(10.0, -2.0, 4.0));
        let world = Point3::new(11.5, 0.0, 4.5);
        let local = frame.world_to_local(&world);
        assert!((local.x - 1.5).abs() < 1e-5);
        assert!((local.y - 2.0).abs() < 1e-5);
        assert!((local.z - 0.5).abs() < 1e-5);

        let back = frame.local_to_world(&local);
        assert!((back - world).norm() < 1e-5);
    }

    #[test]
    fn test_isometry_matches_components() {
        let pose = Pose::new(Point3::new(1.0, 2.0, 3.0), EulerDeg::yaw_only(45.0));
        let iso = pose.isometry();
        let p = iso.transform_point(&Point3::origin());
        assert!((p - pose.position).norm() < 1e-6);
    }
}
