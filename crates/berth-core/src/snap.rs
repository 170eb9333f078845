//! Grid and angle snapping of a candidate placement pose.
//!
//! Positions snap on the two in-plane axes of the reference frame, so the
//! grid travels (and rotates) with the frame. Rotation snapping touches yaw
//! only; pitch and roll pass through untouched.

use crate::config::SnapConfig;
use crate::frame::{Point3, Pose, ReferenceFrame};

/// Rounds a scalar to the nearest multiple of `grid`. A non-positive grid
/// leaves the value untouched.
pub fn snap_to_grid(value: f32, grid: f32) -> f32 {
    if grid <= 0.0 {
        value
    } else {
        (value / grid).round() * grid
    }
}

/// Snaps a yaw angle (degrees) to the nearest multiple of `step`.
pub fn snap_yaw(yaw_deg: f32, step_deg: f32) -> f32 {
    if step_deg <= 0.0 {
        yaw_deg
    } else {
        (yaw_deg / step_deg).round() * step_deg
    }
}

/// Whether position snapping applies to a target.
///
/// Targets restricted to the floor always snap; targets that may sit on
/// restricted (wall) surfaces snap only when the config opts in.
pub fn position_snap_applies(config: &SnapConfig, allow_restricted_surfaces: bool) -> bool {
    config.grid_enabled && (!allow_restricted_surfaces || config.snap_on_restricted_surfaces)
}

/// Resolves a raw candidate pose into its grid/angle-snapped form.
///
/// Idempotent: resolving an already-snapped pose with the same config and
/// frame returns the same pose (no drift from repeated application).
pub fn resolve(
    raw: &Pose,
    frame: &dyn ReferenceFrame,
    config: &SnapConfig,
    allow_restricted_surfaces: bool,
) -> Pose {
    let mut out = *raw;

    if position_snap_applies(config, allow_restricted_surfaces) {
        let local = frame.world_to_local(&raw.position);
        let snapped = Point3::new(
            snap_to_grid(local.x, config.grid_size),
            local.y,
            snap_to_grid(local.z, config.grid_size),
        );
        out.position = frame.local_to_world(&snapped);
    }

    if config.rotation_enabled {
        out.rotation.yaw = snap_yaw(out.rotation.yaw, config.rotation_step_degrees);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{EulerDeg, FixedFrame, Iso, Quat, Vec3};

    fn config(grid_size: f32, rotation_step: f32) -> SnapConfig {
        SnapConfig {
            grid_size,
            rotation_step_degrees: rotation_step,
            ..SnapConfig::default()
        }
    }

    #[test]
    fn test_position_snaps_in_plane_axes() {
        // grid 0.5: local (1.23, 0, 0.81) lands on (1.0, 0, 1.0)
        let frame = FixedFrame::identity();
        let raw = Pose::from_position(Point3::new(1.23, 0.0, 0.81));
        let snapped = resolve(&raw, &frame, &config(0.5, 45.0), false);

        assert!((snapped.position.x - 1.0).abs() < 1e-5);
        assert!(snapped.position.y.abs() < 1e-5);
        assert!((snapped.position.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_vertical_axis_passes_through() {
        let frame = FixedFrame::identity();
        let raw = Pose::from_position(Point3::new(0.3, 1.77, 0.3));
        let snapped = resolve(&raw, &frame, &config(0.5, 45.0), false);
        assert!((snapped.position.y - 1.77).abs() < 1e-5);
    }

    #[test]
    fn test_snap_follows_moving_frame() {
        let frame = FixedFrame::from_translation(Vec3::new(100.0, 0.0, -40.0));
        let raw = Pose::from_position(Point3::new(101.23, 0.0, -39.19));
        let snapped = resolve(&raw, &frame, &config(0.5, 45.0), false);

        // Same local result as the identity-frame case, shifted back to world
        assert!((snapped.position.x - 101.0).abs() < 1e-4);
        assert!((snapped.position.z - -39.0).abs() < 1e-4);
    }

    #[test]
    fn test_snap_in_rotated_frame() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), 90.0_f32.to_radians());
        let frame = FixedFrame(Iso::from_parts(nalgebra::Translation3::identity(), rotation));
        let raw = Pose::from_position(frame.local_to_world(&Point3::new(1.23, 0.0, 0.81)));
        let snapped = resolve(&raw, &frame, &config(0.5, 45.0), false);

        let local = frame.world_to_local(&snapped.position);
        assert!((local.x - 1.0).abs() < 1e-4);
        assert!((local.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_yaw_snaps_to_step() {
        // step 45: a raw yaw of 52 snaps to 45
        let frame = FixedFrame::identity();
        let raw = Pose::new(Point3::origin(), EulerDeg::yaw_only(52.0));
        let snapped = resolve(&raw, &frame, &config(0.5, 45.0), false);
        assert!((snapped.rotation.yaw - 45.0).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_and_roll_untouched() {
        let frame = FixedFrame::identity();
        let raw = Pose::new(Point3::origin(), EulerDeg::new(10.0, 52.0, -7.0));
        let snapped = resolve(&raw, &frame, &config(0.5, 45.0), false);
        assert!((snapped.rotation.pitch - 10.0).abs() < 1e-6);
        assert!((snapped.rotation.roll - -7.0).abs() < 1e-6);
        assert!((snapped.rotation.yaw - 45.0).abs() < 1e-5);
    }

    #[test]
    fn test_yaw_deviation_bounded_by_half_step() {
        let frame = FixedFrame::identity();
        let cfg = config(0.5, 45.0);
        for raw_yaw in [0.0, 13.0, 22.4, 22.6, 52.0, 89.9, 180.0, 359.0] {
            let raw = Pose::new(Point3::origin(), EulerDeg::yaw_only(raw_yaw));
            let snapped = resolve(&raw, &frame, &cfg, false);
            let deviation = (snapped.rotation.yaw - raw_yaw).abs();
            assert!(
                deviation <= cfg.rotation_step_degrees / 2.0 + 1e-4,
                "yaw {raw_yaw} deviated by {deviation}"
            );
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let frame = FixedFrame::from_translation(Vec3::new(3.0, 1.0, -8.0));
        let cfg = config(0.5, 45.0);
        let raw = Pose::new(Point3::new(4.71, 0.4, -6.66), EulerDeg::yaw_only(100.0));

        let once = resolve(&raw, &frame, &cfg, false);
        let twice = resolve(&once, &frame, &cfg, false);
        assert!((once.position - twice.position).norm() < 1e-4);
        assert!((once.rotation.yaw - twice.rotation.yaw).abs() < 1e-4);
    }

    #[test]
    fn test_disabled_grid_skips_position() {
        let frame = FixedFrame::identity();
        let mut cfg = config(0.5, 45.0);
        cfg.grid_enabled = false;
        let raw = Pose::from_position(Point3::new(1.23, 0.0, 0.81));
        let snapped = resolve(&raw, &frame, &cfg, false);
        assert!((snapped.position - raw.position).norm() < 1e-6);
    }

    #[test]
    fn test_restricted_surface_gating() {
        let frame = FixedFrame::identity();
        let mut cfg = config(0.5, 45.0);
        let raw = Pose::from_position(Point3::new(1.23, 0.0, 0.81));

        // A wall-capable target skips snapping by default...
        let snapped = resolve(&raw, &frame, &cfg, true);
        assert!((snapped.position - raw.position).norm() < 1e-6);

        // ...and snaps once the config opts in
        cfg.snap_on_restricted_surfaces = true;
        let snapped = resolve(&raw, &frame, &cfg, true);
        assert!((snapped.position.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_disabled_rotation_passes_yaw() {
        let frame = FixedFrame::identity();
        let mut cfg = config(0.5, 45.0);
        cfg.rotation_enabled = false;
        let raw = Pose::new(Point3::origin(), EulerDeg::yaw_only(52.0));
        let snapped = resolve(&raw, &frame, &cfg, false);
        assert!((snapped.rotation.yaw - 52.0).abs() < 1e-6);
    }
}
