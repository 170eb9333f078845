//! Placement sessions and the controller that owns them.
//!
//! The host maps its lifecycle events (pickup, per-frame update, confirm,
//! cancel) onto explicit controller calls; there is no ambient shared state.
//! At most one session — single placement or group move — is active per
//! controller, and a controller belongs to exactly one local actor.

use crate::commit::{CommitAuthority, CommitRequest};
use crate::config::{ConfigStore, ScaleConfig, SnapConfig};
use crate::frame::{Point3, Pose, ReferenceFrame, Vec3};
use crate::group::GroupSession;
use crate::hud::{HudSink, control_tip_line, scale_reset_tip, scale_tip};
use crate::query::{BuildVolume, ColliderRef, CollisionQuery, LayerMask};
use crate::scale::ScaleController;
use crate::snap;
use crate::validity::{self, PlacementProbe, ValidityResult};

/// Identity of a placeable object in the host scene graph.
pub type ObjectHandle = u32;

/// Identity of the acting participant.
pub type ActorId = u32;

/// Host-side description of a placeable object.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceableSpec {
    pub handle: ObjectHandle,
    /// The object may sit on restricted (non-floor) surfaces.
    pub allow_restricted_surfaces: bool,
    /// Optional secondary collision check point, local right/up/forward.
    pub collision_point: Option<Vec3>,
    /// Authored scale of the object's mesh.
    pub mesh_scale: Vec3,
    /// Authored scale of the object's parent at the time of the query.
    pub parent_scale: Vec3,
    /// Half extents of the designated placement collider, if any.
    pub placement_half_extents: Option<Vec3>,
}

/// Host scene-graph adapter. Replaces reaching into host internals with
/// plain injected reads plus the single scale write-back used on confirm.
pub trait SceneObjects {
    fn placeable(&self, handle: ObjectHandle) -> Option<PlaceableSpec>;
    fn world_pose(&self, handle: ObjectHandle) -> Option<Pose>;
    fn object_for_collider(&self, collider: ColliderRef) -> Option<ObjectHandle>;
    /// Applies a parent-level scale to the actual object. Runs before commit
    /// offsets, which are relative to the scaled geometry.
    fn apply_parent_scale(&mut self, handle: ObjectHandle, scale: Vec3);
}

/// Why an operation was refused. The display text is the user-visible
/// status line; every refusal leaves state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Another placement is already in progress")]
    AlreadyActive,
    #[error("Object is not placeable")]
    UnknownTarget,
    #[error("No placement in progress")]
    NoActiveSession,
    #[error("No objects selected")]
    EmptySelection,
    #[error("Placement is blocked")]
    Blocked,
}

/// One object being actively positioned.
#[derive(Debug, Clone)]
pub struct PlacementSession {
    target: ObjectHandle,
    allow_restricted_surfaces: bool,
    collision_point: Option<Vec3>,
    mesh_scale: Vec3,
    /// Captured exactly once at pickup; all later scale math composes with
    /// this fixed baseline.
    baseline_parent_scale: Vec3,
    /// Placement collider half extents, resolved lazily on first use.
    collider: Option<Vec3>,
    candidate: Pose,
    last_validity: Option<ValidityResult>,
}

impl PlacementSession {
    pub fn target(&self) -> ObjectHandle {
        self.target
    }

    /// Live working pose, recomputed every update tick.
    pub fn candidate(&self) -> &Pose {
        &self.candidate
    }

    pub fn baseline_parent_scale(&self) -> &Vec3 {
        &self.baseline_parent_scale
    }
}

/// The mutually exclusive session kinds.
#[derive(Debug, Clone)]
pub enum ActiveSession {
    Single(PlacementSession),
    Group(GroupSession),
}

/// Per-frame pipeline output handed to rendering and HUD.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub pose: Pose,
    pub validity: ValidityResult,
    /// Scale to reapply to the preview this tick.
    pub effective_scale: Vec3,
}

/// Owns snapping/scale configuration and the active session for one actor.
#[derive(Debug, Default)]
pub struct PlacementController {
    snap: SnapConfig,
    scale: ScaleController,
    diagnostics: bool,
    active: Option<ActiveSession>,
}

impl PlacementController {
    pub fn new(snap: SnapConfig, scale: ScaleConfig) -> Self {
        Self {
            snap,
            scale: ScaleController::new(scale),
            diagnostics: false,
            active: None,
        }
    }

    /// Binds and reads all settings from a config store.
    pub fn from_store(store: &mut ConfigStore) -> Self {
        Self::new(SnapConfig::bind(store), ScaleConfig::bind(store))
    }

    pub fn snap_config(&self) -> &SnapConfig {
        &self.snap
    }

    pub fn snap_config_mut(&mut self) -> &mut SnapConfig {
        &mut self.snap
    }

    pub fn scale(&self) -> &ScaleController {
        &self.scale
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a placement session for `target`.
    ///
    /// Captures the baseline parent scale exactly once and resets the scale
    /// multiplier; a new pickup never inherits the previous session's scale.
    pub fn pick_up(
        &mut self,
        target: ObjectHandle,
        objects: &dyn SceneObjects,
    ) -> Result<(), SessionError> {
        if self.active.is_some() {
            tracing::warn!("[placement] pick up of {target} refused: session already active");
            return Err(SessionError::AlreadyActive);
        }
        let Some(spec) = objects.placeable(target) else {
            tracing::warn!("[placement] pick up refused: unknown object {target}");
            return Err(SessionError::UnknownTarget);
        };

        let candidate = objects.world_pose(target).unwrap_or_default();
        self.scale.reset();
        self.active = Some(ActiveSession::Single(PlacementSession {
            target,
            allow_restricted_surfaces: spec.allow_restricted_surfaces,
            collision_point: spec.collision_point,
            mesh_scale: spec.mesh_scale,
            baseline_parent_scale: spec.parent_scale,
            collider: None,
            candidate,
            last_validity: None,
        }));
        tracing::info!("[placement] picked up object {target}");
        Ok(())
    }

    /// Runs one frame of the single-placement pipeline: snap, then validity,
    /// then scale. Returns `None` while no single session is active or the
    /// target cannot be resolved this frame.
    pub fn frame_update(
        &mut self,
        raw: &Pose,
        frame: &dyn ReferenceFrame,
        scene: &dyn CollisionQuery,
        mask: LayerMask,
        volume: &BuildVolume,
        objects: &dyn SceneObjects,
    ) -> Option<FrameOutput> {
        let snap_config = self.snap;
        let scale = self.scale;
        let diagnostics = self.diagnostics;
        let Some(ActiveSession::Single(session)) = self.active.as_mut() else {
            return None;
        };

        if session.collider.is_none() {
            let Some(spec) = objects.placeable(session.target) else {
                tracing::warn!(
                    "[placement] object {} is missing, skipping frame",
                    session.target
                );
                return None;
            };
            let Some(half_extents) = spec.placement_half_extents else {
                tracing::warn!(
                    "[placement] object {} has no placement collider, skipping frame",
                    session.target
                );
                return None;
            };
            session.collider = Some(half_extents);
        }
        let half_extents = session.collider?;

        let snapped = snap::resolve(raw, frame, &snap_config, session.allow_restricted_surfaces);
        session.candidate = snapped;

        let probe = PlacementProbe {
            half_extents,
            collision_point: session.collision_point,
        };
        let result = validity::evaluate(scene, mask, volume, &snapped, &probe, diagnostics);
        session.last_validity = Some(result.clone());

        let effective_scale = scale.effective(&session.mesh_scale, &session.baseline_parent_scale);

        Some(FrameOutput {
            pose: snapped,
            validity: result,
            effective_scale,
        })
    }

    /// Finalizes the active session, handing commit requests to `authority`.
    ///
    /// A single placement applies the scaled parent transform to the actual
    /// object before emitting its request; a group emits one request per
    /// member. Returns how many requests were emitted. Terminal: the session
    /// is destroyed and the scale multiplier resets.
    pub fn confirm(
        &mut self,
        frame: &dyn ReferenceFrame,
        objects: &mut dyn SceneObjects,
        authority: &mut dyn CommitAuthority,
        actor: ActorId,
    ) -> Result<usize, SessionError> {
        match self.active.take() {
            None => {
                tracing::warn!("[placement] confirm refused: no active session");
                Err(SessionError::NoActiveSession)
            }
            Some(ActiveSession::Single(session)) => {
                let placeable = session
                    .last_validity
                    .as_ref()
                    .is_some_and(ValidityResult::can_confirm);
                if !placeable {
                    self.active = Some(ActiveSession::Single(session));
                    tracing::warn!("[placement] confirm refused: placement is blocked");
                    return Err(SessionError::Blocked);
                }

                let parent_scale = self.scale.final_parent_scale(&session.baseline_parent_scale);
                objects.apply_parent_scale(session.target, parent_scale);
                authority.commit(CommitRequest {
                    target: session.target,
                    final_position: session.candidate.position,
                    final_rotation_euler: session.candidate.rotation,
                    requesting_actor: actor,
                });
                self.scale.reset();
                tracing::info!(
                    "[placement] committed object {} for actor {actor}",
                    session.target
                );
                Ok(1)
            }
            Some(ActiveSession::Group(group)) => {
                let requests = group.confirm(frame, actor);
                let count = requests.len();
                for request in requests {
                    authority.commit(request);
                }
                self.scale.reset();
                tracing::info!("[group] committed {count} members for actor {actor}");
                Ok(count)
            }
        }
    }

    /// Discards the active session without committing anything. Synchronous:
    /// no transient state survives and the scale multiplier resets.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(_) => {
                self.scale.reset();
                tracing::info!("[placement] session cancelled");
                true
            }
            None => false,
        }
    }

    /// Picks up the current selection as one rigid group. Rejected while any
    /// session is active or when the selection is empty.
    pub fn pick_up_group(
        &mut self,
        selection: &[ObjectHandle],
        objects: &dyn SceneObjects,
        frame: &dyn ReferenceFrame,
    ) -> Result<usize, SessionError> {
        if self.active.is_some() {
            tracing::warn!("[group] pick up refused: session already active");
            return Err(SessionError::AlreadyActive);
        }
        let group = GroupSession::start(selection, objects, frame)?;
        let count = group.len();
        self.scale.reset();
        self.active = Some(ActiveSession::Group(group));
        tracing::info!("[group] picked up {count} objects");
        Ok(count)
    }

    /// Moves the group anchor toward the aimed point (forward ray with a
    /// ground-snap fallback). Returns whether the anchor moved this frame.
    pub fn update_group_anchor(
        &mut self,
        aim_origin: &Point3,
        aim_dir: &Vec3,
        scene: &dyn CollisionQuery,
        mask: LayerMask,
    ) -> bool {
        if let Some(ActiveSession::Group(group)) = self.active.as_mut() {
            group.update_anchor(aim_origin, aim_dir, scene, mask)
        } else {
            false
        }
    }

    /// Preview poses for every group member at the current anchor.
    pub fn group_preview(&self, frame: &dyn ReferenceFrame) -> Vec<(ObjectHandle, Pose)> {
        match &self.active {
            Some(ActiveSession::Group(group)) => group.member_world_poses(frame),
            _ => Vec::new(),
        }
    }

    fn refresh_control_line(&self, hud: &mut dyn HudSink) {
        if let Some(base) = hud.control_line() {
            hud.set_control_line(control_tip_line(&base, &self.snap));
        }
    }

    pub fn toggle_grid(&mut self, hud: &mut dyn HudSink) -> bool {
        let enabled = self.snap.toggle_grid();
        tracing::info!(
            "[config] grid snapping toggled: {}",
            if enabled { "ON" } else { "OFF" }
        );
        self.refresh_control_line(hud);
        enabled
    }

    pub fn increase_grid_size(&mut self, hud: &mut dyn HudSink) -> f32 {
        let size = self.snap.increase_grid_size();
        tracing::info!("[config] grid size increased: {size}");
        self.refresh_control_line(hud);
        size
    }

    pub fn decrease_grid_size(&mut self, hud: &mut dyn HudSink) -> f32 {
        let size = self.snap.decrease_grid_size();
        tracing::info!("[config] grid size decreased: {size}");
        self.refresh_control_line(hud);
        size
    }

    pub fn toggle_rotation_snap(&mut self, hud: &mut dyn HudSink) -> bool {
        let enabled = self.snap.toggle_rotation();
        tracing::info!(
            "[config] rotation snapping toggled: {}",
            if enabled { "ON" } else { "OFF" }
        );
        self.refresh_control_line(hud);
        enabled
    }

    pub fn increase_rotation_step(&mut self, hud: &mut dyn HudSink) -> f32 {
        let step = self.snap.increase_rotation_step();
        tracing::info!("[config] rotation snap angle increased: {step}");
        self.refresh_control_line(hud);
        step
    }

    pub fn decrease_rotation_step(&mut self, hud: &mut dyn HudSink) -> f32 {
        let step = self.snap.decrease_rotation_step();
        tracing::info!("[config] rotation snap angle decreased: {step}");
        self.refresh_control_line(hud);
        step
    }

    pub fn toggle_diagnostics(&mut self, hud: &mut dyn HudSink) -> bool {
        self.diagnostics = !self.diagnostics;
        let body = if self.diagnostics {
            "Collision visualizer enabled"
        } else {
            "Collision visualizer disabled"
        };
        hud.tip("Collision Visualizer", body, "collision_vis");
        tracing::info!("[config] {body}");
        self.diagnostics
    }

    pub fn scale_increase(&mut self, hud: &mut dyn HudSink) -> f32 {
        let value = self.scale.increase();
        hud.tip("Scale", &scale_tip(value), "scale_tip");
        tracing::info!("[scale] placement scale changed to {value}x");
        value
    }

    pub fn scale_decrease(&mut self, hud: &mut dyn HudSink) -> f32 {
        let value = self.scale.decrease();
        hud.tip("Scale", &scale_tip(value), "scale_tip");
        tracing::info!("[scale] placement scale changed to {value}x");
        value
    }

    pub fn scale_reset(&mut self, hud: &mut dyn HudSink) {
        self.scale.reset();
        hud.tip("Scale", &scale_reset_tip(self.scale.current()), "scale_tip");
        tracing::info!("[scale] placement scale reset to 1x");
    }
}
