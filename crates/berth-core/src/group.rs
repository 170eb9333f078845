//! Moving a set of already-placed objects as one rigid group.
//!
//! Member offsets from the group centroid are captured once, in
//! reference-frame-local space, and applied unchanged to every preview and
//! to the final commits — relative distances between members are preserved
//! no matter how many frames the anchor moved. Group moves never rotate
//! members.

use crate::commit::CommitRequest;
use crate::frame::{EulerDeg, Point3, Pose, ReferenceFrame, Vec3};
use crate::query::{CollisionQuery, LayerMask};
use crate::session::{ActorId, ObjectHandle, SceneObjects, SessionError};

/// Lift applied above the aimed surface so previews do not clip into it.
pub const ANCHOR_CLEARANCE: f32 = 0.01;

/// Forward aim-ray reach.
pub const AIM_RAY_RANGE: f32 = 6.0;

/// Reach of the downward fallback ray cast from the aim ray's endpoint.
pub const GROUND_PROBE_RANGE: f32 = 20.0;

/// One group member with its captured placement data.
#[derive(Debug, Clone)]
pub struct GroupMember {
    pub handle: ObjectHandle,
    /// Offset from the group centroid, in reference-frame-local space.
    pub local_offset: Vec3,
    /// Rotation at pickup; frozen for the whole session.
    pub original_rotation: EulerDeg,
}

/// A set of objects picked up together and dragged by a single anchor.
#[derive(Debug, Clone)]
pub struct GroupSession {
    members: Vec<GroupMember>,
    anchor: Point3,
}

impl GroupSession {
    /// Captures the selection as a rigid group anchored at its centroid.
    ///
    /// An empty selection is rejected; members whose pose the host cannot
    /// resolve are skipped, and a selection where nothing resolves is
    /// rejected the same way.
    pub fn start(
        selection: &[ObjectHandle],
        objects: &dyn SceneObjects,
        frame: &dyn ReferenceFrame,
    ) -> Result<Self, SessionError> {
        if selection.is_empty() {
            tracing::warn!("[group] start refused: selection is empty");
            return Err(SessionError::EmptySelection);
        }

        let mut resolved = Vec::with_capacity(selection.len());
        for &handle in selection {
            match objects.world_pose(handle) {
                Some(pose) => resolved.push((handle, pose)),
                None => tracing::warn!("[group] skipping unresolvable member {handle}"),
            }
        }
        if resolved.is_empty() {
            tracing::warn!("[group] start refused: no member could be resolved");
            return Err(SessionError::EmptySelection);
        }

        let mut centroid = Vec3::zeros();
        for (_, pose) in &resolved {
            centroid += pose.position.coords;
        }
        #[allow(clippy::cast_precision_loss)]
        let centroid = Point3::from(centroid / resolved.len() as f32);
        let centroid_local = frame.world_to_local(&centroid);

        let members = resolved
            .into_iter()
            .map(|(handle, pose)| GroupMember {
                handle,
                local_offset: frame.world_to_local(&pose.position) - centroid_local,
                original_rotation: pose.rotation,
            })
            .collect();

        Ok(Self {
            members,
            anchor: centroid,
        })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    /// Current drag point, world space.
    pub fn anchor(&self) -> &Point3 {
        &self.anchor
    }

    /// Moves the anchor to the aimed surface point: a forward ray first,
    /// then a downward ray from the forward ray's endpoint. The anchor is
    /// lifted by a small fixed clearance and never rotated.
    ///
    /// Returns false (anchor unchanged) when neither ray hits.
    pub fn update_anchor(
        &mut self,
        aim_origin: &Point3,
        aim_dir: &Vec3,
        scene: &dyn CollisionQuery,
        mask: LayerMask,
    ) -> bool {
        let Some(point) = resolve_anchor_point(scene, aim_origin, aim_dir, mask) else {
            return false;
        };
        self.anchor = point + Vec3::y() * ANCHOR_CLEARANCE;
        true
    }

    /// World pose of every member at the current anchor: the anchor goes to
    /// frame-local space, each captured offset is added, and the sum comes
    /// back to world space. Rotations are the captured originals.
    pub fn member_world_poses(&self, frame: &dyn ReferenceFrame) -> Vec<(ObjectHandle, Pose)> {
        let anchor_local = frame.world_to_local(&self.anchor);
        self.members
            .iter()
            .map(|member| {
                let position = frame.local_to_world(&(anchor_local + member.local_offset));
                (
                    member.handle,
                    Pose::new(position, member.original_rotation),
                )
            })
            .collect()
    }

    /// One commit request per member at the current anchor.
    pub fn confirm(&self, frame: &dyn ReferenceFrame, actor: ActorId) -> Vec<CommitRequest> {
        self.member_world_poses(frame)
            .into_iter()
            .map(|(handle, pose)| CommitRequest {
                target: handle,
                final_position: pose.position,
                final_rotation_euler: pose.rotation,
                requesting_actor: actor,
            })
            .collect()
    }
}

/// Aimed surface point: forward ray up to [`AIM_RAY_RANGE`], else a downward
/// ray from the forward ray's endpoint up to [`GROUND_PROBE_RANGE`].
pub fn resolve_anchor_point(
    scene: &dyn CollisionQuery,
    aim_origin: &Point3,
    aim_dir: &Vec3,
    mask: LayerMask,
) -> Option<Point3> {
    let len = aim_dir.norm();
    if len <= f32::EPSILON {
        return None;
    }
    let dir = aim_dir / len;

    if let Some(hit) = scene.raycast(aim_origin, &dir, AIM_RAY_RANGE, mask) {
        return Some(hit.point);
    }

    let probe_origin = *aim_origin + dir * AIM_RAY_RANGE;
    scene
        .raycast(&probe_origin, &-Vec3::y(), GROUND_PROBE_RANGE, mask)
        .map(|hit| hit.point)
}
