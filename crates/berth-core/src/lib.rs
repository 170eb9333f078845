//! Berth Core Library
//!
//! Runtime core of an interactive 3D object-placement tool: per-frame snap
//! resolution against a moving reference frame, physical validity checks
//! through an injected collision query provider, multiplicative preview
//! scaling, and single-object or rigid-group placement sessions ending in a
//! fire-and-forget commit.
//!
//! The crate is a library consumed by a host frame loop. The host supplies
//! the collision queries, the scene-graph reads, the reference frame and the
//! commit authority; this core owns the decision logic in between.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod commit;
pub mod config;
pub mod frame;
pub mod group;
pub mod hud;
pub mod query;
pub mod scale;
pub mod scene;
pub mod selection;
pub mod session;
pub mod snap;
pub mod validity;
pub mod viz;

pub use commit::{CommitAuthority, CommitRequest};
pub use config::{ConfigEntry, ConfigError, ConfigStore, ConfigValue, ScaleConfig, SnapConfig};
pub use frame::{EulerDeg, FixedFrame, Iso, Point3, Pose, Quat, ReferenceFrame, Vec3};
pub use group::{GroupMember, GroupSession};
pub use hud::{HudSink, NullHud};
pub use query::{BuildVolume, ColliderRef, CollisionQuery, LayerMask, RayHit};
pub use scale::ScaleController;
pub use scene::StaticScene;
pub use selection::{PickOutcome, SelectionSet};
pub use session::{
    ActiveSession, ActorId, FrameOutput, ObjectHandle, PlaceableSpec, PlacementController,
    PlacementSession, SceneObjects, SessionError,
};
pub use validity::{PlacementProbe, ValidityResult};
