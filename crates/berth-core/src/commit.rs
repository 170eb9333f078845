//! Final placement hand-off to the external commit authority.
//!
//! The hand-off is one-way and fire-and-forget: the core never waits for an
//! acknowledgment and never rolls back local state. Confirm is terminal.

use serde::{Deserialize, Serialize};

use crate::frame::{EulerDeg, Point3};
use crate::session::{ActorId, ObjectHandle};

/// One finalized placement, ready to be made durable by the authority.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommitRequest {
    pub target: ObjectHandle,
    pub final_position: Point3,
    pub final_rotation_euler: EulerDeg,
    pub requesting_actor: ActorId,
}

/// External service that applies committed placements asynchronously.
pub trait CommitAuthority {
    fn commit(&mut self, request: CommitRequest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes() {
        let request = CommitRequest {
            target: 7,
            final_position: Point3::new(1.0, 0.0, -2.5),
            final_rotation_euler: EulerDeg::yaw_only(90.0),
            requesting_actor: 3,
        };

        let json = serde_json::to_string(&request).unwrap();
        let back: CommitRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
