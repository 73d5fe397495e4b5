//! Boundary-avoidance steering.

use dc_core::{Arena, Pose, SpeedProfile, VelocityCommand};

/// Maps one agent's pose to a baseline velocity command.
///
/// Implementations must be stateless: the same pose and arena always give
/// the same command.  The controller may call `steer` for any agent at any
/// time, so state that varies per agent has no place in the policy.
pub trait SteeringPolicy: Send + Sync + 'static {
    fn steer(&self, pose: &Pose, arena: &Arena) -> VelocityCommand;
}

/// Curve away from the edge inside the boundary band, drive straight
/// otherwise.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoundarySteering {
    pub speeds: SpeedProfile,
}

impl BoundarySteering {
    pub fn new(speeds: SpeedProfile) -> Self {
        Self { speeds }
    }
}

impl SteeringPolicy for BoundarySteering {
    #[inline]
    fn steer(&self, pose: &Pose, arena: &Arena) -> VelocityCommand {
        steer(pose, arena, &self.speeds)
    }
}

/// `speeds.turn()` on or beyond the boundary band, `speeds.cruise()` strictly
/// inside it.
#[inline]
pub fn steer(pose: &Pose, arena: &Arena, speeds: &SpeedProfile) -> VelocityCommand {
    if arena.is_near_boundary(pose) {
        speeds.turn()
    } else {
        speeds.cruise()
    }
}
