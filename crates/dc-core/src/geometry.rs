//! Planar pose and velocity command value types.
//!
//! Both types are plain `Copy` values: a `Pose` is produced by the external
//! pose source and never mutated afterwards, a `VelocityCommand` is computed
//! fresh on every update and never persisted across updates.

use std::fmt;

/// Position and orientation of an agent in the arena plane.
///
/// `heading` is in radians, counter-clockwise from the +x axis.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose {
    #[inline]
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// Euclidean distance between the two positions.  Heading is ignored.
    #[inline]
    pub fn distance_to(&self, other: &Pose) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// `true` if all three components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.heading.is_finite()
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3} rad)", self.x, self.y, self.heading)
    }
}

/// A planar velocity command: forward speed plus yaw rate.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VelocityCommand {
    /// Forward speed in arena units per second.
    pub linear_speed: f64,
    /// Yaw rate in radians per second (positive turns counter-clockwise).
    pub angular_speed: f64,
}

impl VelocityCommand {
    /// Full stop.
    pub const STOP: VelocityCommand = VelocityCommand {
        linear_speed:  0.0,
        angular_speed: 0.0,
    };

    #[inline]
    pub const fn new(linear_speed: f64, angular_speed: f64) -> Self {
        Self { linear_speed, angular_speed }
    }

    /// Drive straight ahead at `linear_speed`.
    #[inline]
    pub const fn straight(linear_speed: f64) -> Self {
        Self { linear_speed, angular_speed: 0.0 }
    }

    #[inline]
    pub fn is_stop(&self) -> bool {
        self.linear_speed == 0.0 && self.angular_speed == 0.0
    }
}

impl fmt::Display for VelocityCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[v={:.2}, w={:.2}]", self.linear_speed, self.angular_speed)
    }
}
