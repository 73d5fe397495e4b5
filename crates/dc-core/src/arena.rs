//! The bounded rectangular arena agents operate in.
//!
//! # Boundary band
//!
//! The arena carries an inner `margin`.  A pose is *near the boundary* when
//! it lies within `margin` of any edge, or outside the arena altogether:
//!
//!   x >= x_max - margin  or  x <= x_min + margin
//!   y >= y_max - margin  or  y <= y_min + margin
//!
//! Comparisons are inclusive, so a pose sitting exactly on the band line
//! counts as near the boundary and the steering decision does not flip back
//! and forth across it.

use crate::{DcError, DcResult, Pose};

/// Rectangular bounds `[x_min, x_max] × [y_min, y_max]` plus an inner margin.
///
/// Constant for the lifetime of a controller.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Arena {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Width of the boundary band measured inward from every edge.
    pub margin: f64,
}

impl Arena {
    /// Build and validate an arena.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64, margin: f64) -> DcResult<Self> {
        let arena = Self { x_min, x_max, y_min, y_max, margin };
        arena.validate()?;
        Ok(arena)
    }

    /// Square arena `[0, side] × [0, side]`.
    pub fn square(side: f64, margin: f64) -> DcResult<Self> {
        Self::new(0.0, side, 0.0, side, margin)
    }

    /// Reject non-finite or inverted bounds and negative margins.
    pub fn validate(&self) -> DcResult<()> {
        let all = [self.x_min, self.x_max, self.y_min, self.y_max, self.margin];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(DcError::Config("arena bounds and margin must be finite".into()));
        }
        if self.x_min >= self.x_max || self.y_min >= self.y_max {
            return Err(DcError::Config(format!(
                "arena bounds are inverted or empty: x [{}, {}], y [{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        if self.margin < 0.0 {
            return Err(DcError::Config(format!("arena margin {} is negative", self.margin)));
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Centre point of the arena with heading 0.
    pub fn center(&self) -> Pose {
        Pose::new(
            self.x_min + self.width() * 0.5,
            self.y_min + self.height() * 0.5,
            0.0,
        )
    }

    /// `true` if the position lies inside the outer bounds (inclusive).
    #[inline]
    pub fn contains(&self, pose: &Pose) -> bool {
        pose.x >= self.x_min && pose.x <= self.x_max && pose.y >= self.y_min && pose.y <= self.y_max
    }

    /// `true` if the pose is on or beyond the margin band of any edge.
    #[inline]
    pub fn is_near_boundary(&self, pose: &Pose) -> bool {
        pose.x >= self.x_max - self.margin
            || pose.x <= self.x_min + self.margin
            || pose.y >= self.y_max - self.margin
            || pose.y <= self.y_min + self.margin
    }
}

impl Default for Arena {
    /// The 11 × 11 arena with a 2-unit boundary band.
    fn default() -> Self {
        Self {
            x_min:  0.0,
            x_max:  11.0,
            y_min:  0.0,
            y_max:  11.0,
            margin: 2.0,
        }
    }
}
