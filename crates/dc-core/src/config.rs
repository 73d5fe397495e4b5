//! Controller configuration.
//!
//! All values are supplied once at construction time; there is no runtime
//! reconfiguration.  The defaults reproduce the reference two-agent arena:
//!
//! | Field                   | Default              |
//! |-------------------------|----------------------|
//! | `arena`                 | `[0,11] × [0,11]`, margin 2 |
//! | `conflict_threshold`    | 1.0                  |
//! | `speeds.cruise_linear`  | 2.0                  |
//! | `speeds.turn_linear`    | 1.0                  |
//! | `speeds.turn_angular`   | 0.9                  |
//!
//! With the `serde` feature every field is optional in a config file and
//! falls back to its default.

use crate::{Arena, DcError, DcResult, VelocityCommand};

// ── SpeedProfile ──────────────────────────────────────────────────────────────

/// Speed constants used by steering and conflict resolution.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpeedProfile {
    /// Forward speed while the agent is clear of the boundary band.
    pub cruise_linear: f64,
    /// Forward speed while curving away from an edge.
    pub turn_linear: f64,
    /// Yaw rate while curving away from an edge.
    pub turn_angular: f64,
}

impl SpeedProfile {
    /// `{cruise_linear, 0}`: straight ahead.
    #[inline]
    pub fn cruise(&self) -> VelocityCommand {
        VelocityCommand::straight(self.cruise_linear)
    }

    /// `{turn_linear, turn_angular}`: curve away from an edge.
    #[inline]
    pub fn turn(&self) -> VelocityCommand {
        VelocityCommand::new(self.turn_linear, self.turn_angular)
    }

    pub fn validate(&self) -> DcResult<()> {
        let all = [self.cruise_linear, self.turn_linear, self.turn_angular];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(DcError::Config("speed constants must be finite".into()));
        }
        Ok(())
    }
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self {
            cruise_linear: 2.0,
            turn_linear:   1.0,
            turn_angular:  0.9,
        }
    }
}

// ── DeconflictionConfig ───────────────────────────────────────────────────────

/// Top-level controller configuration.
///
/// Typically built in code or loaded from a JSON file by the application
/// crate and handed to the controller builder.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeconflictionConfig {
    /// Operating region and boundary band.
    pub arena: Arena,

    /// Two agents closer than this (strictly) are in conflict.
    pub conflict_threshold: f64,

    /// Cruise / turn speed constants.
    pub speeds: SpeedProfile,
}

impl DeconflictionConfig {
    /// Check every field; called by the controller builder.
    pub fn validate(&self) -> DcResult<()> {
        self.arena.validate()?;
        self.speeds.validate()?;
        if !self.conflict_threshold.is_finite() || self.conflict_threshold <= 0.0 {
            return Err(DcError::Config(format!(
                "conflict threshold must be positive and finite, got {}",
                self.conflict_threshold
            )));
        }
        Ok(())
    }
}

impl Default for DeconflictionConfig {
    fn default() -> Self {
        Self {
            arena:              Arena::default(),
            conflict_threshold: 1.0,
            speeds:             SpeedProfile::default(),
        }
    }
}
