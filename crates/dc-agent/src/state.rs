//! Per-agent state and static priority.

use std::fmt;

use dc_core::{Pose, VelocityCommand};

// ── Priority ──────────────────────────────────────────────────────────────────

/// Static right-of-way rank fixed at registration time.
///
/// During a conflict the agent with the **lower** priority yields.  Equal
/// priorities are broken by registration order: the earlier-registered agent
/// yields.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Priority(pub u32);

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

// ── AgentState ────────────────────────────────────────────────────────────────

/// Everything the store knows about an agent that has reported at least once.
///
/// `previous_pose` is kept for diagnostics and telemetry only; no control
/// decision reads it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    /// Most recent pose received for this agent.
    pub current_pose: Pose,

    /// The pose that `current_pose` replaced.  `None` after the first report.
    pub previous_pose: Option<Pose>,

    /// The command most recently emitted for this agent.  `None` until the
    /// controller has emitted one.
    pub last_command: Option<VelocityCommand>,

    /// Number of pose updates received.
    pub updates: u64,
}

impl AgentState {
    /// State after the very first report.
    #[inline]
    pub fn first(pose: Pose) -> Self {
        Self {
            current_pose:  pose,
            previous_pose: None,
            last_command:  None,
            updates:       1,
        }
    }

    /// Shift `current_pose` into `previous_pose` and store `pose`.
    #[inline]
    pub fn advance(&mut self, pose: Pose) {
        self.previous_pose = Some(self.current_pose);
        self.current_pose = pose;
        self.updates += 1;
    }

    /// Distance travelled between the previous and current report.
    ///
    /// Returns `0.0` after the first report.
    pub fn displacement(&self) -> f64 {
        self.previous_pose
            .map(|prev| prev.distance_to(&self.current_pose))
            .unwrap_or(0.0)
    }
}
