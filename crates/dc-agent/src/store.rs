//! `PoseStore`: agent registry plus the latest known state of each agent.
//!
//! # Layout
//!
//! Registration assigns dense `AgentId`s (`0, 1, 2, …`) and every per-agent
//! `Vec` is indexed by `id.index()`:
//!
//! ```ignore
//! let pose = store.states[agent.index()].map(|s| s.current_pose);
//! ```
//!
//! An agent is *registered* from the moment it is added (pre-existing or
//! spawned) and *known* from its first pose report.  Only known agents take
//! part in detection; only registered agents may report.

use std::collections::HashMap;

use dc_core::{AgentId, DcError, DcResult, Pose, VelocityCommand};
use log::debug;

use crate::{AgentState, Priority};

/// Registry and latest-pose storage for all tracked agents.
#[derive(Debug, Default, Clone)]
pub struct PoseStore {
    /// Number of registered agents.  Equals the length of every per-agent `Vec`.
    pub count: usize,

    names:        Vec<String>,
    priorities:   Vec<Priority>,
    states:       Vec<Option<AgentState>>,
    /// Agents in the order of their first report.
    report_order: Vec<AgentId>,
    by_name:      HashMap<String, AgentId>,
}

impl PoseStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register `name` with a static `priority` and return its new id.
    ///
    /// # Errors
    ///
    /// `DcError::DuplicateAgent` if the name is already registered.
    pub fn register(&mut self, name: &str, priority: Priority) -> DcResult<AgentId> {
        if self.by_name.contains_key(name) {
            return Err(DcError::DuplicateAgent(name.to_owned()));
        }
        let id = AgentId::try_from(self.count)
            .map_err(|_| DcError::Config("agent id space exhausted".into()))?;

        self.names.push(name.to_owned());
        self.priorities.push(priority);
        self.states.push(None);
        self.by_name.insert(name.to_owned(), id);
        self.count += 1;

        debug!("registered agent {name:?} as {id} with priority {priority}");
        Ok(id)
    }

    /// `true` if `agent` was registered (whether or not it has reported).
    #[inline]
    pub fn is_registered(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    /// Resolve a registered agent name.
    pub fn lookup(&self, name: &str) -> Option<AgentId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, agent: AgentId) -> Option<&str> {
        self.names.get(agent.index()).map(String::as_str)
    }

    pub fn priority(&self, agent: AgentId) -> Option<Priority> {
        self.priorities.get(agent.index()).copied()
    }

    /// Total right-of-way ordering key: `(priority, id)`.
    ///
    /// The smaller key yields.  Including the id makes equal priorities
    /// resolve to "earlier-registered yields".
    pub fn precedence(&self, agent: AgentId) -> Option<(Priority, AgentId)> {
        self.priority(agent).map(|p| (p, agent))
    }

    /// Iterator over all registered ids in ascending order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    // ── Pose updates ──────────────────────────────────────────────────────

    /// Record `pose` as the agent's current pose, shifting the prior current
    /// pose into `previous_pose`, and return the updated state.
    ///
    /// # Errors
    ///
    /// - `DcError::UnknownAgent` if `agent` was never registered.
    /// - `DcError::InvalidPose` if any field of `pose` is NaN or infinite.
    ///
    /// The store is left untouched in both cases.
    pub fn update(&mut self, agent: AgentId, pose: Pose) -> DcResult<AgentState> {
        let slot = self
            .states
            .get_mut(agent.index())
            .ok_or(DcError::UnknownAgent(agent))?;
        if !pose.is_finite() {
            return Err(DcError::InvalidPose(agent, pose));
        }

        let state = match slot {
            Some(state) => {
                state.advance(pose);
                *state
            }
            None => {
                let state = AgentState::first(pose);
                *slot = Some(state);
                self.report_order.push(agent);
                state
            }
        };
        Ok(state)
    }

    /// Remember the command just emitted for `agent`.
    ///
    /// Ignored for agents that have not reported yet: no command is ever
    /// emitted for them.
    pub fn record_command(&mut self, agent: AgentId, command: VelocityCommand) {
        if let Some(Some(state)) = self.states.get_mut(agent.index()) {
            state.last_command = Some(command);
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// Latest known pose, or `None` if the agent has not reported (or is
    /// not registered).
    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<Pose> {
        self.state(agent).map(|s| s.current_pose)
    }

    pub fn state(&self, agent: AgentId) -> Option<&AgentState> {
        self.states.get(agent.index()).and_then(Option::as_ref)
    }

    /// `(id, latest pose)` for every agent that has reported, in order of
    /// first report.
    pub fn all_known_poses(&self) -> Vec<(AgentId, Pose)> {
        self.report_order
            .iter()
            .filter_map(|&id| self.get(id).map(|pose| (id, pose)))
            .collect()
    }

    /// Number of agents that have reported at least once.
    #[inline]
    pub fn known_count(&self) -> usize {
        self.report_order.len()
    }

    /// `true` if no agent is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
