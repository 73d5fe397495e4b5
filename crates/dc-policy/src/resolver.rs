//! Yield-based conflict resolution.
//!
//! # Policy
//!
//! Letting both agents run their own avoidance manoeuvre risks a symmetric
//! dance where both curve the same way and meet again.  Instead one agent is
//! stopped outright and the other advances straight ahead at cruise speed.
//! Which one yields is decided purely by the static precedence fixed at
//! registration, so the same conflict always resolves the same way.
//!
//! The override fully replaces the baseline steering command of both agents
//! for as long as the conflict lasts; once the pair separates, control
//! returns to steering on the next update.  The resolver keeps no state
//! between updates.

use std::collections::HashMap;

use dc_agent::Priority;
use dc_core::{AgentId, SpeedProfile, VelocityCommand};

use crate::ConflictState;

/// One side of a conflicting pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Contender {
    pub agent:    AgentId,
    pub priority: Priority,
}

impl Contender {
    pub fn new(agent: AgentId, priority: Priority) -> Self {
        Self { agent, priority }
    }

    /// Total ordering key.  The smaller key yields; equal priorities fall
    /// back to the id, so the earlier-registered agent yields.
    #[inline]
    pub fn precedence(&self) -> (Priority, AgentId) {
        (self.priority, self.agent)
    }
}

/// Override commands for one conflicting pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resolution {
    pub yielding:        AgentId,
    pub yield_command:   VelocityCommand,
    pub advancing:       AgentId,
    pub advance_command: VelocityCommand,
}

/// Decides the override commands for a pair in conflict.
///
/// Returns `None` when `state.in_conflict` is false: outside a conflict the
/// baseline commands stand untouched.
pub trait ConflictResolver: Send + Sync + 'static {
    fn resolve(&self, a: Contender, b: Contender, state: &ConflictState) -> Option<Resolution>;
}

/// Lower precedence stops, higher precedence advances at cruise speed.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PriorityYield {
    pub speeds: SpeedProfile,
}

impl PriorityYield {
    pub fn new(speeds: SpeedProfile) -> Self {
        Self { speeds }
    }
}

impl ConflictResolver for PriorityYield {
    fn resolve(&self, a: Contender, b: Contender, state: &ConflictState) -> Option<Resolution> {
        if !state.in_conflict {
            return None;
        }
        let (yielding, advancing) = if a.precedence() < b.precedence() { (a, b) } else { (b, a) };
        Some(Resolution {
            yielding:        yielding.agent,
            yield_command:   VelocityCommand::STOP,
            advancing:       advancing.agent,
            advance_command: self.speeds.cruise(),
        })
    }
}

/// Fold per-pair resolutions into one command per involved agent.
///
/// An agent that yields in any pair keeps its yield command even if it wins
/// another pair.  Agents appear in the order they are first mentioned, each
/// pair contributing its yielding agent before its advancing one.
pub fn merge_resolutions(resolutions: &[Resolution]) -> Vec<(AgentId, VelocityCommand)> {
    let mut commands: Vec<(AgentId, VelocityCommand)> = Vec::new();
    let mut slot: HashMap<AgentId, (usize, bool)> = HashMap::new();

    for r in resolutions {
        match slot.get(&r.yielding) {
            Some(&(i, false)) => {
                commands[i].1 = r.yield_command;
                slot.insert(r.yielding, (i, true));
            }
            Some(_) => {}
            None => {
                slot.insert(r.yielding, (commands.len(), true));
                commands.push((r.yielding, r.yield_command));
            }
        }
        if !slot.contains_key(&r.advancing) {
            slot.insert(r.advancing, (commands.len(), false));
            commands.push((r.advancing, r.advance_command));
        }
    }
    commands
}
