//! Command emission.
//!
//! The controller never waits on a sink: `send` is fire-and-forget and the
//! control loop does not observe delivery.

use crossbeam_channel::{Sender, TrySendError};
use dc_core::{AgentId, VelocityCommand};
use log::warn;

/// Outbound channel for velocity commands, one per call.
pub trait CommandSink {
    fn send(&mut self, agent: AgentId, command: VelocityCommand);
}

impl<K: CommandSink + ?Sized> CommandSink for &mut K {
    #[inline]
    fn send(&mut self, agent: AgentId, command: VelocityCommand) {
        (**self).send(agent, command);
    }
}

impl<K: CommandSink + ?Sized> CommandSink for Box<K> {
    #[inline]
    fn send(&mut self, agent: AgentId, command: VelocityCommand) {
        (**self).send(agent, command);
    }
}

// ── RecordingSink ─────────────────────────────────────────────────────────────

/// Keeps every emitted command in order.  Used by tests and the demo.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub sent: Vec<(AgentId, VelocityCommand)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent command sent to `agent`.
    pub fn last_for(&self, agent: AgentId) -> Option<VelocityCommand> {
        self.sent
            .iter()
            .rev()
            .find(|(id, _)| *id == agent)
            .map(|(_, cmd)| *cmd)
    }

    /// All commands sent to `agent`, oldest first.
    pub fn commands_for(&self, agent: AgentId) -> Vec<VelocityCommand> {
        self.sent
            .iter()
            .filter(|(id, _)| *id == agent)
            .map(|(_, cmd)| *cmd)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl CommandSink for RecordingSink {
    fn send(&mut self, agent: AgentId, command: VelocityCommand) {
        self.sent.push((agent, command));
    }
}

// ── ChannelSink ───────────────────────────────────────────────────────────────

/// Forwards commands into a crossbeam channel without blocking.
///
/// A full or disconnected channel drops the command with a warning; the next
/// decision for that agent supersedes it anyway.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx:      Sender<(AgentId, VelocityCommand)>,
    dropped: u64,
}

impl ChannelSink {
    pub fn new(tx: Sender<(AgentId, VelocityCommand)>) -> Self {
        Self { tx, dropped: 0 }
    }

    /// Number of commands dropped so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl CommandSink for ChannelSink {
    fn send(&mut self, agent: AgentId, command: VelocityCommand) {
        match self.tx.try_send((agent, command)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                warn!("command channel full, dropped {command} for {agent}");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                warn!("command channel closed, dropped {command} for {agent}");
            }
        }
    }
}
