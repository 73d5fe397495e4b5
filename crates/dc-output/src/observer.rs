//! `TelemetryObserver<W>`: bridges `ControllerObserver` to an `OutputWriter`.

use dc_agent::PoseStore;
use dc_control::{ControlMode, ControllerObserver, Decision, ServiceError};
use dc_core::DcError;

use crate::row::{CommandRow, ConflictRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`ControllerObserver`] that writes every emitted command and every
/// conflicting pair to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  Check for them with [`take_error`][Self::take_error].
pub struct TelemetryObserver<W: OutputWriter> {
    writer:      W,
    last_error:  Option<OutputError>,
    decisions:   u64,
    transitions: u64,
    rejected:    u64,
    failures:    u64,
}

impl<W: OutputWriter> TelemetryObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_error:  None,
            decisions:   0,
            transitions: 0,
            rejected:    0,
            failures:    0,
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files afterwards).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Decisions recorded so far.
    pub fn decisions(&self) -> u64 {
        self.decisions
    }

    /// Mode transitions seen so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Updates the controller rejected.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Collaborator failures reported.
    pub fn service_failures(&self) -> u64 {
        self.failures
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> ControllerObserver for TelemetryObserver<W> {
    fn on_decision(&mut self, decision: &Decision, store: &PoseStore) {
        self.decisions += 1;

        let rows: Vec<CommandRow> = decision
            .commands
            .iter()
            .filter_map(|&(agent, cmd)| {
                let state = store.state(agent)?;
                let prev = state.previous_pose;
                Some(CommandRow {
                    seq:           decision.seq,
                    source:        decision.agent.0,
                    agent:         agent.0,
                    name:          store.name(agent).unwrap_or_default().to_owned(),
                    mode:          decision.mode.as_str(),
                    x:             state.current_pose.x,
                    y:             state.current_pose.y,
                    heading:       state.current_pose.heading,
                    prev_x:        prev.map(|p| p.x),
                    prev_y:        prev.map(|p| p.y),
                    prev_heading:  prev.map(|p| p.heading),
                    linear_speed:  cmd.linear_speed,
                    angular_speed: cmd.angular_speed,
                    resolved:      decision.mode == ControlMode::Conflict
                        && decision.conflicts.iter().any(|pair| pair.involves(agent)),
                })
            })
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_commands(&rows);
            self.store_err(result);
        }

        if !decision.conflicts.is_empty() {
            let rows: Vec<ConflictRow> = decision
                .conflicts
                .iter()
                .map(|pair| ConflictRow {
                    seq:      decision.seq,
                    agent_a:  pair.a.0,
                    agent_b:  pair.b.0,
                    distance: pair.distance,
                })
                .collect();
            let result = self.writer.write_conflicts(&rows);
            self.store_err(result);
        }
    }

    fn on_transition(&mut self, _from: ControlMode, _to: ControlMode, _seq: u64) {
        self.transitions += 1;
    }

    fn on_rejected(&mut self, _error: &DcError) {
        self.rejected += 1;
    }

    fn on_service_failure(&mut self, _error: &ServiceError) {
        self.failures += 1;
    }
}
