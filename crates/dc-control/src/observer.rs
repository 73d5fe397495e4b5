//! Controller observer trait for telemetry and diagnostics.

use dc_agent::{AgentState, PoseStore};
use dc_core::{AgentId, DcError};

use crate::{ControlMode, Decision, ServiceError};

/// Callbacks invoked by [`DeconflictionController::process`] and the
/// runtime around each pose update.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers never influence decisions.
///
/// # Example: conflict counter
///
/// ```rust,ignore
/// struct ConflictCounter { entered: u64 }
///
/// impl ControllerObserver for ConflictCounter {
///     fn on_transition(&mut self, _from: ControlMode, to: ControlMode, _seq: u64) {
///         if to == ControlMode::Conflict {
///             self.entered += 1;
///         }
///     }
/// }
/// ```
///
/// [`DeconflictionController::process`]: crate::DeconflictionController::process
pub trait ControllerObserver {
    /// Called after the store accepted a pose, before commands are emitted.
    fn on_update(&mut self, _agent: AgentId, _state: &AgentState) {}

    /// Called after every command of `decision` has been handed to the sink.
    ///
    /// `store` reflects the state after the update, including the recorded
    /// `last_command` of every commanded agent.
    fn on_decision(&mut self, _decision: &Decision, _store: &PoseStore) {}

    /// Called when the controller switches between CLEAR and CONFLICT.
    fn on_transition(&mut self, _from: ControlMode, _to: ControlMode, _seq: u64) {}

    /// Called when an update is rejected (e.g. an unregistered agent).
    fn on_rejected(&mut self, _error: &DcError) {}

    /// Called when an external collaborator reports a failure.
    fn on_service_failure(&mut self, _error: &ServiceError) {}
}

/// A [`ControllerObserver`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ControllerObserver for NoopObserver {}

impl<O: ControllerObserver + ?Sized> ControllerObserver for &mut O {
    fn on_update(&mut self, agent: AgentId, state: &AgentState) {
        (**self).on_update(agent, state);
    }

    fn on_decision(&mut self, decision: &Decision, store: &PoseStore) {
        (**self).on_decision(decision, store);
    }

    fn on_transition(&mut self, from: ControlMode, to: ControlMode, seq: u64) {
        (**self).on_transition(from, to, seq);
    }

    fn on_rejected(&mut self, error: &DcError) {
        (**self).on_rejected(error);
    }

    fn on_service_failure(&mut self, error: &ServiceError) {
        (**self).on_service_failure(error);
    }
}
