use dc_core::{AgentId, DcError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    /// Rejected update or invalid construction input.
    #[error(transparent)]
    Core(#[from] DcError),

    #[error("pose queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("controller runtime has shut down")]
    Disconnected,

    #[error("failed to start {what} thread: {source}")]
    Spawn {
        what:   &'static str,
        source: std::io::Error,
    },

    #[error("{what} thread panicked")]
    WorkerPanicked { what: &'static str },
}

impl ControlError {
    /// The unregistered agent, if this is an `UnknownAgent` rejection.
    pub fn unknown_agent(&self) -> Option<AgentId> {
        match self {
            ControlError::Core(DcError::UnknownAgent(agent)) => Some(*agent),
            _ => None,
        }
    }
}

pub type ControlResult<T> = Result<T, ControlError>;

/// Failures reported by external collaborators.
///
/// Never returned from the control path: they are logged and handed to
/// `ControllerObserver::on_service_failure`, and the loop carries on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("provisioning {name:?} failed: {reason}")]
    ProvisioningFailed { name: String, reason: String },

    #[error("styling {name:?} failed: {reason}")]
    StylingFailed { name: String, reason: String },
}
