//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `DcError` as one variant
//! via `From`, so `?` works across crate boundaries.

use thiserror::Error;

use crate::{AgentId, Pose};

/// The top-level error type for `dc-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DcError {
    /// A pose update referenced an agent that was never registered.
    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    /// A pose update carried a NaN or infinite coordinate or heading.
    #[error("non-finite pose {1} for {0}")]
    InvalidPose(AgentId, Pose),

    /// A pose update referenced an agent name that was never registered.
    #[error("unknown agent name {0:?}")]
    UnknownAgentName(String),

    #[error("agent name {0:?} registered twice")]
    DuplicateAgent(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `dc-*` crates.
pub type DcResult<T> = Result<T, DcError>;
