//! `dc-core`: foundational types for the deconfliction controller.
//!
//! This crate is a dependency of every other `dc-*` crate.  It has no `dc-*`
//! dependencies and a single required external one (`thiserror`), plus
//! optional `serde`.
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `AgentId`                                              |
//! | [`geometry`] | `Pose`, `VelocityCommand`                              |
//! | [`arena`]    | `Arena` bounds and the boundary-band test              |
//! | [`config`]   | `SpeedProfile`, `DeconflictionConfig`                  |
//! | [`error`]    | `DcError`, `DcResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod arena;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use arena::Arena;
pub use config::{DeconflictionConfig, SpeedProfile};
pub use error::{DcError, DcResult};
pub use geometry::{Pose, VelocityCommand};
pub use ids::AgentId;
