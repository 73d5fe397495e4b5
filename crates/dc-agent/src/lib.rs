//! `dc-agent`: agent registry and latest-pose storage.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`state`]     | `AgentState` (current / previous pose, last command), `Priority` |
//! | [`store`]     | `PoseStore`, registry plus per-agent latest state         |
//! | [`builder`]   | `PoseStoreBuilder` (fluent registration)                   |
//!
//! # Ownership
//!
//! `PoseStore` is owned by exactly one controller and mutated only through
//! `&mut PoseStore`, so two updates for the same agent can never race.  Hosts
//! that receive poses on several threads serialize them before they reach
//! the store (see `dc-control::ControllerHandle`).

pub mod builder;
pub mod state;
pub mod store;


pub use builder::PoseStoreBuilder;
pub use state::{AgentState, Priority};
pub use store::PoseStore;
