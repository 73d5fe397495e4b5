//! `dc-policy`: the decision logic of the deconfliction controller.
//!
//! Every function and trait method in this crate is pure: no I/O, no
//! interior mutability, identical inputs always give identical outputs.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`steering`]   | `SteeringPolicy` trait, `BoundarySteering`, `steer`          |
//! | [`detector`]   | `ConflictState`, `ConflictPair`, `detect`, `scan_pairs`      |
//! | [`index`]      | `ProximityIndex`: R-tree radius queries for many agents     |
//! | [`resolver`]   | `ConflictResolver` trait, `PriorityYield`, `merge_resolutions` |
//!
//! # Decision pipeline
//!
//! 1. **Steer**: each agent gets a baseline command from its own pose and
//!    the arena bounds, independent of every other agent.
//! 2. **Detect**: the latest known poses are scanned for pairs closer than
//!    the conflict threshold.
//! 3. **Resolve**: for every conflicting pair the lower-precedence agent is
//!    stopped and the other advances; the override replaces the baseline.

pub mod detector;
pub mod index;
pub mod resolver;
pub mod steering;

#[cfg(test)]
mod tests;

pub use detector::{ConflictPair, ConflictState, detect, scan_pairs};
pub use index::ProximityIndex;
pub use resolver::{ConflictResolver, Contender, PriorityYield, Resolution, merge_resolutions};
pub use steering::{BoundarySteering, SteeringPolicy, steer};
