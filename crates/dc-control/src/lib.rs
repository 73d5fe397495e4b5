//! `dc-control`: the deconfliction control loop.
//!
//! # Per-update pipeline
//!
//! ```text
//! on pose (agent X):
//!   ① Store     : PoseStore::update(X, pose); unknown X → UnknownAgent
//!   ② Steer     : baseline command for X from its own pose + arena
//!   ③ Detect    : scan the latest known poses for pairs under the threshold
//!   ④ Resolve   : CONFLICT: yield overrides for every agent in a pair
//!                 CLEAR:    X's baseline only
//!   ⑤ Emit      : commands go to the CommandSink, fire-and-forget
//! ```
//!
//! # Crate layout
//!
//! | Module         | Contents                                                       |
//! |----------------|----------------------------------------------------------------|
//! | [`controller`] | `DeconflictionController`, `Decision`, `ControlMode`           |
//! | [`builder`]    | `ControllerBuilder`: registration, spawns, pens, policies     |
//! | [`observer`]   | `ControllerObserver` hooks, `NoopObserver`                     |
//! | [`sink`]       | `CommandSink`, `RecordingSink`, `ChannelSink`                  |
//! | [`services`]   | Provisioning / pen-styling collaborators, `ServiceDispatcher`  |
//! | [`runtime`]    | `ControllerHandle`: serialized single-consumer update queue   |
//! | [`error`]      | `ControlError`, `ServiceError`, `ControlResult<T>`             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dc_control::{ControllerBuilder, NoopObserver, RecordingSink};
//! use dc_core::{DeconflictionConfig, Pose};
//!
//! let mut controller = ControllerBuilder::new(DeconflictionConfig::default())
//!     .agent("turtle1")
//!     .spawn("turtle2", Pose::new(3.0, 3.0, 0.0))
//!     .build()?;
//! let mut sink = RecordingSink::default();
//! let id = controller.store.lookup("turtle1").unwrap();
//! controller.process(id, Pose::new(5.0, 5.0, 0.0), &mut sink, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod controller;
pub mod error;
pub mod observer;
pub mod runtime;
pub mod services;
pub mod sink;


pub use builder::ControllerBuilder;
pub use controller::{ControlMode, Decision, DeconflictionController};
pub use error::{ControlError, ControlResult, ServiceError};
pub use observer::{ControllerObserver, NoopObserver};
pub use runtime::{ControllerHandle, PoseSender, RuntimeConfig, Stopped};
pub use services::{
    LogOnly, PenRequest, PenStyle, PenStyler, Provisioner, ServiceDispatcher, SpawnRequest,
};
pub use sink::{ChannelSink, CommandSink, RecordingSink};
