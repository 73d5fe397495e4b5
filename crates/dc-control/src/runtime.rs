//! Serialized runtime: one consumer thread owns the controller.
//!
//! Pose reports may arrive from any number of producer threads through
//! cloned [`PoseSender`]s.  They are queued on a bounded crossbeam channel
//! and applied strictly one at a time, so every update sees the store as
//! left by the previous one and emitted commands never interleave.
//!
//! ```text
//!  producer ─┐
//!  producer ─┼─► bounded queue ─► dc-controller thread ─► CommandSink
//!  producer ─┘                        │
//!                                     └─► ServiceDispatcher (spawn / pen)
//! ```

use std::fmt;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, TrySendError, bounded};
use dc_core::{AgentId, Pose};
use dc_policy::{ConflictResolver, SteeringPolicy};
use log::{debug, info, warn};

use crate::{
    CommandSink, ControlError, ControlResult, ControllerObserver, DeconflictionController,
    ServiceDispatcher,
};

/// Runtime tuning.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Capacity of the pose queue.  Producers block (`send`) or get
    /// `QueueFull` (`try_send`) when it is reached.
    pub queue_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { queue_capacity: 256 }
    }
}

enum Message {
    Pose { agent: AgentId, pose: Pose },
    Shutdown,
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Pose { agent, pose } => write!(f, "Pose({agent}, {pose})"),
            Message::Shutdown => f.write_str("Shutdown"),
        }
    }
}

// ── PoseSender ────────────────────────────────────────────────────────────────

/// Cloneable producer end of the pose queue.
#[derive(Clone, Debug)]
pub struct PoseSender {
    tx:       Sender<Message>,
    capacity: usize,
}

impl PoseSender {
    /// Queue a pose report, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// `ControlError::Disconnected` once the runtime has stopped.
    pub fn send(&self, agent: AgentId, pose: Pose) -> ControlResult<()> {
        self.tx
            .send(Message::Pose { agent, pose })
            .map_err(|_| ControlError::Disconnected)
    }

    /// Queue a pose report without blocking.
    ///
    /// # Errors
    ///
    /// `ControlError::QueueFull` if the queue is at capacity,
    /// `ControlError::Disconnected` once the runtime has stopped.
    pub fn try_send(&self, agent: AgentId, pose: Pose) -> ControlResult<()> {
        match self.tx.try_send(Message::Pose { agent, pose }) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(ControlError::QueueFull { capacity: self.capacity }),
            Err(TrySendError::Disconnected(_)) => Err(ControlError::Disconnected),
        }
    }
}

// ── ControllerHandle ──────────────────────────────────────────────────────────

/// Everything the consumer thread owned, handed back by
/// [`ControllerHandle::shutdown`].
pub struct Stopped<S: SteeringPolicy, R: ConflictResolver, K, O> {
    pub controller: DeconflictionController<S, R>,
    pub sink:       K,
    pub observer:   O,
    /// Pose reports the controller rejected while running.
    pub rejected:   u64,
}

/// Owner of the `dc-controller` consumer thread.
pub struct ControllerHandle<S: SteeringPolicy, R: ConflictResolver, K, O> {
    sender: PoseSender,
    worker: JoinHandle<Stopped<S, R, K, O>>,
}

impl<S, R, K, O> ControllerHandle<S, R, K, O>
where
    S: SteeringPolicy,
    R: ConflictResolver,
    K: CommandSink + Send + 'static,
    O: ControllerObserver + Send + 'static,
{
    /// Move the controller onto a new `dc-controller` thread.
    ///
    /// Requests queued on the controller (startup spawns first, then pens)
    /// go to `services` before the first pose is processed, and again after
    /// every update.  Without a dispatcher they are logged and discarded.
    pub fn start(
        mut controller: DeconflictionController<S, R>,
        mut sink:       K,
        mut observer:   O,
        services:       Option<ServiceDispatcher>,
        config:         RuntimeConfig,
    ) -> ControlResult<Self> {
        let capacity = config.queue_capacity.max(1);
        let (tx, rx) = bounded::<Message>(capacity);

        let worker = thread::Builder::new()
            .name("dc-controller".into())
            .spawn(move || {
                let failures = services.as_ref().map(ServiceDispatcher::failures);
                dispatch_requests(&mut controller, services.as_ref());

                let mut rejected = 0u64;
                for message in rx {
                    match message {
                        Message::Pose { agent, pose } => {
                            if controller.process(agent, pose, &mut sink, &mut observer).is_err() {
                                rejected += 1;
                            }
                            dispatch_requests(&mut controller, services.as_ref());
                        }
                        Message::Shutdown => break,
                    }
                    if let Some(failures) = &failures {
                        for e in failures.try_iter() {
                            observer.on_service_failure(&e);
                        }
                    }
                }

                // Joins the service worker, so every failure is in the channel.
                if let Some(services) = services {
                    services.shutdown();
                }
                if let Some(failures) = &failures {
                    for e in failures.try_iter() {
                        observer.on_service_failure(&e);
                    }
                }

                info!(
                    "controller stopped after {} update(s), {} conflict episode(s), {rejected} rejected",
                    controller.updates(),
                    controller.episodes(),
                );
                Stopped { controller, sink, observer, rejected }
            })
            .map_err(|source| ControlError::Spawn { what: "dc-controller", source })?;

        Ok(Self { sender: PoseSender { tx, capacity }, worker })
    }

    /// A new producer end of the pose queue.
    pub fn sender(&self) -> PoseSender {
        self.sender.clone()
    }

    /// Shorthand for `self.sender().send(agent, pose)`.
    pub fn send(&self, agent: AgentId, pose: Pose) -> ControlResult<()> {
        self.sender.send(agent, pose)
    }

    /// Stop the consumer thread and hand back what it owned.
    ///
    /// Every report queued before this call is processed first.  Reports
    /// queued afterwards by other producers are discarded, and their
    /// `send` fails with `Disconnected` once the thread has exited.
    ///
    /// # Errors
    ///
    /// `ControlError::WorkerPanicked` if the consumer thread panicked.
    pub fn shutdown(self) -> ControlResult<Stopped<S, R, K, O>> {
        if self.sender.tx.send(Message::Shutdown).is_err() {
            warn!("dc-controller thread already gone at shutdown");
        }
        self.worker
            .join()
            .map_err(|_| ControlError::WorkerPanicked { what: "dc-controller" })
    }
}

fn dispatch_requests<S: SteeringPolicy, R: ConflictResolver>(
    controller: &mut DeconflictionController<S, R>,
    services:   Option<&ServiceDispatcher>,
) {
    let spawns = controller.take_spawn_requests();
    let pens = controller.take_pen_requests();
    match services {
        Some(services) => {
            for request in spawns {
                services.provision(request);
            }
            for request in pens {
                services.style(request);
            }
        }
        None => {
            for request in &spawns {
                warn!("no service dispatcher, {:?} is not provisioned", request.name);
            }
            for request in &pens {
                debug!("no service dispatcher, pen for {:?} ignored", request.name);
            }
        }
    }
}
