//! External collaborators: agent provisioning and trail styling.
//!
//! Both are requested fire-and-forget.  A [`ServiceDispatcher`] owns one
//! worker thread that performs the calls off the control path; failures are
//! logged and forwarded on an unbounded channel so the runtime can hand them
//! to the observer.  Nothing ever blocks a pose update on a service call,
//! and a failed call never stops the loop.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, unbounded};
use dc_core::{AgentId, Pose};
use log::{debug, error, info, warn};

use crate::{ControlError, ControlResult, ServiceError};

// ── Requests ──────────────────────────────────────────────────────────────────

/// Ask the environment to create `name` at `pose`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRequest {
    pub agent: AgentId,
    pub name:  String,
    pub pose:  Pose,
}

/// Trail appearance of an agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PenStyle {
    pub r:       u8,
    pub g:       u8,
    pub b:       u8,
    pub width:   u8,
    /// `false` lifts the pen: no trail is drawn.
    pub enabled: bool,
}

impl PenStyle {
    pub const fn new(r: u8, g: u8, b: u8, width: u8) -> Self {
        Self { r, g, b, width, enabled: true }
    }

    /// Pen lifted; colour and width are kept for when it is lowered again.
    pub const fn off(self) -> Self {
        Self { enabled: false, ..self }
    }
}

impl Default for PenStyle {
    fn default() -> Self {
        Self::new(179, 184, 255, 3)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PenRequest {
    pub agent: AgentId,
    pub name:  String,
    pub style: PenStyle,
}

// ── Collaborator traits ───────────────────────────────────────────────────────

/// Creates agents in the environment.  `Err` carries a human-readable reason.
pub trait Provisioner: Send + 'static {
    fn spawn(&mut self, request: &SpawnRequest) -> Result<(), String>;
}

/// Sets an agent's trail style.  `Err` carries a human-readable reason.
pub trait PenStyler: Send + 'static {
    fn set_pen(&mut self, request: &PenRequest) -> Result<(), String>;
}

/// Accepts every request and only logs it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnly;

impl Provisioner for LogOnly {
    fn spawn(&mut self, request: &SpawnRequest) -> Result<(), String> {
        debug!("spawn {:?} at {} (log only)", request.name, request.pose);
        Ok(())
    }
}

impl PenStyler for LogOnly {
    fn set_pen(&mut self, request: &PenRequest) -> Result<(), String> {
        debug!("pen for {:?} -> {:?} (log only)", request.name, request.style);
        Ok(())
    }
}

// ── ServiceDispatcher ─────────────────────────────────────────────────────────

enum Job {
    Spawn(SpawnRequest),
    Pen(PenRequest),
}

/// Background worker that performs collaborator calls in submission order.
pub struct ServiceDispatcher {
    tx:          Option<Sender<Job>>,
    failures_tx: Sender<ServiceError>,
    failures:    Receiver<ServiceError>,
    worker:      Option<JoinHandle<()>>,
}

impl ServiceDispatcher {
    /// Queue capacity used by [`start_default`](Self::start_default).
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Start the worker thread with a bounded request queue.
    pub fn start<P, T>(mut provisioner: P, mut styler: T, capacity: usize) -> ControlResult<Self>
    where
        P: Provisioner,
        T: PenStyler,
    {
        let (tx, rx) = bounded::<Job>(capacity.max(1));
        let (failures_tx, failures) = unbounded::<ServiceError>();
        let worker_failures = failures_tx.clone();

        let worker = thread::Builder::new()
            .name("dc-services".into())
            .spawn(move || {
                // Ends once every sender is dropped and the queue is drained.
                for job in rx {
                    let outcome = match job {
                        Job::Spawn(req) => match provisioner.spawn(&req) {
                            Ok(()) => {
                                info!("spawned {:?} ({}) at {}", req.name, req.agent, req.pose);
                                Ok(())
                            }
                            Err(reason) => Err(ServiceError::ProvisioningFailed { name: req.name, reason }),
                        },
                        Job::Pen(req) => match styler.set_pen(&req) {
                            Ok(()) => {
                                debug!("pen set for {:?}: {:?}", req.name, req.style);
                                Ok(())
                            }
                            Err(reason) => Err(ServiceError::StylingFailed { name: req.name, reason }),
                        },
                    };
                    if let Err(e) = outcome {
                        error!("{e}");
                        let _ = worker_failures.send(e);
                    }
                }
            })
            .map_err(|source| ControlError::Spawn { what: "dc-services", source })?;

        Ok(Self {
            tx: Some(tx),
            failures_tx,
            failures,
            worker: Some(worker),
        })
    }

    /// Start with both collaborators set to [`LogOnly`].
    pub fn start_default() -> ControlResult<Self> {
        Self::start(LogOnly, LogOnly, Self::DEFAULT_CAPACITY)
    }

    /// Queue a provisioning call.  Never blocks.
    pub fn provision(&self, request: SpawnRequest) {
        let name = request.name.clone();
        self.submit(Job::Spawn(request), || ServiceError::ProvisioningFailed {
            name,
            reason: "service queue unavailable".into(),
        });
    }

    /// Queue a pen-styling call.  Never blocks.
    pub fn style(&self, request: PenRequest) {
        let name = request.name.clone();
        self.submit(Job::Pen(request), || ServiceError::StylingFailed {
            name,
            reason: "service queue unavailable".into(),
        });
    }

    fn submit(&self, job: Job, on_drop: impl FnOnce() -> ServiceError) {
        let result = match &self.tx {
            Some(tx) => tx.try_send(job).map_err(|e| match e {
                TrySendError::Full(_) => "full",
                TrySendError::Disconnected(_) => "closed",
            }),
            None => Err("closed"),
        };
        if let Err(why) = result {
            let err = on_drop();
            warn!("service queue {why}: {err}");
            let _ = self.failures_tx.send(err);
        }
    }

    /// Failures reported so far and not yet collected.
    pub fn drain_failures(&self) -> Vec<ServiceError> {
        self.failures.try_iter().collect()
    }

    /// A receiver for failures, usable after the dispatcher is gone.
    pub fn failures(&self) -> Receiver<ServiceError> {
        self.failures.clone()
    }

    /// Close the queue, let the worker finish pending calls and join it.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("dc-services thread panicked");
            }
        }
    }
}

impl Drop for ServiceDispatcher {
    fn drop(&mut self) {
        self.close();
    }
}
