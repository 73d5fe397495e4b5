//! Fluent builder for constructing a [`DeconflictionController`].

use dc_agent::{PoseStoreBuilder, Priority};
use dc_core::{DcError, DeconflictionConfig, Pose};
use dc_policy::{BoundarySteering, ConflictResolver, PriorityYield, SteeringPolicy};

use crate::{ControlResult, DeconflictionController, PenRequest, PenStyle, SpawnRequest};

struct Entry {
    name:     String,
    priority: Option<Priority>,
    spawn_at: Option<Pose>,
}

/// Fluent builder for [`DeconflictionController<S, R>`].
///
/// Agents are registered in call order, which fixes their ids and, unless a
/// priority is given explicitly, their right-of-way: the earlier an agent is
/// registered, the sooner it yields.
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                  |
/// |-------------------|------------------------------------------|
/// | `.steering(s)`    | `BoundarySteering` with `config.speeds`  |
/// | `.resolver(r)`    | `PriorityYield` with `config.speeds`     |
///
/// # Example
///
/// ```rust,ignore
/// let controller = ControllerBuilder::new(DeconflictionConfig::default())
///     .agent("turtle1")                              // already present
///     .spawn("turtle2", Pose::new(3.0, 3.0, 0.0))    // provisioned at startup
///     .pen("turtle2", PenStyle::new(255, 0, 0, 2))
///     .build()?;
/// ```
pub struct ControllerBuilder<S: SteeringPolicy = BoundarySteering, R: ConflictResolver = PriorityYield> {
    config:   DeconflictionConfig,
    entries:  Vec<Entry>,
    pens:     Vec<(String, PenStyle)>,
    steering: S,
    resolver: R,
}

impl ControllerBuilder {
    /// Builder with the default policies, parameterised by `config.speeds`.
    pub fn new(config: DeconflictionConfig) -> Self {
        Self {
            config,
            entries:  Vec::new(),
            pens:     Vec::new(),
            steering: BoundarySteering::new(config.speeds),
            resolver: PriorityYield::new(config.speeds),
        }
    }
}

impl<S: SteeringPolicy, R: ConflictResolver> ControllerBuilder<S, R> {
    /// Register an agent that already exists in the environment.
    ///
    /// Its priority is its registration index, counting every earlier
    /// entry (see [`PoseStoreBuilder::agent`]).
    pub fn agent(self, name: impl Into<String>) -> Self {
        self.entry(name.into(), None, None)
    }

    pub fn agent_with_priority(self, name: impl Into<String>, priority: Priority) -> Self {
        self.entry(name.into(), Some(priority), None)
    }

    /// Register an agent and queue a startup request to create it at `pose`.
    pub fn spawn(self, name: impl Into<String>, pose: Pose) -> Self {
        self.entry(name.into(), None, Some(pose))
    }

    pub fn spawn_with_priority(self, name: impl Into<String>, pose: Pose, priority: Priority) -> Self {
        self.entry(name.into(), Some(priority), Some(pose))
    }

    /// Queue a startup trail style for a registered agent.
    pub fn pen(mut self, name: impl Into<String>, style: PenStyle) -> Self {
        self.pens.push((name.into(), style));
        self
    }

    /// Replace the steering policy.
    pub fn steering<S2: SteeringPolicy>(self, steering: S2) -> ControllerBuilder<S2, R> {
        ControllerBuilder {
            config:   self.config,
            entries:  self.entries,
            pens:     self.pens,
            steering,
            resolver: self.resolver,
        }
    }

    /// Replace the conflict resolver.
    pub fn resolver<R2: ConflictResolver>(self, resolver: R2) -> ControllerBuilder<S, R2> {
        ControllerBuilder {
            config:   self.config,
            entries:  self.entries,
            pens:     self.pens,
            steering: self.steering,
            resolver,
        }
    }

    fn entry(mut self, name: String, priority: Option<Priority>, spawn_at: Option<Pose>) -> Self {
        self.entries.push(Entry { name, priority, spawn_at });
        self
    }

    /// Validate the configuration, register every agent and return a
    /// controller in CLEAR mode with no known poses.
    ///
    /// # Errors
    ///
    /// - `DcError::Config` for an invalid configuration or a non-finite
    ///   spawn pose.
    /// - `DcError::DuplicateAgent` if a name is registered twice.
    /// - `DcError::UnknownAgentName` if a pen style names an unregistered
    ///   agent.
    pub fn build(self) -> ControlResult<DeconflictionController<S, R>> {
        self.config.validate()?;

        let mut store_builder = PoseStoreBuilder::new();
        for entry in &self.entries {
            store_builder = match entry.priority {
                Some(priority) => store_builder.agent_with_priority(entry.name.clone(), priority),
                None => store_builder.agent(entry.name.clone()),
            };
        }
        let store = store_builder.build()?;

        let mut spawns = Vec::new();
        for entry in self.entries {
            let Some(pose) = entry.spawn_at else { continue };
            if !pose.is_finite() {
                return Err(DcError::Config(format!(
                    "spawn pose for {:?} is not finite: {pose}",
                    entry.name
                ))
                .into());
            }
            let agent = store
                .lookup(&entry.name)
                .ok_or_else(|| DcError::UnknownAgentName(entry.name.clone()))?;
            spawns.push(SpawnRequest { agent, name: entry.name, pose });
        }

        let mut pens = Vec::with_capacity(self.pens.len());
        for (name, style) in self.pens {
            let agent = store
                .lookup(&name)
                .ok_or_else(|| DcError::UnknownAgentName(name.clone()))?;
            pens.push(PenRequest { agent, name, style });
        }

        Ok(DeconflictionController::from_parts(
            self.config,
            store,
            self.steering,
            self.resolver,
            spawns,
            pens,
        ))
    }
}
