//! `DeconflictionController`: the per-update control loop.
//!
//! # Update algorithm
//!
//! ```text
//! on_pose(agent, pose):
//!   state     ← store.update(agent, pose)        // UnknownAgent: nothing else happens
//!   baseline  ← steering.steer(pose, arena)
//!   known     ← store.all_known_poses()
//!   conflicts ← pairs of known agents closer than the threshold
//!   if conflicts is empty:
//!       mode     = CLEAR
//!       commands = [(agent, baseline)]
//!   else:
//!       mode     = CONFLICT
//!       commands = merge(resolver.resolve(pair) for pair in conflicts)
//!                  + (agent, baseline) if agent is in no pair
//!   store.record_command(c) for c in commands
//! ```
//!
//! The controller keeps no decision history.  Each update is judged on the
//! latest known poses alone: a pair that separates beyond the threshold is
//! back under steering on the very next update, and re-entering the
//! threshold triggers a fresh override.

use std::fmt;

use dc_agent::{AgentState, PoseStore};
use dc_core::{AgentId, DcError, DeconflictionConfig, Pose, VelocityCommand};
use dc_policy::{
    BoundarySteering, ConflictPair, ConflictResolver, Contender, PriorityYield, ProximityIndex,
    SteeringPolicy, merge_resolutions, scan_pairs,
};
use log::{debug, info, warn};

use crate::{CommandSink, ControlResult, ControllerObserver, PenRequest, PenStyle, SpawnRequest};

/// Above this many known agents, detection goes through the R-tree instead
/// of the all-pairs scan.
const INDEX_CUTOFF: usize = 16;

// ── ControlMode ───────────────────────────────────────────────────────────────

/// Whether the last update found any pair in conflict.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControlMode {
    #[default]
    Clear,
    Conflict,
}

impl ControlMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlMode::Clear => "CLEAR",
            ControlMode::Conflict => "CONFLICT",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Decision ──────────────────────────────────────────────────────────────────

/// Outcome of one accepted pose update.
#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    /// 1-based sequence number of the accepted update.
    pub seq:           u64,
    /// The agent whose pose triggered this decision.
    pub agent:         AgentId,
    pub pose:          Pose,
    pub previous_mode: ControlMode,
    pub mode:          ControlMode,
    /// Steering output for `agent`, whether or not it was overridden.
    pub baseline:      VelocityCommand,
    /// Pairs under the threshold, each with `a` before `b` in report order.
    pub conflicts:     Vec<ConflictPair>,
    /// Commands to emit, in emission order.  At most one per agent.
    pub commands:      Vec<(AgentId, VelocityCommand)>,
}

impl Decision {
    /// Command emitted for `agent` by this decision, if any.
    pub fn command_for(&self, agent: AgentId) -> Option<VelocityCommand> {
        self.commands
            .iter()
            .find(|(id, _)| *id == agent)
            .map(|(_, cmd)| *cmd)
    }

    #[inline]
    pub fn is_transition(&self) -> bool {
        self.previous_mode != self.mode
    }

    /// `true` if the resolver replaced `agent`'s own baseline.
    pub fn overridden(&self) -> bool {
        self.command_for(self.agent).is_some_and(|cmd| cmd != self.baseline)
    }
}

// ── DeconflictionController ───────────────────────────────────────────────────

/// Owns the pose store and both policies, and turns each pose update into
/// velocity commands.
///
/// Build with [`ControllerBuilder`](crate::ControllerBuilder).  Updates must
/// be applied one at a time; wrap the controller in a
/// [`ControllerHandle`](crate::ControllerHandle) to feed it from several
/// threads.
pub struct DeconflictionController<S = BoundarySteering, R = PriorityYield>
where
    S: SteeringPolicy,
    R: ConflictResolver,
{
    pub config:   DeconflictionConfig,
    pub store:    PoseStore,
    pub steering: S,
    pub resolver: R,

    mode:     ControlMode,
    updates:  u64,
    episodes: u64,
    spawns:   Vec<SpawnRequest>,
    pens:     Vec<PenRequest>,
}

impl<S: SteeringPolicy, R: ConflictResolver> DeconflictionController<S, R> {
    pub(crate) fn from_parts(
        config:   DeconflictionConfig,
        store:    PoseStore,
        steering: S,
        resolver: R,
        spawns:   Vec<SpawnRequest>,
        pens:     Vec<PenRequest>,
    ) -> Self {
        Self {
            config,
            store,
            steering,
            resolver,
            mode: ControlMode::Clear,
            updates: 0,
            episodes: 0,
            spawns,
            pens,
        }
    }

    // ── Update path ───────────────────────────────────────────────────────

    /// Apply one pose report and decide the resulting commands.
    ///
    /// No I/O happens here; see [`process`](Self::process) to also emit the
    /// commands and notify an observer.
    ///
    /// # Errors
    ///
    /// `DcError::UnknownAgent` if `agent` is not registered, or
    /// `DcError::InvalidPose` if `pose` is not finite.  The store, mode and
    /// counters are left untouched and no command is decided.
    pub fn on_pose(&mut self, agent: AgentId, pose: Pose) -> ControlResult<Decision> {
        self.store.update(agent, pose)?;
        self.updates += 1;

        let baseline = self.steering.steer(&pose, &self.config.arena);
        let conflicts = self.detect();
        let previous_mode = self.mode;

        let commands = if conflicts.is_empty() {
            self.mode = ControlMode::Clear;
            vec![(agent, baseline)]
        } else {
            self.mode = ControlMode::Conflict;
            let resolutions: Vec<_> = conflicts
                .iter()
                .filter_map(|pair| {
                    self.resolver.resolve(
                        self.contender(pair.a),
                        self.contender(pair.b),
                        &pair.state(),
                    )
                })
                .collect();
            let mut commands = merge_resolutions(&resolutions);
            if !commands.iter().any(|(id, _)| *id == agent) {
                commands.push((agent, baseline));
            }
            commands
        };

        for (id, cmd) in &commands {
            self.store.record_command(*id, *cmd);
        }

        if previous_mode != self.mode {
            match self.mode {
                ControlMode::Conflict => {
                    self.episodes += 1;
                    let closest = conflicts
                        .iter()
                        .map(|p| p.distance)
                        .fold(f64::INFINITY, f64::min);
                    warn!(
                        "conflict #{}: {} pair(s) under {}, closest {closest:.3}",
                        self.episodes,
                        conflicts.len(),
                        self.config.conflict_threshold,
                    );
                }
                ControlMode::Clear => info!("conflict #{} cleared", self.episodes),
            }
        }
        debug!("#{} {agent} at {pose}: baseline {baseline}, mode {}", self.updates, self.mode);

        Ok(Decision {
            seq: self.updates,
            agent,
            pose,
            previous_mode,
            mode: self.mode,
            baseline,
            conflicts,
            commands,
        })
    }

    /// [`on_pose`](Self::on_pose) addressed by registered name.
    ///
    /// # Errors
    ///
    /// `DcError::UnknownAgentName` if `name` is not registered.
    pub fn on_named_pose(&mut self, name: &str, pose: Pose) -> ControlResult<Decision> {
        let agent = self
            .store
            .lookup(name)
            .ok_or_else(|| DcError::UnknownAgentName(name.to_owned()))?;
        self.on_pose(agent, pose)
    }

    /// Apply one pose report, emit the resulting commands to `sink` and
    /// notify `observer`.
    ///
    /// A rejected update is reported to the observer and logged before the
    /// error is returned; nothing is sent.
    pub fn process<K, O>(
        &mut self,
        agent:    AgentId,
        pose:     Pose,
        sink:     &mut K,
        observer: &mut O,
    ) -> ControlResult<Decision>
    where
        K: CommandSink + ?Sized,
        O: ControllerObserver + ?Sized,
    {
        let decision = match self.on_pose(agent, pose) {
            Ok(decision) => decision,
            Err(e) => {
                if let crate::ControlError::Core(core) = &e {
                    observer.on_rejected(core);
                }
                warn!("rejected pose {pose} for {agent}: {e}");
                return Err(e);
            }
        };

        if let Some(state) = self.store.state(agent) {
            observer.on_update(agent, state);
        }
        for (id, cmd) in &decision.commands {
            sink.send(*id, *cmd);
        }
        if decision.is_transition() {
            observer.on_transition(decision.previous_mode, decision.mode, decision.seq);
        }
        observer.on_decision(&decision, &self.store);
        Ok(decision)
    }

    // ── Detection ─────────────────────────────────────────────────────────

    fn detect(&self) -> Vec<ConflictPair> {
        let known = self.store.all_known_poses();
        let threshold = self.config.conflict_threshold;
        match known.len() {
            0 | 1 => Vec::new(),
            n if n <= INDEX_CUTOFF => scan_pairs(&known, threshold),
            _ => ProximityIndex::new(known).conflicts(threshold),
        }
    }

    fn contender(&self, agent: AgentId) -> Contender {
        Contender::new(agent, self.store.priority(agent).unwrap_or_default())
    }

    // ── Services ──────────────────────────────────────────────────────────

    /// Queue a trail-style change for `agent`.
    ///
    /// # Errors
    ///
    /// `DcError::UnknownAgent` if `agent` is not registered.
    pub fn request_pen(&mut self, agent: AgentId, style: PenStyle) -> ControlResult<()> {
        let name = self.store.name(agent).ok_or(DcError::UnknownAgent(agent))?;
        self.pens.push(PenRequest { agent, name: name.to_owned(), style });
        Ok(())
    }

    /// Take all queued provisioning requests.  Startup spawns are queued
    /// by the builder.
    pub fn take_spawn_requests(&mut self) -> Vec<SpawnRequest> {
        std::mem::take(&mut self.spawns)
    }

    /// Take all queued pen-styling requests.
    pub fn take_pen_requests(&mut self) -> Vec<PenRequest> {
        std::mem::take(&mut self.pens)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Number of accepted pose updates.
    #[inline]
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Number of CLEAR → CONFLICT transitions so far.
    #[inline]
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    /// Latest known state of `agent`.
    pub fn state(&self, agent: AgentId) -> Option<&AgentState> {
        self.store.state(agent)
    }
}
