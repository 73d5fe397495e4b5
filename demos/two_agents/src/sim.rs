//! Kinematic stand-in for the 2-D arena.
//!
//! Each body is a unicycle: the heading turns at `angular_speed` and the body
//! moves along it at `linear_speed`.  Positions are clamped to the arena
//! walls.  Pose reports carry a small seeded jitter so repeated runs are
//! reproducible but the controller never sees perfectly clean data.

use std::f64::consts::{PI, TAU};

use dc_control::{CommandSink, PenRequest, PenStyle, PenStyler, Provisioner, SpawnRequest};
use dc_core::{AgentId, Arena, Pose, VelocityCommand};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct Body {
    pub pose:      Pose,
    pub command:   VelocityCommand,
    pub pen:       PenStyle,
    /// Path length covered so far.
    pub travelled: f64,
}

pub struct ArenaSim {
    arena:  Arena,
    bodies: Vec<Option<Body>>,
    rng:    SmallRng,
    jitter: f64,
    dt:     f64,
}

impl ArenaSim {
    pub fn new(arena: Arena, dt: f64, jitter: f64, seed: u64) -> Self {
        Self {
            arena,
            bodies: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
            jitter: jitter.abs(),
            dt,
        }
    }

    /// Put a new body at `pose`.  Fails if the slot is taken or the pose is
    /// outside the walls.
    pub fn place(&mut self, agent: AgentId, pose: Pose) -> Result<(), String> {
        if !self.arena.contains(&pose) {
            return Err(format!("{pose} is outside the arena"));
        }
        let i = agent.index();
        if self.bodies.len() <= i {
            self.bodies.resize_with(i + 1, || None);
        }
        if self.bodies[i].is_some() {
            return Err(format!("{agent} already exists"));
        }
        self.bodies[i] = Some(Body {
            pose,
            command:   VelocityCommand::STOP,
            pen:       PenStyle::default(),
            travelled: 0.0,
        });
        Ok(())
    }

    pub fn body(&self, agent: AgentId) -> Option<&Body> {
        self.bodies.get(agent.index()).and_then(Option::as_ref)
    }

    /// Advance every body by one time step.
    pub fn step(&mut self) {
        let dt = self.dt;
        let arena = self.arena;
        for body in self.bodies.iter_mut().flatten() {
            let heading = (body.pose.heading + body.command.angular_speed * dt + PI).rem_euclid(TAU) - PI;
            let step = body.command.linear_speed * dt;
            let x = (body.pose.x + step * heading.cos()).clamp(arena.x_min, arena.x_max);
            let y = (body.pose.y + step * heading.sin()).clamp(arena.y_min, arena.y_max);

            body.travelled += Pose::new(x, y, heading).distance_to(&body.pose);
            body.pose = Pose::new(x, y, heading);
        }
    }

    /// Noisy pose report for `agent`, or `None` if it does not exist yet.
    pub fn observe(&mut self, agent: AgentId) -> Option<Pose> {
        let pose = self.bodies.get(agent.index())?.as_ref()?.pose;
        if self.jitter == 0.0 {
            return Some(pose);
        }
        let j = self.jitter;
        Some(Pose::new(
            pose.x + self.rng.gen_range(-j..=j),
            pose.y + self.rng.gen_range(-j..=j),
            pose.heading,
        ))
    }
}

impl CommandSink for ArenaSim {
    fn send(&mut self, agent: AgentId, command: VelocityCommand) {
        if let Some(Some(body)) = self.bodies.get_mut(agent.index()) {
            body.command = command;
        }
    }
}

impl Provisioner for ArenaSim {
    fn spawn(&mut self, request: &SpawnRequest) -> Result<(), String> {
        self.place(request.agent, request.pose)
    }
}

impl PenStyler for ArenaSim {
    fn set_pen(&mut self, request: &PenRequest) -> Result<(), String> {
        match self.bodies.get_mut(request.agent.index()) {
            Some(Some(body)) => {
                body.pen = request.style;
                Ok(())
            }
            _ => Err(format!("{:?} does not exist", request.name)),
        }
    }
}
