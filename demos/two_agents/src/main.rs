//! two_agents: two unicycle agents sharing a square arena.
//!
//! turtle1 starts at the arena centre; turtle2 is provisioned at startup at
//! (3, 3).  Each step both agents report a (slightly noisy) pose, the
//! controller decides, and the commands drive the kinematic simulator.
//!
//! ```text
//! cargo run --release -p two_agents [config.json]
//! RUST_LOG=debug cargo run -p two_agents
//! ```
//!
//! The optional JSON file overrides any subset of `DeconflictionConfig`,
//! e.g. `{"conflict_threshold": 1.5, "arena": {"margin": 1.0}}`.

mod sim;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{error, info, warn};

use dc_agent::PoseStore;
use dc_control::{
    ControllerBuilder, ControllerObserver, PenStyle, PenStyler, Provisioner, ServiceError,
};
use dc_core::{AgentId, DeconflictionConfig, Pose};
use dc_output::{CsvWriter, TelemetryObserver};

use sim::ArenaSim;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:            u64 = 42;
const STEPS:           u64 = 1_800;
const DT:              f64 = 1.0 / 60.0; // 60 Hz pose reports
const JITTER:          f64 = 0.01;
const TURTLE1_HEADING: f64 = -3.0 * std::f64::consts::FRAC_PI_4; // facing the spawn point of turtle2
const OUTPUT_DIR:      &str = "output/two_agents";

fn load_config(path: Option<String>) -> Result<DeconflictionConfig> {
    let Some(path) = path else {
        return Ok(DeconflictionConfig::default());
    };
    let file = File::open(&path).with_context(|| format!("opening config file {path}"))?;
    let config: DeconflictionConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config file {path}"))?;
    Ok(config)
}

fn name(store: &PoseStore, agent: AgentId) -> &str {
    store.name(agent).unwrap_or("?")
}

fn pen_label(pen: &PenStyle) -> String {
    if pen.enabled {
        format!("#{:02x}{:02x}{:02x}/{}", pen.r, pen.g, pen.b, pen.width)
    } else {
        "off".into()
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config(std::env::args().nth(1))?;
    println!("=== two_agents: reactive deconfliction ===");
    println!(
        "Arena: [{}, {}] × [{}, {}], margin {}  |  threshold {}  |  steps {STEPS}  |  seed {SEED}",
        config.arena.x_min,
        config.arena.x_max,
        config.arena.y_min,
        config.arena.y_max,
        config.arena.margin,
        config.conflict_threshold,
    );
    println!();

    // 1. Controller: turtle1 exists, turtle2 is spawned.
    let mut controller = ControllerBuilder::new(config)
        .agent("turtle1")
        .spawn("turtle2", Pose::new(3.0, 3.0, 0.0))
        .pen("turtle2", PenStyle::new(255, 80, 80, 3))
        .build()?;

    // 2. Environment with turtle1 at the centre.
    let mut sim = ArenaSim::new(config.arena, DT, JITTER, SEED);
    let turtle1 = controller.store.lookup("turtle1").context("turtle1 not registered")?;
    let centre = config.arena.center();
    sim.place(turtle1, Pose::new(centre.x, centre.y, TURTLE1_HEADING))
        .map_err(anyhow::Error::msg)?;

    // 3. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut obs = TelemetryObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?);

    // 4. Startup requests.  The simulator is its own provisioner.
    for request in controller.take_spawn_requests() {
        match sim.spawn(&request) {
            Ok(()) => info!("spawned {:?} at {}", request.name, request.pose),
            Err(reason) => {
                let e = ServiceError::ProvisioningFailed { name: request.name, reason };
                error!("{e}");
                obs.on_service_failure(&e);
            }
        }
    }
    for request in controller.take_pen_requests() {
        if let Err(reason) = sim.set_pen(&request) {
            let e = ServiceError::StylingFailed { name: request.name, reason };
            error!("{e}");
            obs.on_service_failure(&e);
        }
    }

    // 5. Run.
    let agents: Vec<AgentId> = controller.store.agent_ids().collect();
    let t0 = Instant::now();
    for _ in 0..STEPS {
        for &agent in &agents {
            let Some(pose) = sim.observe(agent) else { continue };
            if let Err(e) = controller.process(agent, pose, &mut sim, &mut obs) {
                warn!("update for {agent} rejected: {e}");
            }
        }
        sim.step();
    }
    let elapsed = t0.elapsed();

    obs.finish()?;
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!("  updates           : {}", controller.updates());
    println!("  conflict episodes : {}", controller.episodes());
    println!("  mode transitions  : {}", obs.transitions());
    println!("  rejected updates  : {}", obs.rejected());
    println!("  service failures  : {}", obs.service_failures());
    println!("  output            : {OUTPUT_DIR}/commands.csv, {OUTPUT_DIR}/conflicts.csv");
    println!();

    println!(
        "{:<10} {:>8} {:>8} {:>9} {:>10} {:>12} {:>18}",
        "Agent", "x", "y", "heading", "travelled", "pen", "last cmd"
    );
    println!("{}", "-".repeat(81));
    for &agent in &agents {
        let Some(body) = sim.body(agent) else { continue };
        let last = controller
            .state(agent)
            .and_then(|s| s.last_command)
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<10} {:>8.3} {:>8.3} {:>9.3} {:>10.2} {:>12} {:>18}",
            name(&controller.store, agent),
            body.pose.x,
            body.pose.y,
            body.pose.heading,
            body.travelled,
            pen_label(&body.pen),
            last,
        );
    }

    Ok(())
}
