//! Flies a simulated chaser from a random start to the docking port, logging progress as it goes.
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dock_autopilot::{AutopilotConfig, AutopilotError, ControlLoop, Scheduler};
use dock_physics::{DockingTolerances, Panel, Vehicle, VehicleParams};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const PHYSICS_STEP: Duration = Duration::from_millis(10);

/// Docking autopilot flying a simulated chaser
#[derive(Parser, Debug)]
#[command(name = "dock-autopilot")]
#[command(version)]
struct Args {
    /// JSON file overriding autopilot tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the randomised start state
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Give up after this many simulated seconds
    #[arg(long, default_value_t = 600.0)]
    duration: f64,

    /// Pace the simulation against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Seconds of simulated time between status lines
    #[arg(long, default_value_t = 10.0)]
    report_every: f64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AutopilotConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AutopilotConfig::default(),
    };
    let report_every = Duration::try_from_secs_f64(args.report_every)
        .context("--report-every must be a non-negative number of seconds")?;
    anyhow::ensure!(!report_every.is_zero(), "--report-every must be positive");
    let duration = Duration::try_from_secs_f64(args.duration)
        .context("--duration must be a non-negative number of seconds")?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let panel = Panel::new(Vehicle::random_approach(&mut rng, VehicleParams::default()));
    let start = panel.vehicle();
    info!(seed = args.seed, attitude = ?start.attitude, position = ?start.position, "initial state");

    let scheduler = Scheduler::new();
    let physics = panel.clone();
    let dt = PHYSICS_STEP.as_secs_f64();
    scheduler.every("physics", PHYSICS_STEP, move || {
        physics.step(dt).map_err(|e| AutopilotError::Job {
            job: "physics",
            reason: e.to_string(),
        })
    });

    let control = Rc::new(ControlLoop::new(panel.clone(), panel.clone(), config)?);
    control.start(&scheduler)?;

    let tolerances = DockingTolerances::default();
    let outcome = loop {
        if scheduler.now() >= duration {
            break Ok(false);
        }
        let span = report_every.min(duration - scheduler.now());
        let advanced = if args.realtime {
            scheduler.run_paced(span).await
        } else {
            scheduler.advance(span)
        };
        if let Err(e) = advanced {
            break Err(e);
        }

        let v = panel.vehicle();
        info!(
            t = scheduler.now().as_secs_f64(),
            phase = ?control.phase(),
            attitude = ?v.attitude,
            position = ?v.position,
            presses = panel.presses(),
            "status"
        );
        if panel.is_docked(tolerances) {
            break Ok(true);
        }
    };
    control.stop();

    match outcome {
        Ok(true) => {
            info!(t = scheduler.now().as_secs_f64(), presses = panel.presses(), "docked");
            Ok(())
        }
        Ok(false) => {
            info!(t = scheduler.now().as_secs_f64(), "not docked before the time limit");
            Ok(())
        }
        Err(e) => {
            error!(t = scheduler.now().as_secs_f64(), "autopilot aborted: {e}");
            Err(e.into())
        }
    }
}
