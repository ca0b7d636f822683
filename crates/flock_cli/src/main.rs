//! Flock CLI
//!
//! Headless runner: load a configuration, step the simulation and print a
//! summary or the final JSON snapshot.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use flock_core::config::PRESETS;
use flock_core::timestep::{ticks_for, DEFAULT_DT};
use flock_core::{SimConfig, SimEvent, Simulation, SimulationResponse};
use tracing_subscriber::EnvFilter;

/// Simulated seconds when neither `--ticks` nor `--seconds` is given
const DEFAULT_SECONDS: f32 = 10.0;

#[derive(Parser)]
#[command(name = "flock_cli")]
#[command(about = "Run the predator/prey flocking simulation headless", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and report the outcome
    Run {
        /// YAML or JSON config file (overrides --preset)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Built-in preset name
        #[arg(long, default_value = "default")]
        preset: String,

        /// Number of ticks to run
        #[arg(long, conflicts_with = "seconds")]
        ticks: Option<u64>,

        /// Simulated seconds to run
        #[arg(long)]
        seconds: Option<f32>,

        /// Step length in seconds
        #[arg(long, default_value_t = DEFAULT_DT)]
        dt: f32,

        /// Override the configured RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print the final snapshot as JSON instead of a summary
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print a preset configuration as YAML
    Config {
        /// Built-in preset name
        #[arg(long, default_value = "default")]
        preset: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flock_core=info,flock_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            preset,
            ticks,
            seconds,
            dt,
            seed,
            json,
        } => {
            if !dt.is_finite() || dt <= 0.0 {
                bail!("--dt must be a positive number of seconds (got {})", dt);
            }
            let cfg = load_config(config.as_deref(), &preset, seed)?;
            let ticks = ticks.unwrap_or_else(|| ticks_for(seconds.unwrap_or(DEFAULT_SECONDS), dt));

            tracing::info!(ticks, dt, seed = cfg.seed, "Running simulation");
            let response = run_simulation(cfg, ticks, dt);

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_summary(&response);
            }
        }

        Commands::Config { preset } => {
            let cfg = SimConfig::from_preset(&preset)
                .with_context(|| format!("available presets: {}", PRESETS.join(", ")))?;
            print!("{}", cfg.to_yaml()?);
        }
    }

    Ok(())
}

/// Resolve the configuration: file if given, else preset; then apply the seed override.
fn load_config(path: Option<&Path>, preset: &str, seed: Option<u64>) -> Result<SimConfig> {
    let mut cfg = match path {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SimConfig::from_preset(preset)
            .with_context(|| format!("available presets: {}", PRESETS.join(", ")))?,
    };
    if let Some(seed) = seed {
        cfg.seed = seed;
    }
    Ok(cfg)
}

fn run_simulation(cfg: SimConfig, ticks: u64, dt: f32) -> SimulationResponse {
    let mut sim = Simulation::new(cfg);
    advance(&mut sim, ticks, dt);
    SimulationResponse::from_simulation(&sim)
}

/// Step `ticks` times, draining the event queue after each step so long runs
/// stay flat in memory.
fn advance(sim: &mut Simulation, ticks: u64, dt: f32) {
    sim.drain_events();
    for _ in 0..ticks {
        sim.tick(dt);
        for event in sim.drain_events() {
            if let SimEvent::BoidCaptured { id, .. } = event {
                tracing::debug!(tick = sim.tick_count(), boid = id.0, "Boid captured");
            }
        }
    }
}

fn print_summary(response: &SimulationResponse) {
    let snap = &response.snapshot;
    let summary = &response.summary;
    println!("✅ Simulation finished");
    println!("   Ticks:        {} ({:.2} s)", snap.tick, snap.elapsed);
    println!("   Boids alive:  {}", summary.boids_alive);
    println!("   Captures:     {}", summary.captures);
    println!("   Food eaten:   {}", summary.food_consumed);
    println!("   Hunter state: {:?}", snap.hunter.state);
    println!(
        "   Hunter:       energy {:.1} at ({:.2}, {:.2}, {:.2})",
        snap.hunter.energy, snap.hunter.position[0], snap.hunter.position[1], snap.hunter.position[2]
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_run_args() {
        let cli = Cli::try_parse_from([
            "flock_cli", "run", "--preset", "endurance", "--ticks", "30", "--seed", "9", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { preset, ticks, seed, json, dt, .. } => {
                assert_eq!(preset, "endurance");
                assert_eq!(ticks, Some(30));
                assert_eq!(seed, Some(9));
                assert!(json);
                assert_eq!(dt, DEFAULT_DT);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_ticks_and_seconds_conflict() {
        assert!(Cli::try_parse_from(["flock_cli", "run", "--ticks", "1", "--seconds", "2"]).is_err());
    }

    #[test]
    fn test_load_config_seed_override() {
        let cfg = load_config(None, "endurance", Some(77)).unwrap();
        assert_eq!(cfg.seed, 77);
        assert!((cfg.hunter.capture_distance - 0.5).abs() < 1e-6);
        assert!(load_config(None, "nope", None).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "seed: 5\nboid:\n  count: 2").unwrap();
        let cfg = load_config(Some(file.path()), "default", None).unwrap();
        assert_eq!(cfg.seed, 5);
        assert_eq!(cfg.boid.count, 2);
    }

    #[test]
    fn test_advance_leaves_no_queued_events() {
        let mut sim = Simulation::new(SimConfig::default());
        advance(&mut sim, 200, 0.05);
        assert_eq!(sim.tick_count(), 200);
        assert_eq!(sim.world().events.queued(), 0);
        assert!(sim.stats().food_spawned >= 5);
    }

    #[test]
    fn test_run_simulation_reports() {
        let response = run_simulation(SimConfig::default(), 10, 0.1);
        assert_eq!(response.snapshot.tick, 10);
        assert_eq!(response.summary.boids_alive, response.snapshot.boids.len());
    }
}
