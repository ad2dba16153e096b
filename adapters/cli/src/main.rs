#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Mouse Forage simulation headlessly.

mod frame;
mod scenario;

use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use mouse_forage_core::{ScentMode, SimulationConfig, Snapshot};
use mouse_forage_simulation::Simulation;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::scenario::Scenario;

/// Accumulation policy selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ScentModeArg {
    /// Overlapping food scents add up.
    Stacking,
    /// Each cell keeps the strongest single scent.
    Max,
}

impl From<ScentModeArg> for ScentMode {
    fn from(value: ScentModeArg) -> Self {
        match value {
            ScentModeArg::Stacking => ScentMode::Stacking,
            ScentModeArg::Max => ScentMode::Max,
        }
    }
}

/// Runs a mouse foraging for food by scent and reports its round scores.
#[derive(Debug, Parser)]
#[command(name = "mouse-forage", version)]
struct Args {
    /// TOML file with simulation settings; missing keys keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TOML file describing the opening agent and food placement.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Seed for every random choice.
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Maximum number of ticks to run.
    #[arg(short, long, default_value_t = 10_000)]
    ticks: u64,

    /// Stop once this many rounds have finished.
    #[arg(short, long)]
    rounds: Option<usize>,

    /// Side length of the square grid, overriding the config file.
    #[arg(long)]
    grid_size: Option<u32>,

    /// Scent accumulation policy, overriding the config file.
    #[arg(long, value_enum)]
    scent_mode: Option<ScentModeArg>,

    /// Sum whole window rows and columns when choosing a direction.
    #[arg(long)]
    diagonal_scent: bool,

    /// Print the grid every N ticks; zero prints only the final frame.
    #[arg(long, default_value_t = 0)]
    render_every: u64,

    /// Enable debug logging unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn load_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                toml::from_str::<SimulationConfig>(&text)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };

        if let Some(size) = self.grid_size {
            config.grid_width = size;
            config.grid_height = size;
        }
        if let Some(mode) = self.scent_mode {
            config.scent_mode = mode.into();
        }
        if self.diagonal_scent {
            config.diagonal_scent = true;
        }
        Ok(config)
    }

    fn load_scenario(&self, config: &SimulationConfig) -> Result<Option<Snapshot>> {
        let Some(path) = &self.scenario else {
            return Ok(None);
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        let snapshot = Scenario::parse(&text)
            .and_then(|scenario| scenario.into_snapshot(config))
            .with_context(|| format!("invalid scenario {}", path.display()))?;
        Ok(Some(snapshot))
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))
}

/// Entry point for the Mouse Forage command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let config = args.load_config()?;
    let scenario = args.load_scenario(&config)?;
    debug!(?config, seed = args.seed, "starting simulation");

    let mut simulation = Simulation::seeded(config, args.seed)
        .context("invalid simulation configuration")?;
    if let Some(snapshot) = scenario {
        simulation.restore(&snapshot);
    }

    let mut ticks_run = 0;
    while ticks_run < args.ticks {
        if args
            .rounds
            .is_some_and(|limit| simulation.rounds().len() >= limit)
        {
            break;
        }

        if !simulation.tick() {
            let _ = simulation.start_next_round();
            continue;
        }
        ticks_run += 1;

        if args.render_every > 0 && ticks_run % args.render_every == 0 {
            println!("{}\n", frame::render(&simulation.render_state()));
        }
    }

    info!(ticks = ticks_run, rounds = simulation.rounds().len(), "run finished");
    println!("{}\n", frame::render(&simulation.render_state()));
    println!("{}", frame::score_summary(simulation.score_report().as_ref()));
    Ok(())
}
