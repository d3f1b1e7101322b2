#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Grid Skirmish headlessly.
//!
//! The player is driven by keys given on the command line and held for the
//! whole run, every wanderer by its own AI.

mod ascii;
mod layout;

use std::{fs, path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_skirmish_core::{Direction, Event};
use grid_skirmish_rendering::{RenderingBackend, Scene, DEFAULT_VIEWPORT};
use grid_skirmish_simulation::{FrameClock, Simulation, SimulationConfig};
use grid_skirmish_system_control::HeldInput;
use grid_skirmish_world::query;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::ascii::AsciiBackend;

/// Headless runner for the Grid Skirmish simulation.
#[derive(Debug, Parser)]
#[command(name = "grid-skirmish", version)]
struct Args {
    /// TOML file with simulation settings; omitted fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Text map (`.` floor, `#` wall) used instead of a generated grid.
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Simulated length of each frame in milliseconds.
    #[arg(long = "dt-ms", default_value_t = 16)]
    dt_ms: u64,
    /// Overrides the configured seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the configured number of wanderers.
    #[arg(long)]
    wanderers: Option<u32>,
    /// Direction key held by the player; repeat to hold several.
    #[arg(long, value_enum)]
    hold: Vec<HeldKey>,
    /// Holds the attack key for the whole run.
    #[arg(long)]
    fire: bool,
    /// Prints the final frame as a character map.
    #[arg(long)]
    ascii: bool,
    /// Paces frames against the wall clock instead of running flat out.
    #[arg(long)]
    realtime: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeldKey {
    Up,
    Down,
    Left,
    Right,
}

impl From<HeldKey> for Direction {
    fn from(key: HeldKey) -> Self {
        match key {
            HeldKey::Up => Direction::Up,
            HeldKey::Down => Direction::Down,
            HeldKey::Left => Direction::Left,
            HeldKey::Right => Direction::Right,
        }
    }
}

impl Args {
    fn simulation_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config at {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("failed to parse config at {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(wanderers) = self.wanderers {
            config.wanderers = wanderers;
        }
        Ok(config)
    }

    fn input(&self) -> HeldInput {
        let held = self
            .hold
            .iter()
            .fold(HeldInput::NONE, |input, key| input.holding((*key).into()));
        if self.fire {
            held.attacking()
        } else {
            held
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    moved: u64,
    blocked: u64,
    fired: u64,
    suppressed: u64,
    pruned: u64,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EntityMoved { .. } => self.moved += 1,
                Event::MoveBlocked { .. } => self.blocked += 1,
                Event::ProjectileFired { .. } => self.fired += 1,
                Event::AttackOnCooldown { .. } => self.suppressed += 1,
                Event::ProjectilePruned { .. } => self.pruned += 1,
                Event::TimeAdvanced { .. } => {}
            }
        }
    }
}

/// Entry point for the Grid Skirmish command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    run(&args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = args.simulation_config()?;
    let mut simulation = match &args.layout {
        Some(path) => {
            let grid = layout::load(path, config.world.cell_size)?;
            Simulation::with_grid(&config, grid)
        }
        None => Simulation::new(&config),
    }
    .context("failed to build simulation")?;

    println!("{}", query::welcome_banner(simulation.world()));

    let input = args.input();
    let frame = Duration::from_millis(args.dt_ms);
    let mut clock = args.realtime.then(|| FrameClock::start(frame * 4));
    let mut tally = Tally::default();

    for _ in 0..args.ticks {
        let dt = match clock.as_mut() {
            Some(clock) => {
                thread::sleep(frame);
                clock.tick()
            }
            None => frame,
        };
        let events = simulation.tick(dt, &input);
        debug!(events = events.len(), "frame simulated");
        tally.record(&events);
    }

    let world = simulation.world();
    let player = query::entity(world, simulation.player());
    info!(
        ticks = query::tick_index(world),
        moved = tally.moved,
        blocked = tally.blocked,
        fired = tally.fired,
        suppressed = tally.suppressed,
        pruned = tally.pruned,
        live_projectiles = query::projectile_view(world).len(),
        player_x = ?player.as_ref().map(|p| p.position.x),
        player_y = ?player.as_ref().map(|p| p.position.y),
        "run complete"
    );

    if args.ascii {
        let scene = Scene::capture(world, simulation.player(), DEFAULT_VIEWPORT)
            .context("failed to capture scene")?;
        let stdout = std::io::stdout();
        AsciiBackend::new(stdout.lock()).present(&scene)?;
    }
    Ok(())
}
