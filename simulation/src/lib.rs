#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestration for Grid Skirmish.
//!
//! A [`Simulation`] owns the authoritative world together with the systems
//! that drive it. Each call to [`Simulation::tick`] first advances the clock
//! so cooldowns drain and projectiles fly, then samples player input, lets
//! the wander system steer ai-driven entities and applies the resulting
//! commands.

use std::time::{Duration, Instant};

use grid_skirmish_core::{
    Capabilities, Command, ConfigError, EntityConfig, EntityId, Event, WorldConfig,
};
use grid_skirmish_system_control::{InputSource, PlayerControl};
use grid_skirmish_system_wander::{self as wander, Wander, DEFAULT_MAX_REROLLS};
use grid_skirmish_world::{self as world, query, Grid, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

const WANDER_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Number of ai-driven wanderers spawned by default.
pub const DEFAULT_WANDERERS: u32 = 584;

/// Everything required to build a [`Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for grid generation and wander decisions.
    pub seed: u64,
    /// Grid generation parameters.
    pub world: WorldConfig,
    /// Construction parameters of the player-controlled entity.
    pub player: EntityConfig,
    /// Construction parameters shared by every wanderer.
    pub wanderer: EntityConfig,
    /// Number of wanderers to spawn.
    pub wanderers: u32,
    /// Bound on heading draws per wanderer per tick.
    pub max_rerolls: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            world: WorldConfig::default(),
            player: EntityConfig::default(),
            wanderer: EntityConfig::default(),
            wanderers: DEFAULT_WANDERERS,
            max_rerolls: DEFAULT_MAX_REROLLS,
        }
    }
}

/// Errors raised while assembling a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// World or entity configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// World plus the systems that drive it, advanced one frame at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    player: EntityId,
    control: PlayerControl,
    wander: Wander,
    commands: Vec<Command>,
}

impl Simulation {
    /// Generates a world from `config.seed` and populates it with the player
    /// followed by the configured number of wanderers.
    pub fn new(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let world = World::generate(&config.world, &mut rng)?;
        Self::populate(world, config)
    }

    /// Populates a world built around a prepared grid instead of a generated
    /// one. Grid generation settings in `config.world` are ignored.
    pub fn with_grid(config: &SimulationConfig, grid: Grid) -> Result<Self, SimulationError> {
        let world = World::new(grid, config.world.off_map_projectiles);
        Self::populate(world, config)
    }

    fn populate(mut world: World, config: &SimulationConfig) -> Result<Self, SimulationError> {
        let player = world::spawn_entity(&mut world, Capabilities::PLAYER, &config.player)?;
        for _ in 0..config.wanderers {
            let _ = world::spawn_entity(&mut world, Capabilities::WANDERER, &config.wanderer)?;
        }

        let grid = query::grid(&world);
        info!(
            seed = config.seed,
            columns = grid.columns(),
            rows = grid.rows(),
            wanderers = config.wanderers,
            "simulation ready"
        );

        let wander_config = wander::Config::new(config.seed ^ WANDER_SEED_SALT)
            .with_max_rerolls(config.max_rerolls);
        Ok(Self::from_world(world, player, wander_config))
    }

    /// Wraps an already populated world.
    #[must_use]
    pub fn from_world(world: World, player: EntityId, wander: wander::Config) -> Self {
        Self {
            world,
            player,
            control: PlayerControl::new(),
            wander: Wander::new(wander),
            commands: Vec::new(),
        }
    }

    /// Advances the simulation by one frame lasting `dt`.
    ///
    /// The clock moves first, so projectiles already in flight advance and
    /// cooldowns drain before this frame's moves and attacks are applied.
    /// A projectile fired this frame is first advanced by the next one.
    ///
    /// Returns every event the world reported, in the order it happened.
    pub fn tick<I>(&mut self, dt: Duration, input: &I) -> Vec<Event>
    where
        I: InputSource + ?Sized,
    {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let view = query::entity_view(&self.world);
        self.commands.clear();

        if let Some(player) = view.get(self.player) {
            self.control.handle(input, player, &mut self.commands);
        }

        let current = &self.world;
        self.wander.handle(
            &view,
            |id, direction| query::can_move(current, id, direction),
            &mut self.commands,
        );

        events.reserve(self.commands.len());
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Identifier of the player-controlled entity.
    #[must_use]
    pub fn player(&self) -> EntityId {
        self.player
    }
}

/// Wall-clock frame timer producing clamped deltas.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    last: Instant,
    max_delta: Duration,
}

impl FrameClock {
    /// Starts timing from now. Deltas longer than `max_delta` are clamped.
    #[must_use]
    pub fn start(max_delta: Duration) -> Self {
        Self {
            last: Instant::now(),
            max_delta,
        }
    }

    /// Time elapsed since the previous call, or since the clock started.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed.min(self.max_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_skirmish_system_control::HeldInput;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            world: WorldConfig {
                columns: 8,
                rows: 6,
                ..WorldConfig::default()
            },
            wanderers: 3,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn player_is_spawned_first() {
        let simulation = Simulation::new(&small_config()).expect("simulation");
        assert_eq!(simulation.player(), EntityId::new(0));
        assert_eq!(query::entity_view(simulation.world()).len(), 4);
    }

    #[test]
    fn rejects_invalid_entity_configuration() {
        let mut config = small_config();
        config.wanderer.width = 0.0;
        assert!(matches!(
            Simulation::new(&config),
            Err(SimulationError::Config(ConfigError::NonPositive { .. }))
        ));
    }

    #[test]
    fn prepared_grid_is_used_verbatim() {
        let grid = Grid::from_layout(64.0, &["...", "..."]).expect("grid");
        let simulation = Simulation::with_grid(&small_config(), grid).expect("simulation");
        assert_eq!(query::grid(simulation.world()).columns(), 3);
        assert!(query::grid(simulation.world())
            .cells()
            .iter()
            .all(|cell| cell.is_walkable()));
    }

    #[test]
    fn every_tick_starts_with_time_advancing() {
        let mut simulation = Simulation::new(&small_config()).expect("simulation");
        let dt = Duration::from_millis(16);
        let events = simulation.tick(dt, &HeldInput::NONE);
        assert_eq!(events.first(), Some(&Event::TimeAdvanced { dt }));
        assert_eq!(query::tick_index(simulation.world()), 1);
    }

    #[test]
    fn frame_clock_clamps_long_frames() {
        let mut clock = FrameClock::start(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(clock.tick(), Duration::ZERO);
    }

    #[test]
    fn frame_clock_measures_elapsed_time() {
        let mut clock = FrameClock::start(Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(5));
        let elapsed = clock.tick();
        assert!(elapsed >= Duration::from_millis(5), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(60));
    }
}
