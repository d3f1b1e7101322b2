#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Skirmish engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what actually happened. Systems read immutable views such as
//! [`EntityView`] and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Skirmish.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    ///
    /// Attack cooldowns drain and every live projectile advances and is
    /// checked against the grid.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that an entity move by the provided pixel delta.
    ///
    /// Only one axis is ever applied per command; vertical intent wins over
    /// horizontal intent.
    MoveEntity {
        /// Identifier of the entity attempting to move.
        entity: EntityId,
        /// Horizontal component of the desired displacement in pixels.
        dx: f32,
        /// Vertical component of the desired displacement in pixels.
        dy: f32,
    },
    /// Requests that an entity fire a projectile along its facing.
    Attack {
        /// Identifier of the entity attempting to fire.
        entity: EntityId,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an entity moved.
    EntityMoved {
        /// Identifier of the entity that moved.
        entity: EntityId,
        /// Center of the entity before the move.
        from: Position,
        /// Center of the entity after the move.
        to: Position,
        /// Facing of the entity after the move.
        facing: Direction,
    },
    /// Reports that a move request was rejected by collision checks.
    ///
    /// The entity still turned towards the requested direction.
    MoveBlocked {
        /// Identifier of the entity that failed to move.
        entity: EntityId,
        /// Facing adopted by the entity despite the failed move.
        facing: Direction,
    },
    /// Confirms that an entity fired a projectile.
    ProjectileFired {
        /// Identifier of the firing entity.
        entity: EntityId,
        /// Identifier assigned to the projectile by its owner.
        projectile: ProjectileId,
        /// Position the projectile was spawned at.
        origin: Position,
        /// Direction of travel assigned to the projectile.
        direction: Direction,
    },
    /// Reports that an attack was ignored because the cooldown is running.
    AttackOnCooldown {
        /// Identifier of the entity whose attack was ignored.
        entity: EntityId,
        /// Remaining cooldown before the entity may fire again.
        ready_in: Duration,
    },
    /// Confirms that a projectile was removed from its owner's list.
    ProjectilePruned {
        /// Identifier of the entity that owned the projectile.
        entity: EntityId,
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
        /// Last position occupied by the projectile.
        position: Position,
        /// Reason the projectile was removed.
        reason: PruneReason,
    },
}

/// Reasons a projectile can be removed from the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PruneReason {
    /// The projectile entered a non-walkable cell.
    HitObstacle,
    /// The projectile left the map while off-map culling was enabled.
    LeftMap,
}

/// Cardinal directions used for facing, movement and projectiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Movement toward decreasing `y`.
    Up,
    /// Movement toward increasing `y`.
    Down,
    /// Movement toward decreasing `x`.
    Left,
    /// Movement toward increasing `x`.
    Right,
}

impl Direction {
    /// Every cardinal direction in movement priority order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit displacement associated with the direction in pixel space.
    #[must_use]
    pub const fn unit_vector(self) -> (f32, f32) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }
}

/// Point in pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate in pixels.
    pub x: f32,
    /// Vertical coordinate in pixels, growing downwards.
    pub y: f32,
}

impl Position {
    /// Creates a new position from pixel coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the position displaced by the provided delta.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Unique identifier assigned to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a projectile, unique among the projectiles of one owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Byte RGB colour used as a rendering hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Presentation hint attached to a cell type. Opaque to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileAppearance {
    /// Fill colour used when no texture is available.
    pub fill: Rgb,
    /// Key of the texture adapters should draw, if any.
    pub texture: Option<&'static str>,
}

/// Static attributes shared by every cell of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellType {
    /// Whether entities may stand on and projectiles may fly through the cell.
    pub walkable: bool,
    /// Whether the cell lets light through, when the kind specifies it.
    pub transparent: Option<bool>,
    /// Rendering hint for adapters.
    pub appearance: TileAppearance,
}

static FLOOR: CellType = CellType {
    walkable: true,
    transparent: None,
    appearance: TileAppearance {
        fill: Rgb::from_rgb(0xee, 0xee, 0xee),
        texture: Some("floor"),
    },
};

static WALL: CellType = CellType {
    walkable: false,
    transparent: Some(false),
    appearance: TileAppearance {
        fill: Rgb::from_rgb(0xbb, 0xbb, 0xbb),
        texture: None,
    },
};

/// Closed set of cell kinds that can appear in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Open ground.
    Floor,
    /// Solid obstacle.
    Wall,
}

impl CellKind {
    /// Shared attribute table for the kind.
    #[must_use]
    pub fn cell_type(self) -> &'static CellType {
        match self {
            Self::Floor => &FLOOR,
            Self::Wall => &WALL,
        }
    }

    /// Reports whether cells of this kind are walkable.
    #[must_use]
    pub fn walkable(self) -> bool {
        self.cell_type().walkable
    }
}

/// Single square of the world grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    kind: CellKind,
}

impl Cell {
    /// Creates a cell of the provided kind.
    #[must_use]
    pub const fn new(kind: CellKind) -> Self {
        Self { kind }
    }

    /// Kind tagged onto the cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Shared attribute table of the cell's kind.
    #[must_use]
    pub fn cell_type(&self) -> &'static CellType {
        self.kind.cell_type()
    }

    /// Reports whether the cell is walkable.
    #[must_use]
    pub fn is_walkable(&self) -> bool {
        self.kind.walkable()
    }
}

/// Capability set an entity is assembled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    /// The entity responds to move commands.
    pub movable: bool,
    /// The entity owns a cooldown-gated projectile launcher.
    pub attacking: bool,
    /// The entity is driven by the wander system.
    pub ai_driven: bool,
}

impl Capabilities {
    /// Player-controlled entity that walks and fires.
    pub const PLAYER: Self = Self {
        movable: true,
        attacking: true,
        ai_driven: false,
    };

    /// Autonomous entity that wanders and fires at random.
    pub const WANDERER: Self = Self {
        movable: true,
        attacking: true,
        ai_driven: true,
    };
}

/// Wander tuning attached to ai-driven entities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WanderTuning {
    /// Chance per tick of abandoning a clear heading.
    pub reroll_probability: f64,
    /// Chance per tick of attempting an attack.
    pub attack_probability: f64,
}

/// Construction parameters for a single entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Center the entity spawns at.
    pub spawn: Position,
    /// Width of the bounding box in pixels.
    pub width: f32,
    /// Height of the bounding box in pixels.
    pub height: f32,
    /// Pixels covered by one movement step.
    ///
    /// Collision only probes the pixel just past the box edge, so a step
    /// longer than one pixel can push the box up to `speed - 1` pixels into
    /// a wall.
    pub speed: f32,
    /// Seconds that must elapse between two shots.
    pub cooldown_secs: f32,
    /// Pixels a projectile covers per tick.
    pub projectile_speed: f32,
    /// Starting health.
    pub health: u32,
    /// Chance per tick that a wandering entity abandons a clear heading.
    pub wander_reroll_probability: f64,
    /// Chance per tick that a wandering entity attempts an attack.
    pub attack_probability: f64,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            spawn: Position::new(17.0, 27.0),
            width: 34.0,
            height: 54.0,
            speed: 1.0,
            cooldown_secs: 0.2,
            projectile_speed: 5.0,
            health: 10,
            wander_reroll_probability: 0.01,
            attack_probability: 0.01,
        }
    }
}

impl EntityConfig {
    /// Checks every field, reporting the first malformed one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("width", self.width)?;
        require_positive("height", self.height)?;
        require_positive("speed", self.speed)?;
        require_positive("projectile_speed", self.projectile_speed)?;
        if !self.spawn.x.is_finite() || !self.spawn.y.is_finite() {
            return Err(ConfigError::InvalidSpawn {
                x: self.spawn.x,
                y: self.spawn.y,
            });
        }
        if !self.cooldown_secs.is_finite() || self.cooldown_secs < 0.0 {
            return Err(ConfigError::InvalidCooldown {
                value: self.cooldown_secs,
            });
        }
        require_probability("wander_reroll_probability", self.wander_reroll_probability)?;
        require_probability("attack_probability", self.attack_probability)
    }

    /// Cooldown resolved to whole microseconds. Malformed values collapse
    /// to zero.
    #[must_use]
    pub fn cooldown_duration(&self) -> Duration {
        if !self.cooldown_secs.is_finite() || self.cooldown_secs <= 0.0 {
            return Duration::ZERO;
        }
        let micros = (f64::from(self.cooldown_secs) * 1_000_000.0).round();
        Duration::from_micros(micros as u64)
    }

    /// Wander tuning derived from the configured probabilities.
    #[must_use]
    pub fn wander_tuning(&self) -> WanderTuning {
        WanderTuning {
            reroll_probability: self.wander_reroll_probability,
            attack_probability: self.attack_probability,
        }
    }
}

/// Policy applied to projectiles whose position falls outside the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffMapPolicy {
    /// Off-map projectiles keep flying and are never pruned.
    #[default]
    Keep,
    /// Off-map projectiles are pruned like projectiles that hit a wall.
    Cull,
}

/// Parameters used to generate the world grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Side length of a square cell in pixels.
    pub cell_size: f32,
    /// Chance that any given cell is generated as a wall.
    pub wall_probability: f64,
    /// Treatment of projectiles that leave the map.
    pub off_map_projectiles: OffMapPolicy,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            columns: 36,
            rows: 20,
            cell_size: 64.0,
            wall_probability: 0.2,
            off_map_projectiles: OffMapPolicy::Keep,
        }
    }
}

impl WorldConfig {
    /// Checks every field, reporting the first malformed one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        require_positive("cell_size", self.cell_size)?;
        require_probability("wall_probability", self.wall_probability)
    }
}

/// Reasons a configuration can be rejected at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A dimension, speed or size was zero, negative or not finite.
    #[error("{field} must be a positive, finite number (got {value})")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f32,
    },
    /// The cooldown was negative or not finite.
    #[error("cooldown_secs must be a finite number of seconds >= 0 (got {value})")]
    InvalidCooldown {
        /// Value that was rejected.
        value: f32,
    },
    /// The spawn position contained a non-finite coordinate.
    #[error("spawn position must be finite (got {x}, {y})")]
    InvalidSpawn {
        /// Rejected horizontal coordinate.
        x: f32,
        /// Rejected vertical coordinate.
        y: f32,
    },
    /// A probability fell outside `[0, 1]`.
    #[error("{field} must be a probability within [0, 1] (got {value})")]
    ProbabilityOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f64,
    },
    /// The grid would contain no cells.
    #[error("grid must contain at least one cell (got {columns}x{rows})")]
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn require_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}

/// Immutable representation of a single entity's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Unique identifier assigned to the entity.
    pub id: EntityId,
    /// Center of the entity in pixels.
    pub position: Position,
    /// Width of the bounding box in pixels.
    pub width: f32,
    /// Height of the bounding box in pixels.
    pub height: f32,
    /// Direction the entity currently faces.
    pub facing: Direction,
    /// Current health.
    pub health: u32,
    /// Step size for movable entities.
    pub speed: Option<f32>,
    /// Remaining cooldown for attacking entities.
    pub cooldown: Option<Duration>,
    /// Wander tuning for ai-driven entities.
    pub wander: Option<WanderTuning>,
    /// Number of live projectiles owned by the entity.
    pub projectiles: usize,
}

/// Read-only snapshot describing all entities in the world.
#[derive(Clone, Debug, Default)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of entities captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Entity that fired the projectile.
    pub owner: EntityId,
    /// Identifier of the projectile within its owner's list.
    pub id: ProjectileId,
    /// Current position in pixels.
    pub position: Position,
    /// Direction of travel.
    pub direction: Direction,
    /// Pixels covered per tick.
    pub speed: f32,
}

/// Read-only snapshot describing every live projectile.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| (snapshot.owner, snapshot.id));
        Self { snapshots }
    }

    /// Iterator over the captured snapshots ordered by owner then id.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}
