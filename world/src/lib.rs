#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Skirmish.
//!
//! Every entity is one [`Body`] plus optional capability components: a step
//! size when it is movable, an [`Arsenal`] when it can attack and wander
//! tuning when it is ai-driven. The grid is passed explicitly to each
//! capability, so nothing reaches for a process-wide world.

mod arsenal;
mod body;
pub mod collision;
mod grid;

use std::time::Duration;

use grid_skirmish_core::{
    Capabilities, Command, ConfigError, EntityConfig, EntityId, Event, OffMapPolicy,
    WanderTuning, WorldConfig, WELCOME_BANNER,
};
use rand::Rng;
use tracing::{debug, trace};

pub use arsenal::{Arsenal, Projectile, Pruned};
pub use body::{facing_for, Body};
pub use grid::{Grid, LayoutError, WalkabilityQuery};

/// Represents the authoritative Grid Skirmish world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    off_map: OffMapPolicy,
    entities: Vec<Entity>,
    tick_index: u64,
    pruned: Vec<Pruned>,
}

impl World {
    /// Creates an empty world around an existing grid.
    #[must_use]
    pub fn new(grid: Grid, off_map: OffMapPolicy) -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid,
            off_map,
            entities: Vec::new(),
            tick_index: 0,
            pruned: Vec::new(),
        }
    }

    /// Generates a fresh grid from the configuration and wraps it in an
    /// empty world.
    pub fn generate<R>(config: &WorldConfig, rng: &mut R) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        let grid = Grid::generate(config, rng)?;
        debug!(
            columns = grid.columns(),
            rows = grid.rows(),
            cell_size = grid.cell_size(),
            walls = grid.cells().iter().filter(|cell| !cell.is_walkable()).count(),
            "world generated"
        );
        Ok(Self::new(grid, config.off_map_projectiles))
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(index_of(id)?)
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(index_of(id)?)
    }
}

#[derive(Debug)]
struct Entity {
    id: EntityId,
    body: Body,
    speed: Option<f32>,
    arsenal: Option<Arsenal>,
    wander: Option<WanderTuning>,
}

/// Adds an entity assembled from `capabilities` to the world.
///
/// Identifiers are allocated in insertion order, which is also the order in
/// which entities are updated each tick.
pub fn spawn_entity(
    world: &mut World,
    capabilities: Capabilities,
    config: &EntityConfig,
) -> Result<EntityId, ConfigError> {
    config.validate()?;

    let id = EntityId::new(u32::try_from(world.entities.len()).unwrap_or(u32::MAX));
    let entity = Entity {
        id,
        body: Body::from_config(config),
        speed: capabilities.movable.then_some(config.speed),
        arsenal: capabilities
            .attacking
            .then(|| Arsenal::from_config(config)),
        wander: capabilities.ai_driven.then(|| config.wander_tuning()),
    };
    debug!(
        entity = id.get(),
        x = config.spawn.x,
        y = config.spawn.y,
        ?capabilities,
        "entity spawned"
    );
    world.entities.push(entity);
    Ok(id)
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands naming unknown entities, or entities lacking the capability the
/// command needs, are ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => advance_projectiles(world, dt, out_events),
        Command::MoveEntity { entity, dx, dy } => {
            let grid = &world.grid;
            let Some(state) = index_of(entity).and_then(|index| world.entities.get_mut(index))
            else {
                return;
            };
            if state.speed.is_none() {
                return;
            }

            let from = state.body.position();
            if state.body.move_by(dx, dy, grid) {
                let to = state.body.position();
                trace!(entity = entity.get(), x = to.x, y = to.y, "entity moved");
                out_events.push(Event::EntityMoved {
                    entity,
                    from,
                    to,
                    facing: state.body.facing(),
                });
            } else {
                out_events.push(Event::MoveBlocked {
                    entity,
                    facing: state.body.facing(),
                });
            }
        }
        Command::Attack { entity } => {
            let Some(state) = world.entity_mut(entity) else {
                return;
            };
            let origin = state.body.position();
            let direction = state.body.facing();
            let Some(arsenal) = state.arsenal.as_mut() else {
                return;
            };

            match arsenal.attack(origin, direction) {
                Some(projectile) => {
                    trace!(entity = entity.get(), ?direction, "projectile fired");
                    out_events.push(Event::ProjectileFired {
                        entity,
                        projectile,
                        origin,
                        direction,
                    });
                }
                None => out_events.push(Event::AttackOnCooldown {
                    entity,
                    ready_in: arsenal.cooldown(),
                }),
            }
        }
    }
}

fn advance_projectiles(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    world.tick_index = world.tick_index.saturating_add(1);
    out_events.push(Event::TimeAdvanced { dt });

    let grid = &world.grid;
    let pruned = &mut world.pruned;
    for entity in &mut world.entities {
        let Some(arsenal) = entity.arsenal.as_mut() else {
            continue;
        };
        arsenal.advance(dt, grid, world.off_map, pruned);
        for removed in pruned.drain(..) {
            let position = removed.projectile.position();
            trace!(
                entity = entity.id.get(),
                x = position.x,
                y = position.y,
                reason = ?removed.reason,
                "projectile pruned"
            );
            out_events.push(Event::ProjectilePruned {
                entity: entity.id,
                projectile: removed.projectile.id(),
                position,
                reason: removed.reason,
            });
        }
    }
}

fn index_of(id: EntityId) -> Option<usize> {
    usize::try_from(id.get()).ok()
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use grid_skirmish_core::{
        Direction, EntityId, EntitySnapshot, EntityView, ProjectileSnapshot, ProjectileView,
    };

    use super::{Entity, Grid, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only snapshot of a single entity.
    #[must_use]
    pub fn entity(world: &World, id: EntityId) -> Option<EntitySnapshot> {
        world.entity(id).map(snapshot)
    }

    /// Captures a read-only view of every entity.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        EntityView::from_snapshots(world.entities.iter().map(snapshot).collect())
    }

    /// Captures a read-only view of every live projectile.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots = world
            .entities
            .iter()
            .filter_map(|entity| entity.arsenal.as_ref().map(|arsenal| (entity.id, arsenal)))
            .flat_map(|(owner, arsenal)| {
                arsenal
                    .projectiles()
                    .iter()
                    .map(move |projectile| ProjectileSnapshot {
                        owner,
                        id: projectile.id(),
                        position: projectile.position(),
                        direction: projectile.direction(),
                        speed: projectile.speed(),
                    })
            })
            .collect();
        ProjectileView::from_snapshots(snapshots)
    }

    /// Reports whether the entity is movable and clear to step towards
    /// `direction`.
    #[must_use]
    pub fn can_move(world: &World, id: EntityId, direction: Direction) -> bool {
        world
            .entity(id)
            .filter(|entity| entity.speed.is_some())
            .is_some_and(|entity| entity.body.can_move(direction, &world.grid))
    }

    fn snapshot(entity: &Entity) -> EntitySnapshot {
        EntitySnapshot {
            id: entity.id,
            position: entity.body.position(),
            width: entity.body.width(),
            height: entity.body.height(),
            facing: entity.body.facing(),
            health: entity.body.health(),
            speed: entity.speed,
            cooldown: entity.arsenal.as_ref().map(|arsenal| arsenal.cooldown()),
            wander: entity.wander,
            projectiles: entity
                .arsenal
                .as_ref()
                .map_or(0, |arsenal| arsenal.projectiles().len()),
        }
    }
}
