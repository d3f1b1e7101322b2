#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wander system steering ai-driven entities around the grid.
//!
//! Every ai-driven entity keeps a heading between ticks. The heading is kept
//! while it stays clear, re-rolled uniformly when blocked, and occasionally
//! re-rolled at random to break up long straight walks. The system never
//! touches the world: it reads an [`EntityView`] plus a movement probe and
//! answers with [`Command`] values.

use std::collections::BTreeMap;

use grid_skirmish_core::{Command, Direction, EntityId, EntitySnapshot, EntityView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// Default bound on heading draws per entity per tick.
pub const DEFAULT_MAX_REROLLS: u32 = 64;

/// Configuration parameters required to construct the wander system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    max_rerolls: u32,
}

impl Config {
    /// Creates a configuration seeded with `rng_seed` and the default
    /// re-roll bound.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            max_rerolls: DEFAULT_MAX_REROLLS,
        }
    }

    /// Overrides how many heading draws an entity may take in one tick.
    #[must_use]
    pub const fn with_max_rerolls(mut self, max_rerolls: u32) -> Self {
        self.max_rerolls = max_rerolls;
        self
    }
}

/// Pure system that emits movement and attack commands for ai-driven entities.
#[derive(Debug)]
pub struct Wander {
    headings: BTreeMap<EntityId, Direction>,
    rng: ChaCha8Rng,
    max_rerolls: u32,
}

impl Wander {
    /// Creates a new wander system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            headings: BTreeMap::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            max_rerolls: config.max_rerolls,
        }
    }

    /// Heading currently persisted for `entity`, if it has wandered before.
    #[must_use]
    pub fn heading(&self, entity: EntityId) -> Option<Direction> {
        self.headings.get(&entity).copied()
    }

    /// Steers every ai-driven entity in the view for one tick.
    ///
    /// `can_move` reports whether an entity could currently step towards a
    /// direction; it is consulted against the world as it stands when the
    /// system runs.
    pub fn handle<F>(&mut self, entities: &EntityView, mut can_move: F, out: &mut Vec<Command>)
    where
        F: FnMut(EntityId, Direction) -> bool,
    {
        for snapshot in entities.iter() {
            let Some(tuning) = snapshot.wander else {
                continue;
            };

            if let Some(direction) =
                self.settle_heading(snapshot, tuning.reroll_probability, &mut can_move)
            {
                let speed = snapshot.speed.unwrap_or(0.0);
                let (dx, dy) = direction.unit_vector();
                out.push(Command::MoveEntity {
                    entity: snapshot.id,
                    dx: dx * speed,
                    dy: dy * speed,
                });
            }

            if self.rng.gen_bool(tuning.attack_probability) {
                out.push(Command::Attack {
                    entity: snapshot.id,
                });
            }
        }

        self.headings
            .retain(|id, _| entities.get(*id).is_some_and(|s| s.wander.is_some()));
    }

    fn settle_heading<F>(
        &mut self,
        snapshot: &EntitySnapshot,
        reroll_probability: f64,
        can_move: &mut F,
    ) -> Option<Direction>
    where
        F: FnMut(EntityId, Direction) -> bool,
    {
        let id = snapshot.id;
        let mut heading = self.heading(id).unwrap_or(Direction::Right);
        let mut settled = None;

        for _ in 0..=self.max_rerolls {
            if can_move(id, heading) && !self.rng.gen_bool(reroll_probability) {
                settled = Some(heading);
                break;
            }
            heading = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
        }

        let _ = self.headings.insert(id, heading);
        if settled.is_none() {
            trace!(entity = id.get(), ?heading, "wander heading did not settle");
        }
        settled
    }
}
