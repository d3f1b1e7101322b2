//! Cooldown-gated projectile launcher owned by attacking entities.

use std::time::Duration;

use grid_skirmish_core::{
    Direction, EntityConfig, OffMapPolicy, Position, ProjectileId, PruneReason,
};

use crate::WalkabilityQuery;

/// Projectile travelling in a straight cardinal line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    id: ProjectileId,
    position: Position,
    direction: Direction,
    speed: f32,
}

impl Projectile {
    /// Identifier unique among the owner's projectiles.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Current position in pixels.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Pixels covered per tick.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    fn advance(&mut self) {
        let (dx, dy) = self.direction.unit_vector();
        self.position = self.position.offset(dx * self.speed, dy * self.speed);
    }
}

/// Projectile removed during an [`Arsenal::advance`] pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pruned {
    /// Projectile as it was when removed.
    pub projectile: Projectile,
    /// Why the projectile was removed.
    pub reason: PruneReason,
}

/// Attack capability: cooldown timer plus the list of owned projectiles.
#[derive(Clone, Debug)]
pub struct Arsenal {
    cooldown_duration: Duration,
    cooldown: Duration,
    projectile_speed: f32,
    projectiles: Vec<Projectile>,
    next_projectile: u32,
}

impl Arsenal {
    /// Creates a ready-to-fire arsenal.
    #[must_use]
    pub fn new(cooldown_duration: Duration, projectile_speed: f32) -> Self {
        Self {
            cooldown_duration,
            cooldown: Duration::ZERO,
            projectile_speed,
            projectiles: Vec::new(),
            next_projectile: 0,
        }
    }

    /// Creates an arsenal from validated entity configuration.
    #[must_use]
    pub fn from_config(config: &EntityConfig) -> Self {
        Self::new(config.cooldown_duration(), config.projectile_speed)
    }

    /// Remaining time before the next shot is allowed.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Live projectiles in firing order.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Fires a projectile from `origin` towards `facing` unless the cooldown
    /// is still running.
    pub fn attack(&mut self, origin: Position, facing: Direction) -> Option<ProjectileId> {
        if !self.cooldown.is_zero() {
            return None;
        }
        self.cooldown = self.cooldown_duration;

        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);
        self.projectiles.push(Projectile {
            id,
            position: origin,
            direction: facing,
            speed: self.projectile_speed,
        });
        Some(id)
    }

    /// Drains the cooldown, moves every projectile one step and then prunes
    /// the ones that ended inside a wall.
    ///
    /// Off-map projectiles are only pruned under [`OffMapPolicy::Cull`].
    pub fn advance<Q>(
        &mut self,
        dt: Duration,
        query: &Q,
        off_map: OffMapPolicy,
        pruned: &mut Vec<Pruned>,
    ) where
        Q: WalkabilityQuery + ?Sized,
    {
        self.cooldown = self.cooldown.saturating_sub(dt);

        for projectile in &mut self.projectiles {
            projectile.advance();
        }

        self.projectiles.retain(|projectile| {
            let Position { x, y } = projectile.position;
            let reason = match (query.walkable_at(x, y), off_map) {
                (Some(false), _) => PruneReason::HitObstacle,
                (None, OffMapPolicy::Cull) => PruneReason::LeftMap,
                _ => return true,
            };
            pruned.push(Pruned {
                projectile: *projectile,
                reason,
            });
            false
        });
    }
}
