//! Positioned bounding box shared by every entity, plus the movement
//! controller that resolves step requests against the grid.

use grid_skirmish_core::{Direction, EntityConfig, Position};

use crate::{collision, WalkabilityQuery};

/// Axis-aligned body centred on its position.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    position: Position,
    width: f32,
    height: f32,
    facing: Direction,
    health: u32,
}

impl Body {
    /// Creates a body facing right.
    #[must_use]
    pub const fn new(position: Position, width: f32, height: f32, health: u32) -> Self {
        Self {
            position,
            width,
            height,
            facing: Direction::Right,
            health,
        }
    }

    /// Creates a body from validated entity configuration.
    #[must_use]
    pub fn from_config(config: &EntityConfig) -> Self {
        Self::new(config.spawn, config.width, config.height, config.health)
    }

    /// Center of the body in pixels.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Width of the bounding box.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the bounding box.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Direction the body currently faces.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Reports whether the body may step towards `direction`.
    #[must_use]
    pub fn can_move<Q>(&self, direction: Direction, query: &Q) -> bool
    where
        Q: WalkabilityQuery + ?Sized,
    {
        collision::can_move_direction(self, direction, query)
    }

    /// Attempts to move by `(dx, dy)`, applying at most one axis.
    ///
    /// Facing turns towards the intent before any collision check, so a
    /// blocked call still changes orientation. Directions are tried up,
    /// down, left, right and the first clear one is committed using its own
    /// component of the delta.
    ///
    /// Only the pixel adjacent to the box edge is probed, so a component
    /// larger than one pixel may overlap a wall after the step.
    pub fn move_by<Q>(&mut self, dx: f32, dy: f32, query: &Q) -> bool
    where
        Q: WalkabilityQuery + ?Sized,
    {
        if let Some(facing) = facing_for(dx, dy) {
            self.facing = facing;
        }

        let step = if dy < 0.0 && self.can_move(Direction::Up, query) {
            (0.0, dy)
        } else if dy > 0.0 && self.can_move(Direction::Down, query) {
            (0.0, dy)
        } else if dx < 0.0 && self.can_move(Direction::Left, query) {
            (dx, 0.0)
        } else if dx > 0.0 && self.can_move(Direction::Right, query) {
            (dx, 0.0)
        } else {
            return false;
        };

        self.position = self.position.offset(step.0, step.1);
        true
    }
}

/// Facing implied by a movement intent, using the movement tie-break order.
#[must_use]
pub fn facing_for(dx: f32, dy: f32) -> Option<Direction> {
    if dy < 0.0 {
        Some(Direction::Up)
    } else if dy > 0.0 {
        Some(Direction::Down)
    } else if dx < 0.0 {
        Some(Direction::Left)
    } else if dx > 0.0 {
        Some(Direction::Right)
    } else {
        None
    }
}
