#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player control system translating held input into world commands.

use grid_skirmish_core::{Command, Direction, EntitySnapshot};

/// Source of the player's held keys, sampled once per tick.
pub trait InputSource {
    /// Reports whether the key steering towards `direction` is held.
    fn is_direction_held(&self, direction: Direction) -> bool;

    /// Reports whether the attack key is held.
    fn is_attack_held(&self) -> bool;
}

/// Plain input state, useful for scripted runs and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldInput {
    /// Held up key.
    pub up: bool,
    /// Held down key.
    pub down: bool,
    /// Held left key.
    pub left: bool,
    /// Held right key.
    pub right: bool,
    /// Held attack key.
    pub attack: bool,
}

impl HeldInput {
    /// Input with nothing held.
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
        attack: false,
    };

    /// Returns a copy with the key for `direction` held.
    #[must_use]
    pub const fn holding(mut self, direction: Direction) -> Self {
        match direction {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
        self
    }

    /// Returns a copy with the attack key held.
    #[must_use]
    pub const fn attacking(mut self) -> Self {
        self.attack = true;
        self
    }
}

impl InputSource for HeldInput {
    fn is_direction_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn is_attack_held(&self) -> bool {
        self.attack
    }
}

/// Pure system that drives the player entity from an [`InputSource`].
#[derive(Debug, Default)]
pub struct PlayerControl;

impl PlayerControl {
    /// Creates a new player control system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits one move per held direction, in up, down, left, right order,
    /// followed by an attack when the attack key is held.
    ///
    /// Each move carries a single axis scaled by the player's speed.
    pub fn handle<I>(&self, input: &I, player: &EntitySnapshot, out: &mut Vec<Command>)
    where
        I: InputSource + ?Sized,
    {
        if let Some(speed) = player.speed {
            for direction in Direction::ALL {
                if !input.is_direction_held(direction) {
                    continue;
                }
                let (dx, dy) = direction.unit_vector();
                out.push(Command::MoveEntity {
                    entity: player.id,
                    dx: dx * speed,
                    dy: dy * speed,
                });
            }
        }

        if input.is_attack_held() {
            out.push(Command::Attack { entity: player.id });
        }
    }
}
