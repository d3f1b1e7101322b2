use grid_skirmish_core::{
    Capabilities, CellKind, Direction, EntityConfig, Event, OffMapPolicy, Position,
};
use grid_skirmish_system_control::{HeldInput, InputSource, PlayerControl};
use grid_skirmish_world::{self as world, query, Grid, World};

struct ScriptedInput {
    frames: Vec<HeldInput>,
    cursor: usize,
}

impl InputSource for ScriptedInput {
    fn is_direction_held(&self, direction: Direction) -> bool {
        self.frames[self.cursor].is_direction_held(direction)
    }

    fn is_attack_held(&self) -> bool {
        self.frames[self.cursor].is_attack_held()
    }
}

fn drive(world: &mut World, input: &dyn InputSource) -> Vec<Event> {
    let player = query::entity_view(world)
        .iter()
        .next()
        .cloned()
        .expect("player present");
    let mut commands = Vec::new();
    PlayerControl::new().handle(input, &player, &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn blocked_key_still_lets_the_next_key_move() {
    let grid = Grid::filled(10, 10, 64.0, CellKind::Floor).expect("grid");
    let mut world = World::new(grid, OffMapPolicy::Keep);
    let player = world::spawn_entity(&mut world, Capabilities::PLAYER, &EntityConfig::default())
        .expect("player");

    let input = HeldInput::NONE
        .holding(Direction::Up)
        .holding(Direction::Right);
    let events = drive(&mut world, &input);

    assert_eq!(
        events,
        vec![
            Event::MoveBlocked {
                entity: player,
                facing: Direction::Up,
            },
            Event::EntityMoved {
                entity: player,
                from: Position::new(17.0, 27.0),
                to: Position::new(18.0, 27.0),
                facing: Direction::Right,
            },
        ]
    );
}

#[test]
fn scripted_frames_walk_and_shoot() {
    let grid = Grid::filled(10, 10, 64.0, CellKind::Floor).expect("grid");
    let mut world = World::new(grid, OffMapPolicy::Keep);
    let config = EntityConfig {
        spawn: Position::new(320.0, 320.0),
        ..EntityConfig::default()
    };
    let player = world::spawn_entity(&mut world, Capabilities::PLAYER, &config).expect("player");

    let mut input = ScriptedInput {
        frames: vec![
            HeldInput::NONE.holding(Direction::Down),
            HeldInput::NONE.holding(Direction::Down),
            HeldInput::NONE.attacking(),
        ],
        cursor: 0,
    };
    let mut events = Vec::new();
    for cursor in 0..input.frames.len() {
        input.cursor = cursor;
        events.extend(drive(&mut world, &input));
    }

    assert!(matches!(
        events.last(),
        Some(Event::ProjectileFired {
            direction: Direction::Down,
            ..
        })
    ));
    let snapshot = query::entity(&world, player).expect("player snapshot");
    assert_eq!(snapshot.position, Position::new(320.0, 322.0));
    assert_eq!(snapshot.projectiles, 1);
    assert_eq!(
        query::projectile_view(&world).len(),
        1,
        "projectile should be live until the next tick"
    );
}
