use grid_skirmish_core::{
    Capabilities, CellKind, Command, Direction, EntityConfig, EntityId, Event, OffMapPolicy,
    Position,
};
use grid_skirmish_world::{self as world, collision, query, Body, Grid, World};

fn world_with_player(grid: Grid, spawn: Position) -> (World, EntityId) {
    world_with(
        grid,
        EntityConfig {
            spawn,
            ..EntityConfig::default()
        },
    )
}

fn world_with(grid: Grid, config: EntityConfig) -> (World, EntityId) {
    let mut world = World::new(grid, OffMapPolicy::Keep);
    let player = world::spawn_entity(&mut world, Capabilities::PLAYER, &config)
        .expect("valid player configuration");
    (world, player)
}

fn move_entity(world: &mut World, entity: EntityId, dx: f32, dy: f32) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::MoveEntity { entity, dx, dy }, &mut events);
    events
}

#[test]
fn five_upward_steps_on_open_ground_move_five_pixels() {
    let grid = Grid::filled(10, 10, 64.0, CellKind::Floor).expect("grid");
    let (mut world, player) = world_with_player(grid, Position::new(320.0, 320.0));

    for step in 1..=5 {
        let events = move_entity(&mut world, player, 0.0, -1.0);
        assert!(
            matches!(events.as_slice(), [Event::EntityMoved { .. }]),
            "step {step} should succeed: {events:?}"
        );
        let snapshot = query::entity(&world, player).expect("player snapshot");
        assert_eq!(snapshot.facing, Direction::Up);
        assert_eq!(snapshot.position, Position::new(320.0, 320.0 - step as f32));
    }
}

#[test]
fn simultaneous_up_and_left_moves_up_only() {
    let grid = Grid::filled(10, 10, 64.0, CellKind::Floor).expect("grid");
    let (mut world, player) = world_with_player(grid, Position::new(320.0, 320.0));

    let _ = move_entity(&mut world, player, -1.0, -1.0);

    let snapshot = query::entity(&world, player).expect("player snapshot");
    assert_eq!(snapshot.position, Position::new(320.0, 319.0));
}

#[test]
fn blocked_move_still_turns_the_entity() {
    // A body exactly one cell in size, boxed in by walls on every side.
    let grid = Grid::from_layout(64.0, &["###", "#.#", "###"]).expect("grid");
    let (mut world, player) = world_with(
        grid,
        EntityConfig {
            spawn: Position::new(96.0, 96.0),
            width: 64.0,
            height: 64.0,
            ..EntityConfig::default()
        },
    );

    for (dx, dy, facing) in [
        (0.0, -1.0, Direction::Up),
        (-1.0, 0.0, Direction::Left),
        (0.0, 1.0, Direction::Down),
    ] {
        let events = move_entity(&mut world, player, dx, dy);
        assert_eq!(
            events,
            vec![Event::MoveBlocked {
                entity: player,
                facing,
            }]
        );
        let snapshot = query::entity(&world, player).expect("player snapshot");
        assert_eq!(snapshot.facing, facing);
        assert_eq!(snapshot.position, Position::new(96.0, 96.0));
    }
}

#[test]
fn walks_until_the_wall_edge_and_stops() {
    // Column 2 is a wall starting at x = 128. Right probes sit at x + 17.
    let grid = Grid::from_layout(64.0, &["..#", "..#", "..#"]).expect("grid");
    let (mut world, player) = world_with_player(grid, Position::new(100.0, 96.0));

    let mut moved = 0;
    while !matches!(
        move_entity(&mut world, player, 1.0, 0.0).as_slice(),
        [Event::MoveBlocked { .. }]
    ) {
        moved += 1;
        assert!(moved < 1_000, "entity walked through a wall");
    }

    let snapshot = query::entity(&world, player).expect("player snapshot");
    assert_eq!(snapshot.position, Position::new(111.0, 96.0));
    assert!(!query::can_move(&world, player, Direction::Right));
    assert!(query::can_move(&world, player, Direction::Left));
}

#[test]
fn leading_corners_decide_movement() {
    let grid = Grid::from_layout(64.0, &["....", "....", "..#.", "...."]).expect("grid");
    // Box spans x in [83, 117) and y in [73, 127); the down probes land at
    // y = 127 (row 1), so the wall in row 2 is not yet touched.
    let mut body = Body::new(Position::new(100.0, 100.0), 34.0, 54.0, 10);
    assert!(collision::can_move_direction(&body, Direction::Down, &grid));

    // Shift so the right half of the box sits over column 2 and the bottom
    // edge touches row 2: one corner floor, one corner wall.
    body = Body::new(Position::new(120.0, 101.0), 34.0, 54.0, 10);
    let probes = collision::probe_points(&body, Direction::Down);
    assert_eq!(probes, [Position::new(103.0, 128.0), Position::new(136.0, 128.0)]);
    assert!(!collision::can_move_direction(&body, Direction::Down, &grid));
}
