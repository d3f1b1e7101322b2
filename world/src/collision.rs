//! Corner probes deciding whether a body may step in a cardinal direction.
//!
//! The check looks at the two pixels just beyond the leading edge of the
//! body's bounding box. It is a point check rather than a swept one, so a
//! step larger than a cell can tunnel through thin walls.

use grid_skirmish_core::{Direction, Position};

use crate::{Body, WalkabilityQuery};

/// Pixels tested when `body` attempts to step towards `direction`.
#[must_use]
pub fn probe_points(body: &Body, direction: Direction) -> [Position; 2] {
    let Position { x, y } = body.position();
    let half_width = body.width() / 2.0;
    let half_height = body.height() / 2.0;
    let left = x - half_width;
    let right = x + half_width;
    let top = y - half_height;
    let bottom = y + half_height;

    match direction {
        Direction::Up => [
            Position::new(left, top - 1.0),
            Position::new(right - 1.0, top - 1.0),
        ],
        Direction::Down => [
            Position::new(left, bottom),
            Position::new(right - 1.0, bottom),
        ],
        Direction::Left => [
            Position::new(left - 1.0, top),
            Position::new(left - 1.0, bottom - 1.0),
        ],
        Direction::Right => [
            Position::new(right, top),
            Position::new(right, bottom - 1.0),
        ],
    }
}

/// Reports whether both leading corners resolve to walkable cells.
///
/// Off-map probes block movement.
#[must_use]
pub fn can_move_direction<Q>(body: &Body, direction: Direction, query: &Q) -> bool
where
    Q: WalkabilityQuery + ?Sized,
{
    probe_points(body, direction)
        .iter()
        .all(|probe| query.walkable_at(probe.x, probe.y) == Some(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid;
    use grid_skirmish_core::CellKind;

    fn body_at(x: f32, y: f32) -> Body {
        Body::new(Position::new(x, y), 34.0, 54.0, 10)
    }

    #[test]
    fn probes_hug_the_leading_edge() {
        let body = body_at(100.0, 100.0);
        assert_eq!(
            probe_points(&body, Direction::Up),
            [Position::new(83.0, 72.0), Position::new(116.0, 72.0)]
        );
        assert_eq!(
            probe_points(&body, Direction::Down),
            [Position::new(83.0, 127.0), Position::new(116.0, 127.0)]
        );
        assert_eq!(
            probe_points(&body, Direction::Left),
            [Position::new(82.0, 73.0), Position::new(82.0, 126.0)]
        );
        assert_eq!(
            probe_points(&body, Direction::Right),
            [Position::new(117.0, 73.0), Position::new(117.0, 126.0)]
        );
    }

    #[test]
    fn open_floor_allows_every_direction() {
        let grid = Grid::filled(10, 10, 64.0, CellKind::Floor).expect("grid");
        let body = body_at(320.0, 320.0);
        for direction in Direction::ALL {
            assert!(can_move_direction(&body, direction, &grid), "{direction:?}");
        }
    }

    #[test]
    fn one_blocked_corner_is_enough_to_block() {
        // Body spans x in [47, 81) and y in [64, 118): its up probes land in
        // row 0, one in the wall column and one on floor.
        let grid = Grid::from_layout(64.0, &["#...", "....", "...."]).expect("grid");
        let body = body_at(64.0, 91.0);
        assert!(!can_move_direction(&body, Direction::Up, &grid));
        assert!(can_move_direction(&body, Direction::Down, &grid));
    }

    #[test]
    fn map_edge_blocks_movement() {
        let grid = Grid::filled(4, 4, 64.0, CellKind::Floor).expect("grid");
        let body = body_at(17.0, 27.0);
        assert!(!can_move_direction(&body, Direction::Up, &grid));
        assert!(!can_move_direction(&body, Direction::Left, &grid));
        assert!(can_move_direction(&body, Direction::Right, &grid));
        assert!(can_move_direction(&body, Direction::Down, &grid));
    }
}
