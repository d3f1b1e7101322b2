//! Text backend drawing one character per grid cell.

use std::io::Write;

use anyhow::{Context, Result};
use glam::Vec2;
use grid_skirmish_core::CellKind;
use grid_skirmish_rendering::{RenderingBackend, Scene};

const FLOOR: char = '.';
const WALL: char = '#';
const FOCUSED: char = '@';
const ENTITY: char = 'w';
const PROJECTILE: char = '*';

/// Writes each presented scene as a character map.
///
/// Later layers win when several things share a cell: projectiles are drawn
/// over tiles, entities over projectiles and the focused entity last.
#[derive(Debug)]
pub(crate) struct AsciiBackend<W> {
    out: W,
}

impl<W: Write> AsciiBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for AsciiBackend<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        let columns = scene.columns as usize;
        let mut canvas: Vec<char> = scene
            .tiles
            .iter()
            .map(|tile| match tile.kind {
                CellKind::Floor => FLOOR,
                CellKind::Wall => WALL,
            })
            .collect();

        let mut plot = |point: Vec2, glyph: char| {
            let cell = point / scene.cell_size;
            if cell.x < 0.0 || cell.y < 0.0 {
                return;
            }
            let (column, row) = (cell.x as usize, cell.y as usize);
            if column < columns {
                if let Some(slot) = canvas.get_mut(row * columns + column) {
                    *slot = glyph;
                }
            }
        };

        for projectile in &scene.projectiles {
            plot(projectile.position, PROJECTILE);
        }
        for entity in scene.entities.iter().filter(|entity| !entity.focused) {
            plot(entity.center, ENTITY);
        }
        if let Some(focused) = scene.focused() {
            plot(focused.center, FOCUSED);
        }

        writeln!(self.out, "tick {}", scene.tick).context("failed to write frame header")?;
        for row in canvas.chunks(columns.max(1)) {
            let line: String = row.iter().collect();
            writeln!(self.out, "{line}").context("failed to write frame row")?;
        }
        self.out.flush().context("failed to flush frame")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_skirmish_core::{Capabilities, EntityConfig, OffMapPolicy, Position};
    use grid_skirmish_rendering::DEFAULT_VIEWPORT;
    use grid_skirmish_world::{self as world, Grid, World};

    #[test]
    fn draws_tiles_entities_and_focus() {
        let grid = Grid::from_layout(64.0, &["...#", "#..."]).expect("grid");
        let mut world = World::new(grid, OffMapPolicy::Keep);
        let player = EntityConfig {
            spawn: Position::new(32.0, 32.0),
            ..EntityConfig::default()
        };
        let wanderer = EntityConfig {
            spawn: Position::new(160.0, 96.0),
            ..EntityConfig::default()
        };
        let focus = world::spawn_entity(&mut world, Capabilities::PLAYER, &player).expect("player");
        let _ = world::spawn_entity(&mut world, Capabilities::WANDERER, &wanderer).expect("ai");

        let scene = Scene::capture(&world, focus, DEFAULT_VIEWPORT).expect("scene");
        let mut backend = AsciiBackend::new(Vec::new());
        backend.present(&scene).expect("present");

        let text = String::from_utf8(backend.into_inner()).expect("utf8");
        assert_eq!(text, "tick 0\n@..#\n#.w.\n");
    }
}
