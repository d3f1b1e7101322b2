#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Skirmish adapters.
//!
//! Adapters never read the world directly. After a tick completes they
//! capture a [`Scene`] and hand it to a [`RenderingBackend`].

use anyhow::Result as AnyResult;
use glam::Vec2;
use grid_skirmish_core::{CellKind, Direction, EntityId, Position, Rgb};
use grid_skirmish_world::{query, World};
use thiserror::Error;

/// Viewport used when adapters do not pick one, in pixels.
pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(500.0, 720.0);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
    }
}

/// Single grid cell as it should be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Zero-based column of the cell.
    pub column: u32,
    /// Zero-based row of the cell.
    pub row: u32,
    /// Kind of the cell.
    pub kind: CellKind,
    /// Fallback fill color.
    pub fill: Color,
    /// Texture key preferred over the fill, if any.
    pub texture: Option<&'static str>,
}

/// Entity sprite placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityPresentation {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Center of the bounding box in world pixels.
    pub center: Vec2,
    /// Bounding box dimensions in pixels.
    pub size: Vec2,
    /// Direction the sprite should face.
    pub facing: Direction,
    /// Current health, for health bars.
    pub health: u32,
    /// Whether this is the entity the camera follows.
    pub focused: bool,
}

/// Projectile sprite placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Entity that fired the projectile.
    pub owner: EntityId,
    /// Current position in world pixels.
    pub position: Vec2,
    /// Direction of travel.
    pub direction: Direction,
}

/// Camera centred on a point of the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    center: Vec2,
    viewport: Vec2,
}

impl Camera {
    /// Creates a camera looking at `center` through a `viewport` sized window.
    pub fn new(center: Vec2, viewport: Vec2) -> Result<Self, RenderingError> {
        if !(viewport.x > 0.0 && viewport.y > 0.0) {
            return Err(RenderingError::InvalidViewport {
                width: viewport.x,
                height: viewport.y,
            });
        }
        Ok(Self { center, viewport })
    }

    /// Point of the world at the middle of the screen.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Dimensions of the visible window in pixels.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// World-space offset that maps world pixels onto screen pixels.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.viewport * 0.5 - self.center
    }

    /// Converts a world position into screen pixels.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world + self.translation()
    }

    /// Reports whether a world-space point falls within the viewport.
    #[must_use]
    pub fn contains(&self, world: Vec2) -> bool {
        let screen = self.world_to_screen(world);
        screen.cmpge(Vec2::ZERO).all() && screen.cmplt(self.viewport).all()
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Side length of a cell in pixels.
    pub cell_size: f32,
    /// Every cell in row-major order.
    pub tiles: Vec<TilePresentation>,
    /// Entities in id order.
    pub entities: Vec<EntityPresentation>,
    /// Live projectiles ordered by owner then firing order.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Camera following the focused entity.
    pub camera: Camera,
    /// Number of ticks the world has advanced.
    pub tick: u64,
}

impl Scene {
    /// Captures the current world state, centring the camera on `focus`.
    ///
    /// When the focused entity does not exist the camera looks at the middle
    /// of the map.
    pub fn capture(world: &World, focus: EntityId, viewport: Vec2) -> Result<Self, RenderingError> {
        let grid = query::grid(world);
        let columns = grid.columns();
        let tiles = grid
            .cells()
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let index = u32::try_from(index).unwrap_or(u32::MAX);
                let appearance = cell.cell_type().appearance;
                TilePresentation {
                    column: index % columns,
                    row: index / columns,
                    kind: cell.kind(),
                    fill: appearance.fill.into(),
                    texture: appearance.texture,
                }
            })
            .collect();

        let entities: Vec<EntityPresentation> = query::entity_view(world)
            .iter()
            .map(|snapshot| EntityPresentation {
                id: snapshot.id,
                center: to_vec2(snapshot.position),
                size: Vec2::new(snapshot.width, snapshot.height),
                facing: snapshot.facing,
                health: snapshot.health,
                focused: snapshot.id == focus,
            })
            .collect();

        let projectiles = query::projectile_view(world)
            .iter()
            .map(|snapshot| ProjectilePresentation {
                owner: snapshot.owner,
                position: to_vec2(snapshot.position),
                direction: snapshot.direction,
            })
            .collect();

        let center = entities
            .iter()
            .find(|entity| entity.focused)
            .map_or_else(
                || Vec2::new(grid.width(), grid.height()) * 0.5,
                |entity| entity.center,
            );

        Ok(Self {
            columns,
            rows: grid.rows(),
            cell_size: grid.cell_size(),
            tiles,
            entities,
            projectiles,
            camera: Camera::new(center, viewport)?,
            tick: query::tick_index(world),
        })
    }

    /// Entity the camera follows, if it is present.
    #[must_use]
    pub fn focused(&self) -> Option<&EntityPresentation> {
        self.entities.iter().find(|entity| entity.focused)
    }
}

fn to_vec2(position: Position) -> Vec2 {
    Vec2::new(position.x, position.y)
}

/// Rendering backend capable of presenting Grid Skirmish scenes.
pub trait RenderingBackend {
    /// Draws one captured frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// The viewport must have a positive area.
    #[error("viewport must be positive (received {width}x{height})")]
    InvalidViewport {
        /// Requested viewport width.
        width: f32,
        /// Requested viewport height.
        height: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_skirmish_core::{Capabilities, EntityConfig, OffMapPolicy};
    use grid_skirmish_world::{self as world, Grid};

    fn world_with_player() -> (World, EntityId) {
        let grid = Grid::from_layout(64.0, &["..#", "#.."]).expect("grid");
        let mut world = World::new(grid, OffMapPolicy::Keep);
        let config = EntityConfig {
            spawn: Position::new(96.0, 64.0),
            ..EntityConfig::default()
        };
        let player =
            world::spawn_entity(&mut world, Capabilities::PLAYER, &config).expect("player");
        (world, player)
    }

    #[test]
    fn capture_lays_tiles_out_row_major() {
        let (world, player) = world_with_player();
        let scene = Scene::capture(&world, player, DEFAULT_VIEWPORT).expect("scene");

        assert_eq!(scene.tiles.len(), 6);
        assert_eq!((scene.tiles[2].column, scene.tiles[2].row), (2, 0));
        assert_eq!(scene.tiles[2].kind, CellKind::Wall);
        assert_eq!((scene.tiles[3].column, scene.tiles[3].row), (0, 1));
        assert_eq!(scene.tiles[0].texture, Some("floor"));
        assert_eq!(scene.tiles[2].fill, Color::from_rgb_u8(0xbb, 0xbb, 0xbb));
    }

    #[test]
    fn camera_follows_focused_entity() {
        let (world, player) = world_with_player();
        let scene = Scene::capture(&world, player, Vec2::new(200.0, 100.0)).expect("scene");

        assert_eq!(scene.camera.center(), Vec2::new(96.0, 64.0));
        assert_eq!(
            scene.camera.world_to_screen(Vec2::new(96.0, 64.0)),
            Vec2::new(100.0, 50.0)
        );
        assert!(scene.camera.contains(Vec2::new(0.0, 20.0)));
        assert!(!scene.camera.contains(Vec2::new(300.0, 64.0)));
        assert_eq!(scene.focused().map(|entity| entity.id), Some(player));
    }

    #[test]
    fn missing_focus_centres_on_the_map() {
        let (world, _) = world_with_player();
        let scene = Scene::capture(&world, EntityId::new(99), DEFAULT_VIEWPORT).expect("scene");
        assert_eq!(scene.camera.center(), Vec2::new(96.0, 64.0));
        assert!(scene.focused().is_none());
    }

    #[test]
    fn rejects_empty_viewport() {
        assert_eq!(
            Camera::new(Vec2::ZERO, Vec2::new(0.0, 10.0)),
            Err(RenderingError::InvalidViewport {
                width: 0.0,
                height: 10.0,
            })
        );
    }
}
