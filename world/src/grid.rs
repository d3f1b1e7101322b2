//! Fixed-size cell grid that partitions the world.

use grid_skirmish_core::{Cell, CellKind, ConfigError, WorldConfig};
use rand::Rng;
use thiserror::Error;

/// Narrow collision capability: answers walkability at pixel-space points.
pub trait WalkabilityQuery {
    /// Returns `Some(walkable)` for points on the map and `None` for points
    /// outside of it.
    fn walkable_at(&self, x: f32, y: f32) -> Option<bool>;
}

/// Rectangular, row-major array of cells. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cell_size: f32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Generates a grid where every cell is independently a wall with the
    /// configured probability and floor otherwise.
    pub fn generate<R>(config: &WorldConfig, rng: &mut R) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
    {
        config.validate()?;
        let cells = (0..cell_count(config.columns, config.rows))
            .map(|_| {
                if rng.gen_bool(config.wall_probability) {
                    Cell::new(CellKind::Wall)
                } else {
                    Cell::new(CellKind::Floor)
                }
            })
            .collect();

        Ok(Self {
            columns: config.columns,
            rows: config.rows,
            cell_size: config.cell_size,
            cells,
        })
    }

    /// Builds a grid where every cell has the same kind.
    pub fn filled(
        columns: u32,
        rows: u32,
        cell_size: f32,
        kind: CellKind,
    ) -> Result<Self, ConfigError> {
        validate_shape(columns, rows, cell_size)?;
        Ok(Self {
            columns,
            rows,
            cell_size,
            cells: vec![Cell::new(kind); cell_count(columns, rows)],
        })
    }

    /// Builds a grid from an ASCII layout where `.` is floor and `#` is wall.
    ///
    /// Each string is one row, top to bottom.
    pub fn from_layout(cell_size: f32, layout: &[&str]) -> Result<Self, LayoutError> {
        let Some(first) = layout.first() else {
            return Err(LayoutError::Empty);
        };
        let columns = first.chars().count();
        if columns == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(columns * layout.len());
        for (row, line) in layout.iter().enumerate() {
            let found = line.chars().count();
            if found != columns {
                return Err(LayoutError::Ragged {
                    row,
                    expected: columns,
                    found,
                });
            }
            for (column, glyph) in line.chars().enumerate() {
                let kind = match glyph {
                    '.' => CellKind::Floor,
                    '#' => CellKind::Wall,
                    _ => return Err(LayoutError::UnknownGlyph { glyph, column, row }),
                };
                cells.push(Cell::new(kind));
            }
        }

        let columns = u32::try_from(columns).map_err(|_| LayoutError::TooLarge)?;
        let rows = u32::try_from(layout.len()).map_err(|_| LayoutError::TooLarge)?;
        validate_shape(columns, rows, cell_size)?;

        Ok(Self {
            columns,
            rows,
            cell_size,
            cells,
        })
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total width of the grid in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Total height of the grid in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at the provided column and row, if it lies on the grid.
    #[must_use]
    pub fn cell_at(&self, column: i64, row: i64) -> Option<Cell> {
        if column < 0 || row < 0 || column >= i64::from(self.columns) || row >= i64::from(self.rows)
        {
            return None;
        }
        let index = usize::try_from(row * i64::from(self.columns) + column).ok()?;
        self.cells.get(index).copied()
    }

    /// Returns the cell containing the provided pixel, if it lies on the grid.
    #[must_use]
    pub fn cell_at_pixel(&self, x: f32, y: f32) -> Option<Cell> {
        let inside = x >= 0.0 && x < self.width() && y >= 0.0 && y < self.height();
        if !inside {
            return None;
        }
        let column = (x / self.cell_size).floor() as i64;
        let row = (y / self.cell_size).floor() as i64;
        self.cell_at(column, row)
    }
}

impl WalkabilityQuery for Grid {
    fn walkable_at(&self, x: f32, y: f32) -> Option<bool> {
        self.cell_at_pixel(x, y).map(|cell| cell.is_walkable())
    }
}

/// Reasons an ASCII layout cannot be turned into a grid.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LayoutError {
    /// The layout contained no rows or an empty first row.
    #[error("layout must contain at least one non-empty row")]
    Empty,
    /// A row's length differed from the first row's.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A character other than `.` or `#` was found.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based column of the character.
        column: usize,
        /// Zero-based row of the character.
        row: usize,
    },
    /// The layout exceeded the addressable grid size.
    #[error("layout exceeds the maximum grid size")]
    TooLarge,
    /// The resulting grid shape was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn validate_shape(columns: u32, rows: u32, cell_size: f32) -> Result<(), ConfigError> {
    WorldConfig {
        columns,
        rows,
        cell_size,
        ..WorldConfig::default()
    }
    .validate()
}

fn cell_count(columns: u32, rows: u32) -> usize {
    let count = u64::from(columns) * u64::from(rows);
    usize::try_from(count).unwrap_or(0)
}
