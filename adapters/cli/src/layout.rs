//! Hand-drawn maps loaded from plain text files.
//!
//! One line per row, `.` for floor and `#` for wall. Blank lines and lines
//! starting with `;` are skipped.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use grid_skirmish_world::Grid;

const COMMENT_PREFIX: char = ';';

/// Reads the layout at `path` into a grid with square cells of `cell_size`.
pub(crate) fn load(path: &Path, cell_size: f32) -> Result<Grid> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout at {}", path.display()))?;
    parse(&contents, cell_size)
        .with_context(|| format!("failed to parse layout at {}", path.display()))
}

fn parse(contents: &str, cell_size: f32) -> Result<Grid> {
    let rows: Vec<&str> = contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .collect();
    Ok(Grid::from_layout(cell_size, &rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_skirmish_core::CellKind;

    #[test]
    fn skips_comments_and_blank_lines() {
        let grid = parse("; arena\n\n#..\n.#.\n", 32.0).expect("layout");
        assert_eq!((grid.columns(), grid.rows()), (3, 2));
        assert_eq!(
            grid.cell_at(1, 1).map(|cell| cell.kind()),
            Some(CellKind::Wall)
        );
    }

    #[test]
    fn ragged_rows_are_reported() {
        let error = parse("...\n..\n", 32.0).expect_err("ragged layout");
        assert!(error.to_string().contains("row"), "{error}");
    }
}
