//! Warehouse layouts written as text.
//!
//! Each line is one row of the grid and each character one cell, using the
//! glyphs from [`CellKind::glyph`]:
//!
//! ```text
//! R....
//! .S.S.
//! .S#S.
//! .S.S.
//! ....P
//! ```
//!
//! Leading and trailing whitespace around the whole text is ignored, as are
//! carriage returns, but every row must have the same width and the layout
//! must be square.

use crate::cell::CellKind;
use crate::error::GridError;
use crate::geom::Point;
use crate::grid::Grid;

/// Glyph drawn for the robot by [`render_route`].
pub const ROBOT_GLYPH: char = '@';

/// Parse a text layout into a [`Grid`].
pub fn parse(s: &str) -> Result<Grid, GridError> {
    let mut rows: Vec<Vec<CellKind>> = Vec::new();
    for (y, line) in s.trim().lines().enumerate() {
        let line = line.trim_end_matches('\r');
        let mut row = Vec::with_capacity(line.len());
        for (x, ch) in line.chars().enumerate() {
            let kind = CellKind::from_glyph(ch).ok_or(GridError::InvalidGlyph {
                ch,
                pos: Point::new(x as i32, y as i32),
            })?;
            row.push(kind);
        }
        rows.push(row);
    }
    Grid::from_rows(rows)
}

/// Render a grid back into the text format accepted by [`parse`].
pub fn render(grid: &Grid) -> String {
    render_route(grid, &[], None)
}

/// Render a grid with `path` overlaid (see [`Grid::with_path`]) and the
/// robot, if given, drawn as [`ROBOT_GLYPH`].
pub fn render_route(grid: &Grid, path: &[Point], robot: Option<Point>) -> String {
    let overlay = grid.with_path(path);
    let size = overlay.size() as usize;
    let mut out = String::with_capacity(size * (size + 1));
    for (p, kind) in overlay.iter() {
        if p.x == 0 && p.y > 0 {
            out.push('\n');
        }
        if robot == Some(p) {
            out.push(ROBOT_GLYPH);
        } else {
            out.push(kind.glyph());
        }
    }
    out
}
