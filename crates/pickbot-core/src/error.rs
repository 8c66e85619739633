use thiserror::Error;

use crate::geom::Point;

/// Errors raised while building or editing a [`Grid`](crate::Grid).
///
/// All of these are fatal to planning and are reported before any search
/// begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("grid must be square, got {width}x{height}")]
    NotSquare { width: i32, height: i32 },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{cells} cells do not fill a grid of size {size}")]
    SizeMismatch { size: i32, cells: usize },

    #[error("position {0} is outside the grid")]
    OutOfBounds(Point),

    #[error("layout contains invalid glyph \u{201c}{ch}\u{201d} at {pos}")]
    InvalidGlyph { ch: char, pos: Point },
}
