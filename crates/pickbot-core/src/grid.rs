//! The [`Grid`] type, an immutable square snapshot of a warehouse layout.
//!
//! A `Grid` is cheap to clone: clones share the same backing storage, which
//! is never written to after construction. Edits go through
//! [`with_cell`](Grid::with_cell) and [`with_path`](Grid::with_path), which
//! return a fresh snapshot and leave the original untouched.

use std::sync::Arc;

use crate::cell::CellKind;
use crate::error::GridError;
use crate::geom::{Point, Range};

/// A `size × size` matrix of [`CellKind`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "GridData", into = "GridData")
)]
pub struct Grid {
    cells: Arc<[CellKind]>,
    size: i32,
}

impl Grid {
    /// Create an all-[`Empty`](CellKind::Empty) grid.
    pub fn new(size: i32) -> Result<Self, GridError> {
        if size <= 0 {
            return Err(GridError::Empty);
        }
        let len = (size as usize) * (size as usize);
        Ok(Self {
            cells: vec![CellKind::Empty; len].into(),
            size,
        })
    }

    /// Build a grid from a flat row-major cell vector.
    pub fn from_cells(size: i32, cells: Vec<CellKind>) -> Result<Self, GridError> {
        if size <= 0 || cells.is_empty() {
            return Err(GridError::Empty);
        }
        if cells.len() != (size as usize) * (size as usize) {
            return Err(GridError::SizeMismatch {
                size,
                cells: cells.len(),
            });
        }
        Ok(Self {
            cells: cells.into(),
            size,
        })
    }

    /// Build a grid from rows (outer index = y). Rows must all have the same
    /// width and there must be as many rows as columns.
    pub fn from_rows(rows: Vec<Vec<CellKind>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
        }
        if width != height {
            return Err(GridError::NotSquare {
                width: width as i32,
                height: height as i32,
            });
        }
        let size = width as i32;
        Self::from_cells(size, rows.into_iter().flatten().collect())
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// The bounding range `[(0,0), (size,size))`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::square(self.size)
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.y * self.size + p.x) as usize)
    }

    /// The cell at `p`, or `None` if `p` is outside the grid.
    #[inline]
    pub fn at(&self, p: Point) -> Option<CellKind> {
        self.index(p).map(|i| self.cells[i])
    }

    /// First cell of the given kind in row-major order.
    pub fn find(&self, kind: CellKind) -> Option<Point> {
        self.iter().find(|&(_, k)| k == kind).map(|(p, _)| p)
    }

    /// Location of the robot start anchor.
    pub fn robot_start(&self) -> Option<Point> {
        self.find(CellKind::RobotStart)
    }

    /// Location of the packing station anchor.
    pub fn packing_station(&self) -> Option<Point> {
        self.find(CellKind::PackingStation)
    }

    /// Count how many cells are of the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&k| k == kind).count()
    }

    /// Iterate over `(Point, CellKind)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, CellKind)> + '_ {
        self.bounds().iter().zip(self.cells.iter().copied())
    }

    /// Rows of cells, outer index = y.
    pub fn rows(&self) -> Vec<Vec<CellKind>> {
        self.cells
            .chunks(self.size as usize)
            .map(<[CellKind]>::to_vec)
            .collect()
    }

    /// Return a new snapshot with the cell at `p` replaced.
    ///
    /// Placing a [`RobotStart`](CellKind::RobotStart) or
    /// [`PackingStation`](CellKind::PackingStation) clears any existing
    /// cell of that kind, so a layout never gains a second anchor through
    /// editing.
    pub fn with_cell(&self, p: Point, kind: CellKind) -> Result<Grid, GridError> {
        let idx = self.index(p).ok_or(GridError::OutOfBounds(p))?;
        let mut cells = self.cells.to_vec();
        if kind.is_anchor() {
            for c in cells.iter_mut().filter(|c| **c == kind) {
                *c = CellKind::Empty;
            }
        }
        cells[idx] = kind;
        Ok(Grid {
            cells: cells.into(),
            size: self.size,
        })
    }

    /// Return a new snapshot with every [`Empty`](CellKind::Empty) cell on
    /// `path` marked as [`Path`](CellKind::Path). Other kinds and positions
    /// outside the grid are left alone.
    pub fn with_path(&self, path: &[Point]) -> Grid {
        let mut cells = self.cells.to_vec();
        for &p in path {
            if let Some(i) = self.index(p) {
                if cells[i] == CellKind::Empty {
                    cells[i] = CellKind::Path;
                }
            }
        }
        Grid {
            cells: cells.into(),
            size: self.size,
        }
    }
}

/// Wire shape of a grid: `{ "gridSize": n, "gridData": [[...], ...] }`.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridData {
    grid_size: i32,
    grid_data: Vec<Vec<CellKind>>,
}

#[cfg(feature = "serde")]
impl TryFrom<GridData> for Grid {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, GridError> {
        let grid = Grid::from_rows(data.grid_data)?;
        if grid.size != data.grid_size {
            return Err(GridError::SizeMismatch {
                size: data.grid_size,
                cells: grid.cells.len(),
            });
        }
        Ok(grid)
    }
}

#[cfg(feature = "serde")]
impl From<Grid> for GridData {
    fn from(grid: Grid) -> Self {
        GridData {
            grid_size: grid.size,
            grid_data: grid.rows(),
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn layout_json_shape() {
        let g = Grid::new(2)
            .unwrap()
            .with_cell(Point::new(0, 1), CellKind::Shelf)
            .unwrap();
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(
            json,
            r#"{"gridSize":2,"gridData":[["empty","empty"],["shelf","empty"]]}"#
        );
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn non_square_json_is_rejected() {
        let json = r#"{"gridSize":2,"gridData":[["empty","empty"]]}"#;
        assert!(serde_json::from_str::<Grid>(json).is_err());
    }
}
