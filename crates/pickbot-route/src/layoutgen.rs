//! Random warehouse layouts.
//!
//! Layouts are made of vertical shelf aisles split by a cross aisle, with
//! scattered obstacles. The robot start sits in the top-left corner and the
//! packing station in the bottom-right one; the outer top row, left column
//! and bottom row are always left clear so both anchors stay connected.

use pickbot_core::{CellKind, Grid, GridError, Point};
use rand::{Rng, RngExt};

use crate::waypoint::{OrderItem, ShelfMap};

/// Products assigned to shelves in row-major order. Shelves past the end of
/// the list get numbered stock-keeping labels.
pub const CATALOGUE: [&str; 16] = [
    "milk", "bread", "eggs", "apples", "rice", "coffee", "tea", "pasta", "cheese", "butter",
    "flour", "sugar", "salt", "honey", "oats", "beans",
];

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    /// Side length. Values below 3 are raised to 3.
    pub size: i32,
    /// Walkable columns between two shelf columns.
    pub aisle_width: i32,
    /// Chance (0.0 to 1.0) that an interior floor cell becomes an obstacle.
    pub obstacle_pct: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            size: 12,
            aisle_width: 2,
            obstacle_pct: 0.04,
        }
    }
}

/// A generated grid and the products stocked on its shelves.
#[derive(Debug, Clone)]
pub struct GeneratedLayout {
    pub grid: Grid,
    pub shelves: ShelfMap,
}

/// Layout generator.
pub struct LayoutGen<R: Rng> {
    pub rng: R,
    pub params: LayoutParams,
}

impl<R: Rng> LayoutGen<R> {
    pub fn new(rng: R, params: LayoutParams) -> Self {
        Self { rng, params }
    }

    pub fn generate(&mut self) -> Result<GeneratedLayout, GridError> {
        let size = self.params.size.max(3);
        let stride = self.params.aisle_width.max(1) + 1;
        let cross = size / 2;
        let obstacle_pct = if self.params.obstacle_pct.is_finite() {
            self.params.obstacle_pct.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut cells = vec![CellKind::Empty; (size * size) as usize];
        let mut shelves = ShelfMap::new();
        let mut stocked = 0usize;
        for y in 0..size {
            for x in 0..size {
                let interior = x > 0 && x < size - 1 && y > 0 && y < size - 1;
                if !interior {
                    continue;
                }
                let kind = if (x - 1) % stride == 0 && y != cross {
                    shelves.insert(Point::new(x, y), product_name(stocked));
                    stocked += 1;
                    CellKind::Shelf
                } else if self.rng.random_bool(obstacle_pct) {
                    CellKind::Obstacle
                } else {
                    CellKind::Empty
                };
                cells[(y * size + x) as usize] = kind;
            }
        }
        cells[0] = CellKind::RobotStart;
        cells[(size * size - 1) as usize] = CellKind::PackingStation;

        let grid = Grid::from_cells(size, cells)?;
        log::debug!(
            "layoutgen: {size}x{size}, {} shelves, {} obstacles",
            shelves.len(),
            grid.count(CellKind::Obstacle)
        );
        Ok(GeneratedLayout { grid, shelves })
    }

    /// Draw `n` distinct stocked products as an order, with random
    /// priorities in `[0, 10)`.
    pub fn order(&mut self, layout: &GeneratedLayout, n: usize) -> Vec<OrderItem> {
        let mut names: Vec<&str> = layout.shelves.iter().map(|(_, name)| name).collect();
        let n = n.min(names.len());
        for i in 0..n {
            let j = self.rng.random_range(i..names.len());
            names.swap(i, j);
        }
        names[..n]
            .iter()
            .map(|&name| OrderItem {
                name: name.to_string(),
                priority: Some(self.rng.random_range(0.0..10.0)),
            })
            .collect()
    }
}

fn product_name(i: usize) -> String {
    match CATALOGUE.get(i) {
        Some(name) => name.to_string(),
        None => format!("sku-{i:03}"),
    }
}
