//! Pathfinding on a warehouse [`Grid`].

use pickbot_core::{Grid, Point};

use crate::PathRange;
use crate::distance::manhattan;
use crate::traits::{AstarPather, Pather, WeightedPather};

/// 4-connected unit-cost pather for one leg of a route.
///
/// Shelves and obstacles block transit, except the leg's own goal cell, so
/// the robot can finish a leg on top of the shelf it came to pick from. The
/// cell the robot currently stands on is never checked, which lets the next
/// leg start from that shelf.
pub struct WarehousePather<'a> {
    grid: &'a Grid,
    goal: Point,
}

impl<'a> WarehousePather<'a> {
    pub fn new(grid: &'a Grid, goal: Point) -> Self {
        Self { grid, goal }
    }

    /// Whether the robot may step onto `p` during this leg.
    pub fn can_enter(&self, p: Point) -> bool {
        match self.grid.at(p) {
            None => false,
            Some(_) if p == self.goal => true,
            Some(kind) => !kind.blocks_transit(),
        }
    }
}

impl Pather for WarehousePather<'_> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for n in p.neighbors_4() {
            if self.can_enter(n) {
                buf.push(n);
            }
        }
    }
}

impl WeightedPather for WarehousePather<'_> {
    fn cost(&self, _from: Point, _to: Point) -> i32 {
        1
    }
}

impl AstarPather for WarehousePather<'_> {
    fn estimate(&self, from: Point, to: Point) -> i32 {
        manhattan(from, to)
    }
}

/// Leg search bound to one grid, reusing its search caches across calls.
pub struct Pathfinder<'a> {
    grid: &'a Grid,
    range: PathRange,
}

impl<'a> Pathfinder<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            range: PathRange::new(grid.bounds()),
        }
    }

    /// Shortest path `[start … end]`, or an empty vector if `end` cannot be
    /// reached (or either endpoint lies outside the grid).
    pub fn find_path(&mut self, start: Point, end: Point) -> Vec<Point> {
        let pather = WarehousePather::new(self.grid, end);
        self.range
            .astar_path(&pather, start, end)
            .unwrap_or_default()
    }
}

/// One-off convenience for [`Pathfinder::find_path`].
pub fn find_path(grid: &Grid, start: Point, end: Point) -> Vec<Point> {
    Pathfinder::new(grid).find_path(start, end)
}
