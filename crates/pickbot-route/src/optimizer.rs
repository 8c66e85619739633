//! Visiting-order selection for a set of waypoints.
//!
//! Two modes, chosen by the caller:
//!
//! - [`OrderingMode::Exact`]: exhaustive search over every visiting order,
//!   scored by the Manhattan length of `start → … → end`. Factorial in the
//!   waypoint count, so it is only attempted up to [`MAX_EXACT_WAYPOINTS`];
//!   larger sets fall back to a greedy nearest-neighbor chain.
//! - [`OrderingMode::Priority`]: descending priority weight, used under
//!   demand surge.

use pickbot_core::Point;
use pickbot_paths::manhattan;

use crate::scenario::ScenarioProfile;
use crate::waypoint::Waypoint;

/// Largest waypoint count solved by exhaustive search (8! = 40320 orders).
pub const MAX_EXACT_WAYPOINTS: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum OrderingMode {
    #[default]
    Exact,
    Priority,
}

impl OrderingMode {
    /// Priority ordering under demand surge, exact ordering otherwise.
    pub fn for_profile(profile: &ScenarioProfile) -> Self {
        if profile.is_demand_surge() {
            OrderingMode::Priority
        } else {
            OrderingMode::Exact
        }
    }
}

/// Manhattan length of the chain `start → order[0] → … → end`.
pub fn chain_cost(start: Point, order: &[Waypoint], end: Point) -> i32 {
    let mut at = start;
    let mut cost = 0;
    for wp in order {
        cost += manhattan(at, wp.pos);
        at = wp.pos;
    }
    cost + manhattan(at, end)
}

/// Order `waypoints` for a route from `start` to `end`.
pub fn order_waypoints(
    start: Point,
    waypoints: &[Waypoint],
    end: Point,
    mode: OrderingMode,
) -> Vec<Waypoint> {
    let order = match mode {
        OrderingMode::Exact if waypoints.len() <= MAX_EXACT_WAYPOINTS => {
            exact_order(start, waypoints, end)
        }
        OrderingMode::Exact => {
            log::debug!(
                "optimizer: {} waypoints over exact bound {MAX_EXACT_WAYPOINTS}, nearest-neighbor",
                waypoints.len()
            );
            nearest_neighbor_order(start, waypoints)
        }
        OrderingMode::Priority => priority_order(waypoints),
    };
    order.into_iter().map(|i| waypoints[i].clone()).collect()
}

// ---------------------------------------------------------------------------
// Exact
// ---------------------------------------------------------------------------

struct Exhaustive<'a> {
    pts: &'a [Point],
    end: Point,
    used: Vec<bool>,
    current: Vec<usize>,
    best: Vec<usize>,
    best_cost: i32,
}

impl Exhaustive<'_> {
    /// Depth-first walk over index permutations in lexicographic order.
    /// Only a strictly cheaper complete order replaces the best one, so the
    /// earliest minimal order wins ties.
    fn walk(&mut self, at: Point, cost: i32) {
        // Remaining legs are non-negative: this branch cannot beat `best`.
        if cost >= self.best_cost {
            return;
        }
        if self.current.len() == self.pts.len() {
            let total = cost + manhattan(at, self.end);
            if total < self.best_cost {
                self.best_cost = total;
                self.best.clone_from(&self.current);
            }
            return;
        }
        for i in 0..self.pts.len() {
            if self.used[i] {
                continue;
            }
            self.used[i] = true;
            self.current.push(i);
            self.walk(self.pts[i], cost + manhattan(at, self.pts[i]));
            self.current.pop();
            self.used[i] = false;
        }
    }
}

fn exact_order(start: Point, waypoints: &[Waypoint], end: Point) -> Vec<usize> {
    let pts: Vec<Point> = waypoints.iter().map(|w| w.pos).collect();
    let mut search = Exhaustive {
        pts: &pts,
        end,
        used: vec![false; pts.len()],
        current: Vec::with_capacity(pts.len()),
        best: (0..pts.len()).collect(),
        best_cost: i32::MAX,
    };
    search.walk(start, 0);
    log::debug!(
        "optimizer: exact order over {} waypoints, cost {}",
        pts.len(),
        search.best_cost
    );
    search.best
}

// ---------------------------------------------------------------------------
// Heuristics
// ---------------------------------------------------------------------------

fn nearest_neighbor_order(start: Point, waypoints: &[Waypoint]) -> Vec<usize> {
    let mut left: Vec<usize> = (0..waypoints.len()).collect();
    let mut order = Vec::with_capacity(waypoints.len());
    let mut at = start;
    // min_by_key keeps the first minimum, i.e. the earliest input.
    while let Some((k, &next)) = left
        .iter()
        .enumerate()
        .min_by_key(|&(_, &i)| manhattan(at, waypoints[i].pos))
    {
        left.remove(k);
        order.push(next);
        at = waypoints[next].pos;
    }
    order
}

fn priority_order(waypoints: &[Waypoint]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..waypoints.len()).collect();
    // Stable: equal weights keep input order.
    order.sort_by(|&a, &b| waypoints[b].weight().total_cmp(&waypoints[a].weight()));
    order
}
