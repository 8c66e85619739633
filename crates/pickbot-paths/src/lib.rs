//! Shortest-path search on warehouse grids.
//!
//! - **A\*** over any [`AstarPather`] ([`PathRange::astar_path`]), with a
//!   deterministic tie-break on discovery order
//! - [`WarehousePather`]: 4-connected unit-cost movement where shelves and
//!   obstacles block transit except at the leg's goal
//! - [`Pathfinder`] / [`find_path`]: the leg search used by route planning
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | neighbor enumeration |
//! | [`WeightedPather`] : [`Pather`] | step cost |
//! | [`AstarPather`] : [`WeightedPather`] | admissible estimate |

mod astar;
mod distance;
mod pathrange;
mod traits;
mod warehouse;

pub use distance::manhattan;
pub use pathrange::{PathRange, UNREACHABLE};
pub use traits::{AstarPather, Pather, WeightedPather};
pub use warehouse::{Pathfinder, WarehousePather, find_path};
