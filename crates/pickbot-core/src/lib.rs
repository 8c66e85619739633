//! **pickbot-core**: the warehouse grid model shared by the pickbot crates.
//!
//! This crate provides geometry primitives, the closed set of cell kinds a
//! layout is made of, immutable grid snapshots, and the plain-text layout
//! format used by tools and tests.

pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;
pub mod layout;

pub use cell::CellKind;
pub use error::GridError;
pub use geom::{Point, Range};
pub use grid::Grid;
