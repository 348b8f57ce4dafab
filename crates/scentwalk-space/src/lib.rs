//! Floor-plan geometry and occupancy grids for scentwalk simulations.
//!
//! This crate turns obstacle polygons in world coordinates into the
//! immutable [`Grid`] that every downstream component reads:
//!
//! - [`geometry`]: points, polygons, SVG-style affine transforms,
//!   [`Obstacle`] and [`AnchorPoint`]
//! - [`frame`]: the world ↔ cell coordinate convention ([`WorldFrame`])
//! - [`grid`]: the occupancy grid and its construction
//! - [`neighbourhood`]: 4- and 8-connected neighbour enumeration

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod frame;
pub mod geometry;
pub mod grid;
pub mod neighbourhood;

pub use frame::{WorldFrame, WorldRect};
pub use geometry::{Affine, AnchorPoint, Obstacle, Point, Polygon};
pub use grid::{CellState, Grid};
pub use neighbourhood::{Connectivity, OFFSETS_4, OFFSETS_8};
