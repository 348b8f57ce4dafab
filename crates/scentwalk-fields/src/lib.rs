//! Attraction fields for scentwalk simulations.
//!
//! Every walker target is a [`SniffingMap`]: a dense, smoothed surface whose
//! higher values lie closer to the goal. Two construction strategies share
//! the [`AttractionSource`] seam:
//!
//! - [`PathAttraction`]: an A* path ([`Pathfinder`]) stamped onto a
//!   wall-penalised base surface with an increasing reward along the path.
//! - [`DistanceAttraction`]: a multi-frontier flood fill ("fragrance",
//!   [`DistanceField`]) from a single source cell.
//!
//! Both base surfaces are then passed through the anisotropic
//! [`GaussianSmoother`], whose widths scale with the grid extent
//! ([`SmoothingConfig`]).

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod astar;
pub mod distance;
pub mod field;
pub mod smoothing;
pub mod sniffing;

pub use astar::{PathResult, Pathfinder};
pub use distance::{DistanceField, DistanceFieldConfig};
pub use field::Field;
pub use smoothing::{GaussianSmoother, SmoothingConfig};
pub use sniffing::{
    AttractionKind, AttractionSource, DistanceAttraction, PathAttraction, PathGradient,
    SniffingMap,
};
