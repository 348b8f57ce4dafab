//! Test utilities and fixtures for scentwalk development.
//!
//! Grids are described as ASCII art (`#` is occupied, anything else free),
//! one string per row, top row first. Field fixtures return raw row-major
//! value buffers so they can be wrapped by whichever `Field` type the
//! caller links against.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    bfs_distances, enclosed_source_grid, grid_from_ascii, open_grid, peak_values, ramp_values,
    wall_with_gap, walled_room,
};
