//! Core types for the scentwalk pedestrian simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! grid cell coordinate, the identifiers used to key cached fields and
//! walkers, and the error taxonomy shared by every other crate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod id;

pub use cell::Cell;
pub use error::{FieldError, GridError, PathError, WalkError};
pub use id::{FieldKey, WalkerId};
