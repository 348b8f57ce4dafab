//! scentwalk: grid-based pedestrian simulation driven by attraction fields.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! scentwalk sub-crates. For most users, adding `scentwalk` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use scentwalk::prelude::*;
//!
//! // A 40×30 room split by a wall with a doorway on the right.
//! let config = SessionConfig {
//!     world: WorldRect::from_size(40.0, 30.0),
//!     ..Default::default()
//! };
//! let wall = Obstacle::from_rect(0.0, 14.0, 30.0, 2.0).with_id("wall");
//! let mut session = Session::new(config, &[wall]).unwrap();
//! session.add_anchor(AnchorPoint::new("entrance", 2.5, 2.5)).unwrap();
//! session.add_anchor(AnchorPoint::new("exit", 5.5, 27.5)).unwrap();
//!
//! // Path-based map from entrance to exit, then one walker along it.
//! let to_exit = session.compute_anchor_path("entrance", "exit").unwrap();
//! assert_eq!(to_exit.as_str(), "entrance-exit");
//!
//! let id = session
//!     .spawn_walker_at("entrance", &[to_exit], &WalkerConfig::default())
//!     .unwrap();
//! session.run_walkers().unwrap();
//!
//! let outcome = session.outcome(id).unwrap();
//! assert!(outcome.state.is_terminal());
//! assert!(outcome.trajectory.iter().all(|&c| session.grid().is_free(c)));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `scentwalk-core` | `Cell`, keys, error taxonomy |
//! | [`space`] | `scentwalk-space` | Geometry, world frame, occupancy grid |
//! | [`fields`] | `scentwalk-fields` | A*, fragrance fill, smoothing, sniffing maps |
//! | [`engine`] | `scentwalk-engine` | Walkers, sessions, configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and errors (`scentwalk-core`).
pub use scentwalk_core as types;

/// Geometry and the occupancy grid (`scentwalk-space`).
///
/// [`space::Grid`] is built from [`space::Obstacle`] polygons and maps world
/// points to cells through its [`space::WorldFrame`].
pub use scentwalk_space as space;

/// Pathfinding and attraction fields (`scentwalk-fields`).
///
/// [`fields::SniffingMap`] is what walkers follow; build it from a
/// [`fields::PathAttraction`], a [`fields::DistanceAttraction`] or any other
/// [`fields::AttractionSource`].
pub use scentwalk_fields as fields;

/// Walkers and sessions (`scentwalk-engine`).
pub use scentwalk_engine as engine;

/// Common imports for typical scentwalk usage.
///
/// ```rust
/// use scentwalk::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use scentwalk_core::{Cell, FieldKey, WalkerId};

    // Errors
    pub use scentwalk_core::{FieldError, GridError, PathError, WalkError};
    pub use scentwalk_engine::{ConfigError, SessionError};

    // Space
    pub use scentwalk_space::{
        Affine, AnchorPoint, CellState, Connectivity, Grid, Obstacle, Point, Polygon, WorldRect,
    };

    // Fields
    pub use scentwalk_fields::{
        AttractionKind, AttractionSource, DistanceAttraction, DistanceField, DistanceFieldConfig,
        Field, GaussianSmoother, PathAttraction, PathGradient, PathResult, Pathfinder,
        SmoothingConfig, SniffingMap,
    };

    // Engine
    pub use scentwalk_engine::{
        AbortReason, Session, SessionConfig, WalkMetrics, WalkOutcome, WalkState, Walker,
        WalkerConfig,
    };
}
