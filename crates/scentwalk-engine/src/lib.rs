//! Walkers and simulation sessions for scentwalk.
//!
//! A [`Walker`] is a seeded, stochastic agent that follows an ordered list
//! of sniffing maps across the occupancy grid. A [`Session`] owns the grid
//! together with keyed caches of anchors, paths and maps, and runs queued
//! walkers in parallel.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod metrics;
pub mod sampler;
pub mod session;
pub mod walker;

pub use config::{ConfigError, SessionConfig, WalkerConfig};
pub use error::SessionError;
pub use metrics::WalkMetrics;
pub use sampler::{ProbabilityTable, StepChoice};
pub use session::{default_path_key, walker_seed, Session};
pub use walker::{AbortReason, WalkOutcome, WalkState, Walker};
