//! Session-level error type.

use std::error::Error;
use std::fmt;

use scentwalk_core::{FieldError, GridError, PathError, WalkError};

use crate::config::ConfigError;

/// Errors from [`Session`](crate::session::Session) operations.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    /// Session configuration failed validation.
    Config(ConfigError),
    /// Grid construction or a point lookup failed.
    Grid(GridError),
    /// A path search failed.
    Path(PathError),
    /// Field construction failed.
    Field(FieldError),
    /// Walker construction failed.
    Walk(WalkError),
    /// No anchor with this id has been added.
    UnknownAnchor {
        /// The requested id.
        id: String,
    },
    /// No map is cached under this key.
    UnknownField {
        /// The requested key.
        key: String,
    },
    /// An anchor or map is already registered under this key.
    DuplicateKey {
        /// The conflicting key.
        key: String,
    },
    /// A batch worker thread panicked.
    WorkerPanicked,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Path(e) => write!(f, "path: {e}"),
            Self::Field(e) => write!(f, "field: {e}"),
            Self::Walk(e) => write!(f, "walker: {e}"),
            Self::UnknownAnchor { id } => write!(f, "unknown anchor '{id}'"),
            Self::UnknownField { key } => write!(f, "no map cached under '{key}'"),
            Self::DuplicateKey { key } => write!(f, "'{key}' is already registered"),
            Self::WorkerPanicked => write!(f, "a walker worker thread panicked"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Path(e) => Some(e),
            Self::Field(e) => Some(e),
            Self::Walk(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<GridError> for SessionError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<PathError> for SessionError {
    fn from(e: PathError) -> Self {
        Self::Path(e)
    }
}

impl From<FieldError> for SessionError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<WalkError> for SessionError {
    fn from(e: WalkError) -> Self {
        Self::Walk(e)
    }
}
