//! Error types for the scentwalk simulator.
//!
//! Organized by subsystem: grid construction and lookup, pathfinding,
//! field construction, and walker setup. Walker *aborts* (step budget
//! exhausted, boxed in, cancelled) are terminal walker states rather than
//! errors, because the partial trajectory remains a valid result.

use crate::cell::Cell;
use std::error::Error;
use std::fmt;

/// Errors from occupancy-grid construction or explicit cell lookups.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// The world rectangle is smaller than one cell along an axis.
    EmptyGrid {
        /// Computed column count.
        cols: u32,
        /// Computed row count.
        rows: u32,
    },
    /// The cell size is zero, negative, or not finite.
    InvalidCellSize {
        /// The rejected cell size.
        value: f64,
    },
    /// A requested cell lies outside the grid.
    OutOfBounds {
        /// The offending cell.
        cell: Cell,
        /// Grid column count.
        cols: u32,
        /// Grid row count.
        rows: u32,
    },
    /// A world point maps to a cell outside the grid.
    PointOutOfBounds {
        /// World x coordinate.
        x: f64,
        /// World y coordinate.
        y: f64,
    },
    /// A state buffer does not match `cols * rows`.
    SizeMismatch {
        /// Expected number of cells.
        expected: usize,
        /// Provided number of cells.
        actual: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { cols, rows } => {
                write!(f, "grid must have at least one cell, got {cols}x{rows}")
            }
            Self::InvalidCellSize { value } => {
                write!(f, "cell size must be finite and > 0, got {value}")
            }
            Self::OutOfBounds { cell, cols, rows } => {
                write!(f, "cell {cell} out of bounds: [0, {cols}) x [0, {rows})")
            }
            Self::PointOutOfBounds { x, y } => {
                write!(f, "world point ({x}, {y}) maps outside the grid")
            }
            Self::SizeMismatch { expected, actual } => {
                write!(f, "expected {expected} cell states, got {actual}")
            }
        }
    }
}

impl Error for GridError {}

/// Errors from the A* pathfinder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathError {
    /// Start or end lies outside the grid.
    OutOfBounds {
        /// The offending cell.
        cell: Cell,
    },
    /// The start cell is occupied.
    StartBlocked {
        /// The start cell.
        cell: Cell,
    },
    /// The end cell is occupied.
    GoalBlocked {
        /// The end cell.
        cell: Cell,
    },
    /// The open set was exhausted without reaching the goal.
    PathNotFound {
        /// Start of the search.
        start: Cell,
        /// Requested goal.
        end: Cell,
        /// Nodes expanded before giving up.
        expanded: usize,
    },
}

impl PathError {
    /// `true` for every variant that means "no usable path" as opposed to
    /// a malformed request.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::StartBlocked { .. } | Self::GoalBlocked { .. } | Self::PathNotFound { .. }
        )
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { cell } => write!(f, "path endpoint {cell} is outside the grid"),
            Self::StartBlocked { cell } => write!(f, "path start {cell} is occupied"),
            Self::GoalBlocked { cell } => write!(f, "path goal {cell} is occupied"),
            Self::PathNotFound {
                start,
                end,
                expanded,
            } => write!(
                f,
                "no path from {start} to {end} ({expanded} nodes expanded)"
            ),
        }
    }
}

impl Error for PathError {}

/// Errors from distance-field construction and smoothing.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    /// The field source lies outside the grid.
    OutOfBounds {
        /// The offending cell.
        cell: Cell,
    },
    /// The field source is an occupied cell.
    SourceBlocked {
        /// The source cell.
        cell: Cell,
    },
    /// No free cell other than the source received a positive potential,
    /// e.g. a source fully enclosed by obstacles.
    DegenerateField {
        /// The source cell.
        source: Cell,
    },
    /// A field does not have the grid's dimensions.
    DimensionMismatch {
        /// Expected `(cols, rows)`.
        expected: (u32, u32),
        /// Actual `(cols, rows)`.
        actual: (u32, u32),
    },
    /// A smoothing width is NaN or infinite.
    InvalidSigma {
        /// The rejected value.
        value: f64,
    },
    /// A field's value buffer does not match `cols * rows`.
    SizeMismatch {
        /// Expected number of values.
        expected: usize,
        /// Provided number of values.
        actual: usize,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { cell } => write!(f, "field source {cell} is outside the grid"),
            Self::SourceBlocked { cell } => write!(f, "field source {cell} is occupied"),
            Self::DegenerateField { source } => {
                write!(f, "field from {source} reaches no free cell")
            }
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "field is {}x{}, grid is {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::InvalidSigma { value } => write!(f, "sigma must be finite, got {value}"),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "expected {expected} field values, got {actual}")
            }
        }
    }
}

impl Error for FieldError {}

/// Errors from walker construction.
#[derive(Clone, Debug, PartialEq)]
pub enum WalkError {
    /// The walker was given no target fields.
    NoTargets,
    /// The start cell lies outside the grid.
    OutOfBounds {
        /// The offending cell.
        cell: Cell,
    },
    /// The start cell is occupied.
    StartBlocked {
        /// The start cell.
        cell: Cell,
    },
    /// A target field does not match the grid's dimensions.
    DimensionMismatch {
        /// Index of the offending target.
        target: usize,
    },
    /// A walker parameter is outside its valid range.
    InvalidParameter {
        /// Description of the invalid parameter.
        reason: String,
    },
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTargets => write!(f, "walker needs at least one target"),
            Self::OutOfBounds { cell } => write!(f, "walker start {cell} is outside the grid"),
            Self::StartBlocked { cell } => write!(f, "walker start {cell} is occupied"),
            Self::DimensionMismatch { target } => {
                write!(f, "target {target} does not match the grid dimensions")
            }
            Self::InvalidParameter { reason } => write!(f, "invalid walker parameter: {reason}"),
        }
    }
}

impl Error for WalkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        let c = Cell::new(1, 1);
        assert!(PathError::StartBlocked { cell: c }.is_not_found());
        assert!(PathError::GoalBlocked { cell: c }.is_not_found());
        assert!(PathError::PathNotFound {
            start: c,
            end: c,
            expanded: 0
        }
        .is_not_found());
        assert!(!PathError::OutOfBounds { cell: c }.is_not_found());
    }

    #[test]
    fn display_mentions_cells() {
        let e = GridError::OutOfBounds {
            cell: Cell::new(12, 3),
            cols: 10,
            rows: 10,
        };
        assert_eq!(e.to_string(), "cell (12, 3) out of bounds: [0, 10) x [0, 10)");

        let e = FieldError::DegenerateField {
            source: Cell::new(4, 4),
        };
        assert!(e.to_string().contains("(4, 4)"));
    }
}
