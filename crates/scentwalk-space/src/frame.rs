//! World ↔ grid coordinate convention.
//!
//! A world point `(x, y)` maps to cell
//! `(floor((x + tx) / cell_size), floor((y + ty) / cell_size))`, and a cell
//! `(i, j)` has its centre at
//! `((i + 1) * cell_size - cell_size / 2 - tx, (j + 1) * cell_size - cell_size / 2 - ty)`.
//! Grid construction and every anchor lookup go through the same
//! [`WorldFrame`], which keeps the two directions consistent.

use crate::geometry::Point;
use scentwalk_core::{Cell, GridError};

/// The rectangular world region a grid discretizes, given by two corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldRect {
    /// Left edge.
    pub x1: f64,
    /// Top edge.
    pub y1: f64,
    /// Right edge.
    pub x2: f64,
    /// Bottom edge.
    pub y2: f64,
}

impl WorldRect {
    /// Create a rectangle from two corners.
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// A rectangle anchored at the origin.
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// Cell size and translation shared by grid construction and point lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldFrame {
    cell_size: f64,
    translation: (f64, f64),
}

impl WorldFrame {
    /// Create a frame. Returns `Err(InvalidCellSize)` for a non-positive or
    /// non-finite `cell_size`.
    pub fn new(cell_size: f64, translation: (f64, f64)) -> Result<Self, GridError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize { value: cell_size });
        }
        Ok(Self {
            cell_size,
            translation,
        })
    }

    /// World units per cell.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Translation `(tx, ty)` added to world coordinates before division.
    pub fn translation(&self) -> (f64, f64) {
        self.translation
    }

    /// The same frame with a different translation.
    pub fn with_translation(self, translation: (f64, f64)) -> Self {
        Self {
            translation,
            ..self
        }
    }

    /// Number of whole cells spanning `extent` world units.
    pub fn cells_along(&self, extent: f64) -> u32 {
        let n = (extent / self.cell_size).floor();
        if n.is_finite() && n > 0.0 {
            n.min(f64::from(i32::MAX)) as u32
        } else {
            0
        }
    }

    /// Map a world point to its (unchecked) cell.
    pub fn to_cell(&self, p: Point) -> Cell {
        let cx = ((p.x + self.translation.0) / self.cell_size).floor();
        let cy = ((p.y + self.translation.1) / self.cell_size).floor();
        Cell::new(saturate(cx), saturate(cy))
    }

    /// World coordinates of a cell's centre.
    pub fn cell_center(&self, cell: Cell) -> Point {
        let half = self.cell_size / 2.0;
        Point::new(
            f64::from(cell.x + 1) * self.cell_size - half - self.translation.0,
            f64::from(cell.y + 1) * self.cell_size - half - self.translation.1,
        )
    }
}

fn saturate(v: f64) -> i32 {
    if v.is_nan() {
        i32::MIN
    } else {
        v.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }
}
