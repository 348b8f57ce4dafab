//! Integer grid cell coordinate.

use std::fmt;

/// A cell in the occupancy grid, addressed as `(x, y)`.
///
/// `x` runs along the grid's columns (world width) and `y` along its rows
/// (world height). Components are signed so that neighbour offsets can be
/// applied before bounds checking; a cell with a negative component is
/// never inside a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl Cell {
    /// Create a cell at `(x, y)`.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell displaced by `(dx, dy)`. No bounds checking.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Chebyshev (L-inf) distance: the geodesic for 8-connected unit-cost moves.
    pub fn chebyshev(self, other: Cell) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// Manhattan (L1) distance: the geodesic for 4-connected unit-cost moves.
    pub fn manhattan(self, other: Cell) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Euclidean distance between cell indices.
    pub fn euclidean(self, other: Cell) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// `true` if `other` is one of the 8 cells surrounding `self`.
    pub fn is_adjacent_8(self, other: Cell) -> bool {
        self != other && self.chebyshev(other) == 1
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
