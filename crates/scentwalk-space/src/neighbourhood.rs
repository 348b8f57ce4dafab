//! 4- and 8-connected neighbourhoods on the occupancy grid.

use scentwalk_core::Cell;

/// The four cardinal offsets `(dx, dy)`: W, E, N, S.
pub const OFFSETS_4: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// All 8 offsets `(dx, dy)`: cardinals first, then diagonals NW, NE, SW, SE.
pub const OFFSETS_8: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Grid connectivity for search and flood fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    /// Cardinal moves only.
    Four,
    /// Cardinal and diagonal moves, each of unit cost.
    #[default]
    Eight,
}

impl Connectivity {
    /// The offsets for this connectivity.
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Connectivity::Four => &OFFSETS_4,
            Connectivity::Eight => &OFFSETS_8,
        }
    }

    /// Unit-cost geodesic distance under this connectivity, which is also
    /// the admissible and consistent A* heuristic.
    pub fn distance(self, a: Cell, b: Cell) -> u32 {
        match self {
            Connectivity::Four => a.manhattan(b),
            Connectivity::Eight => a.chebyshev(b),
        }
    }
}
