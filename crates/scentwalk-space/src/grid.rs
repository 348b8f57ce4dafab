//! The occupancy grid.
//!
//! A [`Grid`] is built once per floor plan, has its obstacles marked once,
//! and is read-only from then on: pathfinding, flood fill, smoothing and
//! every walker share it by reference (typically behind an `Arc`).

use crate::frame::{WorldFrame, WorldRect};
use crate::geometry::{Obstacle, Point};
use crate::neighbourhood::Connectivity;
use scentwalk_core::{Cell, GridError};
use smallvec::SmallVec;

/// Occupancy state of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    /// Walkable.
    #[default]
    Free,
    /// Inside an obstacle.
    Occupied,
}

/// A 2-D occupancy grid over a rectangular world region.
///
/// Cells are stored row-major: index `y * cols + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    cols: u32,
    rows: u32,
    frame: WorldFrame,
    cells: Vec<CellState>,
}

impl Grid {
    /// Allocate an all-free grid covering `world` with square cells of
    /// `cell_size` world units.
    ///
    /// `cols = floor(width / cell_size)` and `rows = floor(height / cell_size)`.
    /// Returns `Err(InvalidCellSize)` or `Err(EmptyGrid)` if either is unusable.
    pub fn build(world: WorldRect, cell_size: f64) -> Result<Self, GridError> {
        let frame = WorldFrame::new(cell_size, (0.0, 0.0))?;
        let cols = frame.cells_along(world.width());
        let rows = frame.cells_along(world.height());
        if cols == 0 || rows == 0 {
            return Err(GridError::EmptyGrid { cols, rows });
        }
        Ok(Self {
            cols,
            rows,
            frame,
            cells: vec![CellState::Free; cols as usize * rows as usize],
        })
    }

    /// An all-free `cols x rows` grid with unit cells and no translation.
    pub fn open(cols: u32, rows: u32) -> Result<Self, GridError> {
        Self::build(WorldRect::from_size(f64::from(cols), f64::from(rows)), 1.0)
    }

    /// A grid from explicit row-major cell states, with unit cells.
    pub fn from_states(cols: u32, rows: u32, states: Vec<CellState>) -> Result<Self, GridError> {
        let mut grid = Self::open(cols, rows)?;
        if states.len() != grid.cells.len() {
            return Err(GridError::SizeMismatch {
                expected: grid.cells.len(),
                actual: states.len(),
            });
        }
        grid.cells = states;
        Ok(grid)
    }

    /// Mark every cell whose centre lies strictly inside any obstacle.
    ///
    /// `translation` becomes the grid's frame translation, so later point
    /// lookups use the same convention. Only cells under each obstacle's
    /// bounding box are tested; the parts of that box that fall outside the
    /// grid are skipped. Returns the number of cells newly marked.
    ///
    /// Call once, right after building the grid, with every obstacle of the
    /// plan. A second call replaces the translation without moving cells
    /// marked by the first, so the two sets would disagree on the frame.
    pub fn mark_occupied(&mut self, obstacles: &[Obstacle], translation: (f64, f64)) -> usize {
        self.frame = self.frame.with_translation(translation);
        let mut marked = 0;
        for obstacle in obstacles {
            let Some((lo, hi)) = obstacle.polygon.bounds() else {
                continue;
            };
            let Some((x0, x1, y0, y1)) = self.clip_cell_range(lo, hi) else {
                continue;
            };
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let cell = Cell::new(x, y);
                    let i = self.flat(cell);
                    if self.cells[i] == CellState::Occupied {
                        continue;
                    }
                    if obstacle.contains(self.frame.cell_center(cell)) {
                        self.cells[i] = CellState::Occupied;
                        marked += 1;
                    }
                }
            }
        }
        marked
    }

    /// Cell range covering the world box `[lo, hi]`, clipped to the grid.
    fn clip_cell_range(&self, lo: Point, hi: Point) -> Option<(i32, i32, i32, i32)> {
        let a = self.frame.to_cell(lo);
        let b = self.frame.to_cell(hi);
        let x0 = a.x.max(0);
        let y0 = a.y.max(0);
        let x1 = b.x.min(self.cols as i32 - 1);
        let y1 = b.y.min(self.rows as i32 - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, x1, y0, y1))
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// `(cols, rows)`.
    pub fn dims(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The coordinate frame used for construction and lookups.
    pub fn frame(&self) -> &WorldFrame {
        &self.frame
    }

    /// Row-major cell states.
    pub fn states(&self) -> &[CellState] {
        &self.cells
    }

    /// `true` if `cell` is inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.cols as i32 && cell.y < self.rows as i32
    }

    /// Flat index of `cell`, or `None` if out of bounds.
    pub fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then(|| self.flat(cell))
    }

    fn flat(&self, cell: Cell) -> usize {
        cell.y as usize * self.cols as usize + cell.x as usize
    }

    /// The cell at flat index `i`. No bounds checking.
    pub fn cell_at(&self, i: usize) -> Cell {
        let cols = self.cols as usize;
        Cell::new((i % cols) as i32, (i / cols) as i32)
    }

    /// State of `cell`, or `Err(OutOfBounds)`.
    pub fn state(&self, cell: Cell) -> Result<CellState, GridError> {
        self.index(cell)
            .map(|i| self.cells[i])
            .ok_or(GridError::OutOfBounds {
                cell,
                cols: self.cols,
                rows: self.rows,
            })
    }

    /// `true` if `cell` is in bounds and free.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.index(cell)
            .is_some_and(|i| self.cells[i] == CellState::Free)
    }

    /// `true` if `cell` is in bounds and occupied.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.index(cell)
            .is_some_and(|i| self.cells[i] == CellState::Occupied)
    }

    /// Map a world point to its cell, or `Err(PointOutOfBounds)`.
    pub fn cell_of(&self, p: Point) -> Result<Cell, GridError> {
        let cell = self.frame.to_cell(p);
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(GridError::PointOutOfBounds { x: p.x, y: p.y })
        }
    }

    /// World coordinates of a cell's centre.
    pub fn cell_center(&self, cell: Cell) -> Point {
        self.frame.cell_center(cell)
    }

    /// In-bounds neighbours of `cell`, in offset order.
    pub fn neighbours(&self, cell: Cell, connectivity: Connectivity) -> SmallVec<[Cell; 8]> {
        connectivity
            .offsets()
            .iter()
            .map(|&(dx, dy)| cell.offset(dx, dy))
            .filter(|&n| self.contains(n))
            .collect()
    }

    /// In-bounds free neighbours of `cell`, in offset order.
    pub fn free_neighbours(&self, cell: Cell, connectivity: Connectivity) -> SmallVec<[Cell; 8]> {
        connectivity
            .offsets()
            .iter()
            .map(|&(dx, dy)| cell.offset(dx, dy))
            .filter(|&n| self.is_free(n))
            .collect()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&s| s == CellState::Occupied)
            .count()
    }

    /// Number of free cells.
    pub fn free_count(&self) -> usize {
        self.cells.len() - self.occupied_count()
    }

    /// Iterate `(cell, state)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &s)| (self.cell_at(i), s))
    }
}
