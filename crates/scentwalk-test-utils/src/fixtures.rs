//! Reusable grid and field fixtures.
//!
//! - [`grid_from_ascii`] / [`open_grid`]: arbitrary layouts.
//! - [`wall_with_gap`]: a single wall row, optionally with a one-cell gap.
//! - [`walled_room`]: an open interior ringed by occupied cells.
//! - [`enclosed_source_grid`]: a free cell fully boxed in by walls.
//! - [`bfs_distances`]: reference unit-cost BFS for checking search results.

use scentwalk_core::Cell;
use scentwalk_space::{CellState, Connectivity, Grid};
use std::collections::VecDeque;

/// Build a grid from ASCII rows. `#` marks an occupied cell.
///
/// # Panics
///
/// Panics if the rows are empty or ragged.
pub fn grid_from_ascii(rows: &[&str]) -> Grid {
    let height = rows.len();
    assert!(height > 0, "ascii grid needs at least one row");
    let width = rows[0].chars().count();
    let mut states = Vec::with_capacity(width * height);
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(
            row.chars().count(),
            width,
            "ascii row {y} has a different width"
        );
        states.extend(row.chars().map(|ch| {
            if ch == '#' {
                CellState::Occupied
            } else {
                CellState::Free
            }
        }));
    }
    Grid::from_states(width as u32, height as u32, states).expect("ascii grid dimensions")
}

/// An obstacle-free `cols x rows` grid with unit cells.
pub fn open_grid(cols: u32, rows: u32) -> Grid {
    Grid::open(cols, rows).expect("open grid dimensions")
}

/// A grid with row `wall_y` fully occupied except, optionally, `gap_x`.
pub fn wall_with_gap(cols: u32, rows: u32, wall_y: i32, gap_x: Option<i32>) -> Grid {
    let mut states = vec![CellState::Free; cols as usize * rows as usize];
    for x in 0..cols as i32 {
        if Some(x) != gap_x {
            states[wall_y as usize * cols as usize + x as usize] = CellState::Occupied;
        }
    }
    Grid::from_states(cols, rows, states).expect("wall grid dimensions")
}

/// A `cols x rows` grid whose border ring is occupied.
pub fn walled_room(cols: u32, rows: u32) -> Grid {
    let mut states = vec![CellState::Free; cols as usize * rows as usize];
    for y in 0..rows {
        for x in 0..cols {
            if x == 0 || y == 0 || x + 1 == cols || y + 1 == rows {
                states[(y * cols + x) as usize] = CellState::Occupied;
            }
        }
    }
    Grid::from_states(cols, rows, states).expect("room dimensions")
}

/// A 7x7 grid whose centre cell `(3, 3)` is free but boxed in by a ring of
/// walls; returns the grid and the enclosed cell.
pub fn enclosed_source_grid() -> (Grid, Cell) {
    let grid = grid_from_ascii(&[
        ".......",
        ".......",
        "..###..",
        "..#.#..",
        "..###..",
        ".......",
        ".......",
    ]);
    (grid, Cell::new(3, 3))
}

/// Row-major values: zero everywhere except `peak` at `at`.
pub fn peak_values(cols: u32, rows: u32, at: Cell, peak: f64) -> Vec<f64> {
    let mut v = vec![0.0; cols as usize * rows as usize];
    v[at.y as usize * cols as usize + at.x as usize] = peak;
    v
}

/// Row-major values computed cell by cell.
pub fn ramp_values(cols: u32, rows: u32, f: impl Fn(Cell) -> f64) -> Vec<f64> {
    let mut v = Vec::with_capacity(cols as usize * rows as usize);
    for y in 0..rows as i32 {
        for x in 0..cols as i32 {
            v.push(f(Cell::new(x, y)));
        }
    }
    v
}

/// Unit-cost BFS hop counts from `source` over free cells.
///
/// Row-major; `None` for occupied or unreachable cells.
pub fn bfs_distances(grid: &Grid, source: Cell, connectivity: Connectivity) -> Vec<Option<u32>> {
    let mut dist = vec![None; grid.cell_count()];
    let Some(si) = grid.index(source) else {
        return dist;
    };
    if !grid.is_free(source) {
        return dist;
    }
    dist[si] = Some(0);
    let mut queue = VecDeque::from([source]);
    while let Some(cur) = queue.pop_front() {
        let d = dist[grid.index(cur).expect("queued cells are in bounds")].unwrap_or(0);
        for n in grid.free_neighbours(cur, connectivity) {
            let ni = grid.index(n).expect("neighbours are in bounds");
            if dist[ni].is_none() {
                dist[ni] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }
    dist
}
