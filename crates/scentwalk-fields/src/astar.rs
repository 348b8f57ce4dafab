//! A* pathfinding on the occupancy grid.
//!
//! Free cells cost one unit to enter, occupied cells are never pushed onto
//! the open set. The heuristic is the unit-cost geodesic for the chosen
//! connectivity (Chebyshev for 8, Manhattan for 4), which is admissible and
//! consistent, so the first time the goal is popped its path is minimal.
//!
//! Ties are broken on lower f, then lower h, then earlier insertion, which
//! makes results reproducible across runs and platforms.

use log::{debug, trace};
use scentwalk_core::{Cell, PathError};
use scentwalk_space::{Connectivity, Grid};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An open-set entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenNode {
    f: u32,
    h: u32,
    seq: u64,
    index: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour on (f, h, seq).
        (other.f, other.h, other.seq).cmp(&(self.f, self.h, self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A start-to-end sequence of grid cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathResult {
    cells: Vec<Cell>,
    expanded: usize,
}

impl PathResult {
    /// Wrap a known cell sequence, e.g. one loaded from elsewhere.
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_cells(cells: Vec<Cell>) -> Option<Self> {
        (!cells.is_empty()).then_some(Self { cells, expanded: 0 })
    }

    /// The cells from start to end inclusive.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// First cell.
    pub fn start(&self) -> Cell {
        self.cells[0]
    }

    /// Last cell.
    pub fn end(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// Number of cells, including both endpoints.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; a path holds at least its start cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves, i.e. total unit cost.
    pub fn cost(&self) -> usize {
        self.cells.len() - 1
    }

    /// Nodes expanded by the search that produced this path.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Consume the result, returning its cells.
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// `true` if every consecutive pair is a single move under `connectivity`.
    pub fn is_connected(&self, connectivity: Connectivity) -> bool {
        self.cells
            .windows(2)
            .all(|w| w[0] != w[1] && connectivity.distance(w[0], w[1]) == 1)
    }
}

/// A* search configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pathfinder {
    connectivity: Connectivity,
}

impl Pathfinder {
    /// A pathfinder with the given neighbourhood.
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    /// The neighbourhood used for expansion.
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Find a minimal unit-cost path from `start` to `end`.
    ///
    /// # Errors
    ///
    /// - [`PathError::OutOfBounds`] if either endpoint is outside the grid
    /// - [`PathError::StartBlocked`] / [`PathError::GoalBlocked`] if an
    ///   endpoint is occupied
    /// - [`PathError::PathNotFound`] if the open set is exhausted
    pub fn find_path(&self, grid: &Grid, start: Cell, end: Cell) -> Result<PathResult, PathError> {
        trace!("[AStar] find_path: start={start} end={end}");

        let (Some(start_i), Some(end_i)) = (grid.index(start), grid.index(end)) else {
            let cell = if grid.contains(start) { end } else { start };
            debug!("[AStar] FAILED: {cell} outside {}x{} grid", grid.cols(), grid.rows());
            return Err(PathError::OutOfBounds { cell });
        };
        if !grid.is_free(start) {
            debug!("[AStar] FAILED: start {start} is occupied");
            return Err(PathError::StartBlocked { cell: start });
        }
        if !grid.is_free(end) {
            debug!("[AStar] FAILED: goal {end} is occupied");
            return Err(PathError::GoalBlocked { cell: end });
        }

        let n = grid.cell_count();
        let mut g_cost = vec![u32::MAX; n];
        let mut parent = vec![usize::MAX; n];
        let mut closed = vec![false; n];
        let mut open = BinaryHeap::new();
        let mut seq = 0u64;
        let mut expanded = 0usize;

        let h0 = self.connectivity.distance(start, end);
        g_cost[start_i] = 0;
        open.push(OpenNode {
            f: h0,
            h: h0,
            seq,
            index: start_i,
        });

        while let Some(node) = open.pop() {
            if closed[node.index] {
                continue;
            }
            closed[node.index] = true;
            expanded += 1;

            if node.index == end_i {
                let cells = reconstruct(grid, &parent, end_i);
                trace!(
                    "[AStar] found path of {} cells, {expanded} nodes expanded",
                    cells.len()
                );
                return Ok(PathResult { cells, expanded });
            }

            let current = grid.cell_at(node.index);
            let g_next = g_cost[node.index] + 1;
            for nb in grid.free_neighbours(current, self.connectivity) {
                let Some(ni) = grid.index(nb) else {
                    continue;
                };
                if closed[ni] || g_next >= g_cost[ni] {
                    continue;
                }
                g_cost[ni] = g_next;
                parent[ni] = node.index;
                let h = self.connectivity.distance(nb, end);
                seq += 1;
                open.push(OpenNode {
                    f: g_next + h,
                    h,
                    seq,
                    index: ni,
                });
            }
        }

        debug!("[AStar] FAILED: no path from {start} to {end} ({expanded} expanded)");
        Err(PathError::PathNotFound {
            start,
            end,
            expanded,
        })
    }
}

fn reconstruct(grid: &Grid, parent: &[usize], end: usize) -> Vec<Cell> {
    let mut cells = vec![grid.cell_at(end)];
    let mut cur = end;
    while parent[cur] != usize::MAX {
        cur = parent[cur];
        cells.push(grid.cell_at(cur));
    }
    cells.reverse();
    cells
}
