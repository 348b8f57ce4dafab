//! Multi-frontier flood fill ("fragrance").
//!
//! The source cell starts at `max_distance = cols * rows`; every free cell
//! first reached at hop `d + 1` gets `max_distance - (d + 1)`. Walls keep
//! `wall_value` and never join a frontier. After the fill, every reached
//! cell is shifted down by `min_reached + normalization_offset`, so the
//! farthest reached cells sit at `-normalization_offset` regardless of
//! grid size. Unreached free cells stay at `0.0`; use
//! [`DistanceField::is_reached`] rather than inspecting values.

use log::trace;
use scentwalk_core::{Cell, FieldError};
use scentwalk_space::{CellState, Connectivity, Grid};

use crate::field::Field;

/// Flood-fill parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceFieldConfig {
    /// Added to the smallest reached potential before it is subtracted.
    pub normalization_offset: f64,
    /// Value held by occupied cells. Must be below `-normalization_offset`.
    pub wall_value: f64,
    /// Frontier expansion neighbourhood.
    pub connectivity: Connectivity,
}

impl Default for DistanceFieldConfig {
    fn default() -> Self {
        Self {
            normalization_offset: 1.0,
            wall_value: -100.0,
            connectivity: Connectivity::Eight,
        }
    }
}

impl DistanceFieldConfig {
    /// Check that walls stay distinguishable from every reached potential.
    pub fn validate(&self) -> Result<(), String> {
        if !self.normalization_offset.is_finite() || self.normalization_offset < 0.0 {
            return Err(format!(
                "normalization_offset must be finite and >= 0, got {}",
                self.normalization_offset
            ));
        }
        if !self.wall_value.is_finite() || self.wall_value >= -self.normalization_offset {
            return Err(format!(
                "wall_value must be finite and below {}, got {}",
                -self.normalization_offset, self.wall_value
            ));
        }
        Ok(())
    }
}

/// A normalized distance field from a single source cell.
#[derive(Clone, Debug)]
pub struct DistanceField {
    source: Cell,
    field: Field,
    hops: Vec<Option<u32>>,
    depth: u32,
}

impl DistanceField {
    /// Flood-fill `grid` from `source`.
    ///
    /// # Errors
    ///
    /// [`FieldError::OutOfBounds`] or [`FieldError::SourceBlocked`] for a bad
    /// source, and [`FieldError::DegenerateField`] when the fill reaches no
    /// free cell besides the source.
    pub fn compute(
        grid: &Grid,
        source: Cell,
        config: &DistanceFieldConfig,
    ) -> Result<Self, FieldError> {
        let Some(si) = grid.index(source) else {
            return Err(FieldError::OutOfBounds { cell: source });
        };
        if !grid.is_free(source) {
            return Err(FieldError::SourceBlocked { cell: source });
        }

        let max_distance = grid.cell_count() as f64;
        let mut field = Field::for_grid(grid, 0.0);
        let mut hops = vec![None; grid.cell_count()];
        {
            let values = field.values_mut();
            for (i, (_, state)) in grid.iter().enumerate() {
                if state == CellState::Occupied {
                    values[i] = config.wall_value;
                }
            }
            values[si] = max_distance;
        }
        hops[si] = Some(0);

        let mut frontier = vec![source];
        let mut next = Vec::new();
        let mut d = 0u32;
        let mut reached = 1usize;
        while !frontier.is_empty() {
            for &cell in &frontier {
                for nb in grid.free_neighbours(cell, config.connectivity) {
                    let Some(ni) = grid.index(nb) else {
                        continue;
                    };
                    if hops[ni].is_some() {
                        continue;
                    }
                    hops[ni] = Some(d + 1);
                    field.values_mut()[ni] = max_distance - f64::from(d + 1);
                    next.push(nb);
                }
            }
            if next.is_empty() {
                break;
            }
            reached += next.len();
            d += 1;
            std::mem::swap(&mut frontier, &mut next);
            next.clear();
        }

        if reached == 1 {
            return Err(FieldError::DegenerateField { source });
        }

        let shift = max_distance - f64::from(d) + config.normalization_offset;
        let values = field.values_mut();
        for (v, h) in values.iter_mut().zip(&hops) {
            if h.is_some() {
                *v -= shift;
            }
        }
        trace!("[Fragrance] source={source} reached={reached} depth={d}");

        Ok(Self {
            source,
            field,
            hops,
            depth: d,
        })
    }

    /// The source cell.
    pub fn source(&self) -> Cell {
        self.source
    }

    /// The normalized potentials.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Consume into the normalized potentials.
    pub fn into_field(self) -> Field {
        self.field
    }

    /// `true` if the fill reached `cell` (the source included).
    pub fn is_reached(&self, cell: Cell) -> bool {
        self.hops(cell).is_some()
    }

    /// BFS hop count from the source, or `None` if unreached.
    pub fn hops(&self, cell: Cell) -> Option<u32> {
        self.field.index(cell).and_then(|i| self.hops[i])
    }

    /// Number of reached cells, the source included.
    pub fn reached_count(&self) -> usize {
        self.hops.iter().filter(|h| h.is_some()).count()
    }

    /// Largest hop count reached.
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use scentwalk_test_utils::{
        bfs_distances, enclosed_source_grid, grid_from_ascii, open_grid, wall_with_gap,
    };

    fn compute(grid: &Grid, source: Cell) -> DistanceField {
        DistanceField::compute(grid, source, &DistanceFieldConfig::default()).unwrap()
    }

    // ── Values ──────────────────────────────────────────────────

    #[test]
    fn open_grid_far_corner_is_lower() {
        let g = open_grid(10, 10);
        let df = compute(&g, Cell::new(0, 0));
        let far = df.field().get(Cell::new(9, 9)).unwrap();
        let near = df.field().get(Cell::new(1, 1)).unwrap();
        assert!(far < near);
    }

    #[test]
    fn farthest_cells_sit_at_negative_offset() {
        let g = open_grid(10, 10);
        let df = compute(&g, Cell::new(0, 0));
        assert_eq!(df.depth(), 9);
        assert_eq!(df.field().get(Cell::new(9, 9)), Some(-1.0));
        assert_eq!(df.field().get(Cell::new(0, 0)), Some(8.0));
        assert_eq!(df.field().get(Cell::new(1, 0)), Some(7.0));
    }

    #[test]
    fn walls_hold_sentinel() {
        let g = wall_with_gap(5, 5, 2, Some(4));
        let df = compute(&g, Cell::new(0, 0));
        for x in 0..4 {
            assert_eq!(df.field().get(Cell::new(x, 2)), Some(-100.0));
            assert!(!df.is_reached(Cell::new(x, 2)));
        }
        assert!(df.is_reached(Cell::new(0, 4)));
    }

    #[test]
    fn unreached_cells_stay_zero() {
        let g = grid_from_ascii(&["..#..", "..#..", "..#.."]);
        let df = compute(&g, Cell::new(0, 0));
        assert!(!df.is_reached(Cell::new(4, 0)));
        assert_eq!(df.field().get(Cell::new(4, 0)), Some(0.0));
        assert_eq!(df.reached_count(), 6);
    }

    #[test]
    fn four_connectivity_uses_manhattan_hops() {
        let g = open_grid(4, 4);
        let config = DistanceFieldConfig {
            connectivity: Connectivity::Four,
            ..Default::default()
        };
        let df = DistanceField::compute(&g, Cell::new(0, 0), &config).unwrap();
        assert_eq!(df.hops(Cell::new(3, 3)), Some(6));
    }

    // ── Errors ──────────────────────────────────────────────────

    #[test]
    fn enclosed_source_is_degenerate() {
        let (g, src) = enclosed_source_grid();
        let err = DistanceField::compute(&g, src, &DistanceFieldConfig::default()).unwrap_err();
        assert_eq!(err, FieldError::DegenerateField { source: src });
    }

    #[test]
    fn bad_sources_rejected() {
        let g = grid_from_ascii(&["#..", "..."]);
        let config = DistanceFieldConfig::default();
        assert_eq!(
            DistanceField::compute(&g, Cell::new(0, 0), &config).unwrap_err(),
            FieldError::SourceBlocked {
                cell: Cell::new(0, 0)
            }
        );
        assert_eq!(
            DistanceField::compute(&g, Cell::new(3, 0), &config).unwrap_err(),
            FieldError::OutOfBounds {
                cell: Cell::new(3, 0)
            }
        );
    }

    #[test]
    fn config_validation() {
        assert!(DistanceFieldConfig::default().validate().is_ok());
        let bad = DistanceFieldConfig {
            wall_value: -0.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = DistanceFieldConfig {
            normalization_offset: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    // ── Properties ──────────────────────────────────────────────

    proptest! {
        #[test]
        fn potential_strictly_decreases_with_hops(
            walls in proptest::collection::vec(proptest::bool::weighted(0.2), 64),
            sx in 0i32..8, sy in 0i32..8,
        ) {
            let states = walls
                .iter()
                .map(|&w| if w { CellState::Occupied } else { CellState::Free })
                .collect();
            let g = Grid::from_states(8, 8, states).unwrap();
            let src = Cell::new(sx, sy);
            let reference = bfs_distances(&g, src, Connectivity::Eight);
            match DistanceField::compute(&g, src, &DistanceFieldConfig::default()) {
                Ok(df) => {
                    let reached: Vec<(u32, f64)> = g
                        .iter()
                        .filter_map(|(c, _)| Some((df.hops(c)?, df.field().get(c)?)))
                        .collect();
                    for (i, (c, _)) in g.iter().enumerate() {
                        prop_assert_eq!(df.hops(c), reference[i]);
                    }
                    for &(ha, va) in &reached {
                        for &(hb, vb) in &reached {
                            if ha < hb {
                                prop_assert!(va > vb);
                            }
                        }
                    }
                }
                Err(FieldError::SourceBlocked { .. }) => prop_assert!(!g.is_free(src)),
                Err(FieldError::DegenerateField { .. }) => {
                    prop_assert_eq!(reference.iter().filter(|d| d.is_some()).count(), 1);
                }
                Err(e) => prop_assert!(false, "unexpected error {e}"),
            }
        }
    }
}
