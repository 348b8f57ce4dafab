//! Walker-facing attraction surfaces ("sniffing maps").
//!
//! A [`SniffingMap`] is built in two steps: an [`AttractionSource`] produces
//! an unsmoothed base surface, then a [`GaussianSmoother`] widens it. Both
//! surfaces are kept so callers can inspect the pre-gradient.

use std::fmt;

use log::debug;
use scentwalk_core::{Cell, FieldError};
use scentwalk_space::{CellState, Grid};

use crate::astar::PathResult;
use crate::distance::{DistanceField, DistanceFieldConfig};
use crate::field::Field;
use crate::smoothing::GaussianSmoother;

/// Which construction strategy produced a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttractionKind {
    /// Reward stamped along an A* path.
    Path,
    /// Flood-fill distance from a single cell.
    Distance,
    /// Caller-supplied base surface.
    Custom,
}

impl fmt::Display for AttractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => f.write_str("path"),
            Self::Distance => f.write_str("distance"),
            Self::Custom => f.write_str("custom"),
        }
    }
}

/// A strategy for building the unsmoothed base surface of a map.
///
/// Implementations must return a field with `grid`'s dimensions whose
/// values increase toward [`target`](AttractionSource::target).
pub trait AttractionSource {
    /// Strategy tag recorded on the built map.
    fn kind(&self) -> AttractionKind;

    /// The cell a walker following this map is heading for.
    fn target(&self) -> Cell;

    /// Build the base surface over `grid`.
    fn base_surface(&self, grid: &Grid) -> Result<Field, FieldError>;
}

/// Reward assigned to the `i`-th cell of a path.
#[derive(Clone, Copy, Debug, Default)]
pub enum PathGradient {
    /// `i * i`.
    #[default]
    Quadratic,
    /// `i`.
    Linear,
    /// Any caller-supplied function of the path index.
    Custom(fn(usize) -> f64),
}

impl PathGradient {
    /// Reward for path index `i`.
    pub fn value(&self, i: usize) -> f64 {
        match self {
            Self::Quadratic => (i * i) as f64,
            Self::Linear => i as f64,
            Self::Custom(f) => f(i),
        }
    }
}

/// Path-based strategy: walls get `wall_value`, free cells zero, and path
/// cell `i` gets `gradient.value(i)`.
#[derive(Clone, Debug)]
pub struct PathAttraction {
    path: PathResult,
    gradient: PathGradient,
    wall_value: f64,
}

impl PathAttraction {
    /// Default wall penalty of the base surface.
    pub const DEFAULT_WALL_VALUE: f64 = -100.0;

    /// A quadratic reward along `path`.
    pub fn new(path: PathResult) -> Self {
        Self {
            path,
            gradient: PathGradient::default(),
            wall_value: Self::DEFAULT_WALL_VALUE,
        }
    }

    /// Replace the path reward.
    pub fn with_gradient(mut self, gradient: PathGradient) -> Self {
        self.gradient = gradient;
        self
    }

    /// Replace the wall penalty.
    pub fn with_wall_value(mut self, wall_value: f64) -> Self {
        self.wall_value = wall_value;
        self
    }

    /// The underlying path.
    pub fn path(&self) -> &PathResult {
        &self.path
    }
}

impl AttractionSource for PathAttraction {
    fn kind(&self) -> AttractionKind {
        AttractionKind::Path
    }

    fn target(&self) -> Cell {
        self.path.end()
    }

    fn base_surface(&self, grid: &Grid) -> Result<Field, FieldError> {
        let mut field = Field::for_grid(grid, 0.0);
        {
            let values = field.values_mut();
            for (v, &state) in values.iter_mut().zip(grid.states()) {
                if state == CellState::Occupied {
                    *v = self.wall_value;
                }
            }
        }
        for (i, &cell) in self.path.cells().iter().enumerate() {
            let idx = grid
                .index(cell)
                .ok_or(FieldError::OutOfBounds { cell })?;
            field.values_mut()[idx] = self.gradient.value(i);
        }
        Ok(field)
    }
}

/// Distance-based strategy: the normalized flood fill from one cell.
#[derive(Clone, Copy, Debug)]
pub struct DistanceAttraction {
    source: Cell,
    config: DistanceFieldConfig,
}

impl DistanceAttraction {
    /// Flood fill from `source` with default parameters.
    pub fn new(source: Cell) -> Self {
        Self {
            source,
            config: DistanceFieldConfig::default(),
        }
    }

    /// Replace the flood-fill parameters.
    pub fn with_config(mut self, config: DistanceFieldConfig) -> Self {
        self.config = config;
        self
    }
}

impl AttractionSource for DistanceAttraction {
    fn kind(&self) -> AttractionKind {
        AttractionKind::Distance
    }

    fn target(&self) -> Cell {
        self.source
    }

    fn base_surface(&self, grid: &Grid) -> Result<Field, FieldError> {
        DistanceField::compute(grid, self.source, &self.config).map(DistanceField::into_field)
    }
}

/// A smoothed attraction surface consumed by walkers.
#[derive(Clone, Debug)]
pub struct SniffingMap {
    kind: AttractionKind,
    target: Cell,
    sigma: (f64, f64),
    pre_gradient: Field,
    surface: Field,
}

impl SniffingMap {
    /// Build the base surface from `source` and smooth it.
    pub fn build(
        grid: &Grid,
        source: &dyn AttractionSource,
        smoother: &GaussianSmoother,
    ) -> Result<Self, FieldError> {
        let pre_gradient = source.base_surface(grid)?;
        pre_gradient.check_dims(grid)?;
        let surface = smoother.smooth(grid, &pre_gradient)?;
        debug!(
            "[Sniff] built {} map toward {} sigma=({:.3}, {:.3})",
            source.kind(),
            source.target(),
            smoother.sigma().0,
            smoother.sigma().1
        );
        Ok(Self {
            kind: source.kind(),
            target: source.target(),
            sigma: smoother.sigma(),
            pre_gradient,
            surface,
        })
    }

    /// The strategy that produced this map.
    pub fn kind(&self) -> AttractionKind {
        self.kind
    }

    /// The goal cell.
    pub fn target(&self) -> Cell {
        self.target
    }

    /// Smoothing widths `(sigma_x, sigma_y)`.
    pub fn sigma(&self) -> (f64, f64) {
        self.sigma
    }

    /// The base surface before smoothing.
    pub fn pre_gradient(&self) -> &Field {
        &self.pre_gradient
    }

    /// The smoothed surface.
    pub fn surface(&self) -> &Field {
        &self.surface
    }

    /// Smoothed value at `cell`, or `None` off-grid.
    pub fn value_at(&self, cell: Cell) -> Option<f64> {
        self.surface.get(cell)
    }

    /// `(cols, rows)` of the surface.
    pub fn dims(&self) -> (u32, u32) {
        self.surface.dims()
    }
}
