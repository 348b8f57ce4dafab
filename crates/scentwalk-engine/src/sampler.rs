//! Biased direction sampling.
//!
//! Each tick the walker ranks its eight neighbours by the active surface,
//! draws a pool size `n` from a [`ProbabilityTable`], keeps the top `n`
//! neighbours up to the first negative value and picks one uniformly.
//! Off-grid and occupied neighbours rank at [`BLOCKED`], so they are never
//! in the pool.

use rand::Rng;
use smallvec::SmallVec;

use scentwalk_core::Cell;
use scentwalk_fields::Field;
use scentwalk_space::{Grid, OFFSETS_8};

/// Rank value of a neighbour the walker may not enter.
pub const BLOCKED: f64 = -1.0e12;

/// Discrete distribution over pool sizes `1..=8`.
///
/// `weight(n) = max(0, 10 - (2.5 p)^3 (n - 1))`, normalized. At `p = 0`
/// every size is equally likely; once `(2.5 p)^3 >= 10` (about `p >= 0.862`)
/// only `n = 1` remains.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityTable {
    weights: [f64; 8],
}

impl ProbabilityTable {
    /// Build the table for `predictability`, clamped to `[0, 1]`.
    pub fn new(predictability: f64) -> Self {
        let p = if predictability.is_nan() {
            0.0
        } else {
            predictability.clamp(0.0, 1.0)
        };
        let slope = (2.5 * p).powi(3);
        let mut weights = [0.0; 8];
        for (i, w) in weights.iter_mut().enumerate() {
            *w = (10.0 - slope * i as f64).max(0.0);
        }
        // weights[0] is always 10, so the sum is positive.
        let sum: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= sum;
        }
        Self { weights }
    }

    /// Probability of each pool size, index `n - 1`.
    pub fn weights(&self) -> &[f64; 8] {
        &self.weights
    }

    /// Draw a pool size in `1..=8`.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let u: f64 = rng.random();
        let mut acc = 0.0;
        for (i, w) in self.weights.iter().enumerate() {
            acc += w;
            if u < acc {
                return i + 1;
            }
        }
        // Rounding left `u` above the final partial sum.
        self.weights
            .iter()
            .rposition(|&w| w > 0.0)
            .map_or(1, |i| i + 1)
    }
}

/// A neighbour with its rank value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// The neighbouring cell.
    pub cell: Cell,
    /// Surface value, or [`BLOCKED`].
    pub value: f64,
    /// `true` if the cell is in bounds and free.
    pub enterable: bool,
}

/// Outcome of one direction draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepChoice {
    /// Drawn from a non-empty pool.
    Sampled(Cell),
    /// The pool was empty; best enterable neighbour taken instead.
    Fallback(Cell),
    /// No neighbour can be entered.
    Trapped,
}

impl StepChoice {
    /// The chosen cell, if any.
    pub fn cell(self) -> Option<Cell> {
        match self {
            Self::Sampled(c) | Self::Fallback(c) => Some(c),
            Self::Trapped => None,
        }
    }
}

/// The eight neighbours of `at`, sorted by value descending. Ties keep the
/// fixed neighbour order (cardinals, then diagonals).
pub fn rank_neighbours(grid: &Grid, surface: &Field, at: Cell) -> SmallVec<[Candidate; 8]> {
    let mut ranked: SmallVec<[Candidate; 8]> = OFFSETS_8
        .iter()
        .map(|&(dx, dy)| {
            let cell = at.offset(dx, dy);
            let enterable = grid.is_free(cell);
            let value = match surface.get(cell) {
                Some(v) if enterable && !v.is_nan() => v,
                _ => BLOCKED,
            };
            Candidate {
                cell,
                value,
                enterable,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked
}

/// Pick a step from `ranked` using a pool of the top `count` entries.
pub fn choose_step<R: Rng + ?Sized>(
    ranked: &[Candidate],
    count: usize,
    rng: &mut R,
) -> StepChoice {
    let top = &ranked[..count.min(ranked.len())];
    let pool_len = top
        .iter()
        .position(|c| c.value < 0.0 || !c.enterable)
        .unwrap_or(top.len());
    if pool_len > 0 {
        return StepChoice::Sampled(top[rng.random_range(0..pool_len)].cell);
    }
    ranked
        .iter()
        .find(|c| c.enterable)
        .map_or(StepChoice::Trapped, |c| StepChoice::Fallback(c.cell))
}
