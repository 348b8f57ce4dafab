//! The stochastic walker state machine.
//!
//! A walker approaches its targets in order. Each tick it first checks
//! arrival at the active target, then draws a biased step from the target's
//! sniffing map (see [`sampler`](crate::sampler)) and moves one cell.
//!
//! ```text
//! Approaching(k) ──arrive, k last──────────────▶ Done
//!       │        ──arrive, advance roll hits───▶ Approaching(k + 1)
//!       │        ──phase budget spent──────────▶ Aborted(MaxStepsExceeded)
//!       │        ──no enterable neighbour──────▶ Aborted(Trapped)
//!       └──────────cancel flag set─────────────▶ Aborted(Cancelled)
//! ```
//!
//! Arrival on a non-final target advances only with `advance_probability`
//! per tick; otherwise the walker keeps moving under the same map. An
//! advancing tick makes no move.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use scentwalk_core::{Cell, WalkError, WalkerId};
use scentwalk_fields::SniffingMap;
use scentwalk_space::Grid;

use crate::config::WalkerConfig;
use crate::metrics::WalkMetrics;
use crate::sampler::{choose_step, rank_neighbours, ProbabilityTable, StepChoice};

/// Why a walk stopped before visiting every target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// The walker spent its whole budget approaching one target.
    MaxStepsExceeded {
        /// Index of the target being approached.
        target: usize,
        /// Moves made in that phase.
        steps: u32,
    },
    /// Every neighbour of the walker is off-grid or occupied.
    Trapped {
        /// Where the walker was stuck.
        at: Cell,
    },
    /// The caller's cancel flag was set between ticks.
    Cancelled,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxStepsExceeded { target, steps } => {
                write!(f, "reached max steps ({steps}) approaching target {target}")
            }
            Self::Trapped { at } => write!(f, "trapped at {at}"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Walker lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkState {
    /// Heading for the target at this index.
    Approaching(usize),
    /// Reached the final target.
    Done,
    /// Stopped early; the trajectory so far is still valid.
    Aborted(AbortReason),
}

impl WalkState {
    /// `true` for `Done` and `Aborted`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Approaching(_))
    }
}

/// The result of a finished walk.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkOutcome {
    /// Which walker produced this.
    pub id: WalkerId,
    /// Terminal state.
    pub state: WalkState,
    /// Start cell followed by every cell stepped into.
    pub trajectory: Vec<Cell>,
    /// Counters collected during the run.
    pub metrics: WalkMetrics,
}

impl WalkOutcome {
    /// `true` if every target was reached.
    pub fn is_done(&self) -> bool {
        self.state == WalkState::Done
    }

    /// The abort reason, if the walk stopped early.
    pub fn abort_reason(&self) -> Option<AbortReason> {
        match self.state {
            WalkState::Aborted(r) => Some(r),
            _ => None,
        }
    }
}

/// A single stochastic agent.
///
/// The grid and maps are shared read-only; everything else is owned. A
/// walker is `Send`, so batches can run one walker per thread.
pub struct Walker {
    id: WalkerId,
    grid: Arc<Grid>,
    targets: Vec<Arc<SniffingMap>>,
    config: WalkerConfig,
    table: ProbabilityTable,
    rng: ChaCha8Rng,
    position: Cell,
    state: WalkState,
    phase_steps: u32,
    trajectory: Vec<Cell>,
    metrics: WalkMetrics,
}

impl fmt::Debug for Walker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walker")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("state", &self.state)
            .field("targets", &self.targets.len())
            .field("trajectory_len", &self.trajectory.len())
            .finish()
    }
}

impl Walker {
    /// Create a walker at `start` heading for `targets` in order.
    ///
    /// # Errors
    ///
    /// - [`WalkError::NoTargets`] for an empty target list
    /// - [`WalkError::OutOfBounds`] / [`WalkError::StartBlocked`] for a bad start
    /// - [`WalkError::DimensionMismatch`] if a map does not cover `grid`
    /// - [`WalkError::InvalidParameter`] if `config` fails validation
    pub fn new(
        id: WalkerId,
        grid: Arc<Grid>,
        start: Cell,
        targets: Vec<Arc<SniffingMap>>,
        config: WalkerConfig,
    ) -> Result<Self, WalkError> {
        config
            .validate()
            .map_err(|e| WalkError::InvalidParameter {
                reason: e.to_string(),
            })?;
        if targets.is_empty() {
            return Err(WalkError::NoTargets);
        }
        if !grid.contains(start) {
            return Err(WalkError::OutOfBounds { cell: start });
        }
        if !grid.is_free(start) {
            return Err(WalkError::StartBlocked { cell: start });
        }
        if let Some(target) = targets.iter().position(|m| m.dims() != grid.dims()) {
            return Err(WalkError::DimensionMismatch { target });
        }

        Ok(Self {
            id,
            table: ProbabilityTable::new(config.predictability),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            metrics: WalkMetrics::for_targets(targets.len()),
            grid,
            targets,
            config,
            position: start,
            state: WalkState::Approaching(0),
            phase_steps: 0,
            trajectory: vec![start],
        })
    }

    /// This walker's id.
    pub fn id(&self) -> WalkerId {
        self.id
    }

    /// Current cell.
    pub fn position(&self) -> Cell {
        self.position
    }

    /// Current state.
    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Cells visited so far, start first.
    pub fn trajectory(&self) -> &[Cell] {
        &self.trajectory
    }

    /// Counters so far.
    pub fn metrics(&self) -> &WalkMetrics {
        &self.metrics
    }

    /// The walker's parameters.
    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Advance by one tick. A no-op once the state is terminal.
    pub fn tick(&mut self) -> WalkState {
        let WalkState::Approaching(k) = self.state else {
            return self.state;
        };
        let map = Arc::clone(&self.targets[k]);

        if self.position.euclidean(map.target()) < self.config.arrival_radius {
            if k + 1 == self.targets.len() {
                self.metrics.arrivals += 1;
                debug!("[Walker {}] done at {}", self.id, self.position);
                self.state = WalkState::Done;
                return self.state;
            }
            if self.rng.random::<f64>() < self.config.advance_probability {
                self.metrics.arrivals += 1;
                debug!(
                    "[Walker {}] reached target {k} at {}, heading for {}",
                    self.id,
                    self.position,
                    k + 1
                );
                self.phase_steps = 0;
                self.state = WalkState::Approaching(k + 1);
                return self.state;
            }
            self.metrics.lingering_ticks += 1;
        }

        if self.phase_steps >= self.config.max_steps {
            return self.abort(AbortReason::MaxStepsExceeded {
                target: k,
                steps: self.phase_steps,
            });
        }

        let ranked = rank_neighbours(&self.grid, map.surface(), self.position);
        let count = self.table.draw(&mut self.rng);
        let next = match choose_step(&ranked, count, &mut self.rng) {
            StepChoice::Sampled(cell) => cell,
            StepChoice::Fallback(cell) => {
                self.metrics.fallback_steps += 1;
                cell
            }
            StepChoice::Trapped => {
                return self.abort(AbortReason::Trapped { at: self.position });
            }
        };

        self.position = next;
        self.trajectory.push(next);
        self.phase_steps += 1;
        self.metrics.phase_steps[k] += 1;
        self.metrics.total_steps += 1;
        self.state
    }

    /// Tick until the state is terminal.
    pub fn run(&mut self) -> WalkState {
        self.run_until(|| false)
    }

    /// Tick until the state is terminal or `cancel` is set.
    ///
    /// The flag is read between ticks.
    pub fn run_cancellable(&mut self, cancel: &AtomicBool) -> WalkState {
        self.run_until(|| cancel.load(Ordering::Relaxed))
    }

    fn run_until(&mut self, cancelled: impl Fn() -> bool) -> WalkState {
        let started = Instant::now();
        while !self.state.is_terminal() {
            if cancelled() {
                self.abort(AbortReason::Cancelled);
                break;
            }
            self.tick();
        }
        self.metrics.elapsed_us += started.elapsed().as_micros() as u64;
        self.state
    }

    /// Consume the walker into its outcome.
    pub fn into_outcome(self) -> WalkOutcome {
        WalkOutcome {
            id: self.id,
            state: self.state,
            trajectory: self.trajectory,
            metrics: self.metrics,
        }
    }

    fn abort(&mut self, reason: AbortReason) -> WalkState {
        warn!("[Walker {}] aborted at {}: {reason}", self.id, self.position);
        self.state = WalkState::Aborted(reason);
        self.state
    }
}
