//! Per-walk counters.
//!
//! [`WalkMetrics`] is filled in by the walker as it ticks and travels with
//! the [`WalkOutcome`](crate::walker::WalkOutcome).

/// Step and timing counters for one walker run.
///
/// Durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalkMetrics {
    /// Moves made across all phases.
    pub total_steps: u64,
    /// Moves made while approaching each target, by target index.
    pub phase_steps: Vec<u32>,
    /// Targets left behind after arrival (the final one included).
    pub arrivals: u32,
    /// Ticks spent inside a target's radius that did not advance.
    pub lingering_ticks: u32,
    /// Moves taken from the best enterable neighbour because the sampled
    /// pool was empty.
    pub fallback_steps: u32,
    /// Wall-clock time spent in `run`, in microseconds.
    pub elapsed_us: u64,
}

impl WalkMetrics {
    /// Metrics sized for `targets` phases.
    pub fn for_targets(targets: usize) -> Self {
        Self {
            phase_steps: vec![0; targets],
            ..Self::default()
        }
    }
}
