//! Walker and session configuration, validation, and error types.
//!
//! Both configs are plain structs with [`Default`] values taken from the
//! reference floor-plan pipeline; call `validate()` before use. Walker and
//! session constructors validate on their own, so an explicit call is only
//! needed to surface problems early.

use std::error::Error;
use std::fmt;

use scentwalk_fields::{DistanceFieldConfig, SmoothingConfig};
use scentwalk_space::{Connectivity, WorldRect};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`WalkerConfig::validate`] and
/// [`SessionConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Predictability is NaN or outside `[0, 1]`.
    InvalidPredictability {
        /// The rejected value.
        value: f64,
    },
    /// Advance probability is NaN or outside `[0, 1]`.
    InvalidAdvanceProbability {
        /// The rejected value.
        value: f64,
    },
    /// Arrival radius is not finite and positive.
    InvalidArrivalRadius {
        /// The rejected value.
        value: f64,
    },
    /// `max_steps` is zero.
    ZeroMaxSteps,
    /// Cell size is not finite and positive.
    InvalidCellSize {
        /// The rejected value.
        value: f64,
    },
    /// The world rectangle is narrower or shorter than one cell.
    EmptyWorld {
        /// World width.
        width: f64,
        /// World height.
        height: f64,
    },
    /// [`SmoothingConfig`] invariant violated.
    InvalidSmoothing {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// [`DistanceFieldConfig`] invariant violated.
    InvalidDistanceField {
        /// Description of which invariant was violated.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPredictability { value } => {
                write!(f, "predictability must be in [0, 1], got {value}")
            }
            Self::InvalidAdvanceProbability { value } => {
                write!(f, "advance_probability must be in [0, 1], got {value}")
            }
            Self::InvalidArrivalRadius { value } => {
                write!(f, "arrival_radius must be finite and positive, got {value}")
            }
            Self::ZeroMaxSteps => write!(f, "max_steps must be at least 1"),
            Self::InvalidCellSize { value } => {
                write!(f, "cell_size must be finite and positive, got {value}")
            }
            Self::EmptyWorld { width, height } => {
                write!(f, "world {width}x{height} holds no whole cell")
            }
            Self::InvalidSmoothing { reason } => write!(f, "invalid smoothing config: {reason}"),
            Self::InvalidDistanceField { reason } => {
                write!(f, "invalid distance field config: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

fn is_probability(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

// ── WalkerConfig ───────────────────────────────────────────────────

/// Parameters of a single walker.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkerConfig {
    /// Bias toward the best-ranked neighbours, in `[0, 1]`. Default: 0.45.
    pub predictability: f64,
    /// Distance (in cells) from a target at which the walker has arrived.
    /// Default: 5.0.
    pub arrival_radius: f64,
    /// Chance, per tick spent inside a non-final target's radius, of moving
    /// on to the next target. Default: 0.2.
    pub advance_probability: f64,
    /// Moves allowed while approaching any single target. Default: 10000.
    pub max_steps: u32,
    /// RNG seed. Default: 0.
    pub seed: u64,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            predictability: 0.45,
            arrival_radius: 5.0,
            advance_probability: 0.2,
            max_steps: 10_000,
            seed: 0,
        }
    }
}

impl WalkerConfig {
    /// Check every parameter range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_probability(self.predictability) {
            return Err(ConfigError::InvalidPredictability {
                value: self.predictability,
            });
        }
        if !is_probability(self.advance_probability) {
            return Err(ConfigError::InvalidAdvanceProbability {
                value: self.advance_probability,
            });
        }
        if !self.arrival_radius.is_finite() || self.arrival_radius <= 0.0 {
            return Err(ConfigError::InvalidArrivalRadius {
                value: self.arrival_radius,
            });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        Ok(())
    }

    /// The same config with a different seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }
}

// ── SessionConfig ──────────────────────────────────────────────────

/// Parameters of a simulation session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// World units per grid cell. Default: 1.0.
    pub cell_size: f64,
    /// The floor-plan region to discretize. Default: 100 x 100 at the origin.
    pub world: WorldRect,
    /// Added to world coordinates before mapping to cells. Default: `(0, 0)`.
    pub translation: (f64, f64),
    /// Sniffing-map smoothing widths.
    pub smoothing: SmoothingConfig,
    /// Fragrance flood-fill parameters.
    pub distance: DistanceFieldConfig,
    /// Neighbourhood for A* searches. Default: 8-connected.
    pub connectivity: Connectivity,
    /// Threads used by batch walker runs. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 16]`).
    pub worker_count: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            world: WorldRect::from_size(100.0, 100.0),
            translation: (0.0, 0.0),
            smoothing: SmoothingConfig::default(),
            distance: DistanceFieldConfig::default(),
            connectivity: Connectivity::Eight,
            worker_count: None,
        }
    }
}

impl SessionConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize {
                value: self.cell_size,
            });
        }
        let (width, height) = (self.world.width(), self.world.height());
        if !(width >= self.cell_size && height >= self.cell_size) {
            return Err(ConfigError::EmptyWorld { width, height });
        }
        self.smoothing
            .validate()
            .map_err(|reason| ConfigError::InvalidSmoothing { reason })?;
        self.distance
            .validate()
            .map_err(|reason| ConfigError::InvalidDistanceField { reason })?;
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 16),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── WalkerConfig ────────────────────────────────────────────

    #[test]
    fn walker_defaults_are_valid() {
        let c = WalkerConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.max_steps, 10_000);
        assert_eq!(c.arrival_radius, 5.0);
    }

    #[test]
    fn walker_rejects_out_of_range() {
        let base = WalkerConfig::default();
        let bad = WalkerConfig {
            predictability: 1.5,
            ..base.clone()
        };
        assert_eq!(
            bad.validate(),
            Err(ConfigError::InvalidPredictability { value: 1.5 })
        );
        let bad = WalkerConfig {
            advance_probability: -0.1,
            ..base.clone()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidAdvanceProbability { .. })
        ));
        let bad = WalkerConfig {
            arrival_radius: 0.0,
            ..base.clone()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidArrivalRadius { .. })
        ));
        let bad = WalkerConfig {
            max_steps: 0,
            ..base
        };
        assert_eq!(bad.validate(), Err(ConfigError::ZeroMaxSteps));
    }

    #[test]
    fn nan_predictability_rejected() {
        let bad = WalkerConfig {
            predictability: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    // ── SessionConfig ───────────────────────────────────────────

    #[test]
    fn session_defaults_are_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn session_rejects_bad_geometry() {
        let bad = SessionConfig {
            cell_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidCellSize { .. })
        ));
        let bad = SessionConfig {
            world: WorldRect::from_size(0.5, 10.0),
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::EmptyWorld { .. })));
    }

    #[test]
    fn session_forwards_nested_errors() {
        let bad = SessionConfig {
            smoothing: SmoothingConfig {
                truncate: -1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidSmoothing { .. })
        ));
        let bad = SessionConfig {
            distance: DistanceFieldConfig {
                wall_value: 5.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = bad.validate().unwrap_err();
        assert!(err.to_string().starts_with("invalid distance field config"));
    }

    #[test]
    fn worker_count_clamped() {
        let c = SessionConfig {
            worker_count: Some(0),
            ..Default::default()
        };
        assert_eq!(c.resolved_worker_count(), 1);
        let c = SessionConfig {
            worker_count: Some(1000),
            ..Default::default()
        };
        assert_eq!(c.resolved_worker_count(), 64);
        assert!(SessionConfig::default().resolved_worker_count() >= 1);
    }
}
