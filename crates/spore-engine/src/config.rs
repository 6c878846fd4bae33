//! Run configuration, validation, and error types.
//!
//! [`SimConfig`] is the input for [`Simulation::new`](crate::Simulation::new).
//! [`validate()`](SimConfig::validate) checks every user-supplied value
//! before any worker is spawned, so bad input never reaches the
//! communication layer.

use std::error::Error;
use std::fmt;

/// Smallest accepted grid side.
pub const MIN_SIDE: usize = 3;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The generation count is zero.
    ZeroGenerations,
    /// The grid side is below [`MIN_SIDE`].
    SideTooSmall {
        /// The configured side.
        side: usize,
    },
    /// `side³` cells do not fit in memory addressing.
    GridTooLarge {
        /// The configured side.
        side: usize,
    },
    /// Density is NaN or outside `[0, 1]`.
    InvalidDensity {
        /// The invalid value.
        value: f32,
    },
    /// Worker count is zero.
    NoWorkers,
    /// Explicit per-worker thread count is zero.
    ZeroThreads,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroGenerations => write!(f, "generation count must be at least 1"),
            Self::SideTooSmall { side } => {
                write!(f, "grid side {side} is below minimum of {MIN_SIDE}")
            }
            Self::GridTooLarge { side } => write!(f, "grid side {side} is too large"),
            Self::InvalidDensity { value } => {
                write!(f, "density must be within [0, 1], got {value}")
            }
            Self::NoWorkers => write!(f, "worker count must be at least 1"),
            Self::ZeroThreads => write!(f, "threads per worker must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete configuration for one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Number of generations to simulate. Minimum: 1.
    pub generations: u32,
    /// Grid side `N`; the grid holds `N³` cells. Minimum: 3.
    pub side: usize,
    /// Initial probability that a cell is alive, in `[0, 1]`.
    pub density: f32,
    /// Seed for the initial grid.
    pub seed: u64,
    /// Number of workers `P`. Only `min(P, N)` take part. Default: 1.
    pub workers: usize,
    /// Compute threads per active worker. `None` = split the available
    /// parallelism evenly across active workers.
    pub threads_per_worker: Option<usize>,
}

impl SimConfig {
    /// A single-worker configuration.
    pub fn new(generations: u32, side: usize, density: f32, seed: u64) -> Self {
        Self {
            generations,
            side,
            density,
            seed,
            workers: 1,
            threads_per_worker: None,
        }
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the compute threads per worker.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads_per_worker = Some(threads);
        self
    }

    /// Validate all user-supplied values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if self.side < MIN_SIDE {
            return Err(ConfigError::SideTooSmall { side: self.side });
        }
        // Two halo layers per slab on top of the N³ interior.
        let cells = self
            .side
            .checked_add(2)
            .and_then(|layers| layers.checked_mul(self.side))
            .and_then(|c| c.checked_mul(self.side));
        if cells.is_none() {
            return Err(ConfigError::GridTooLarge { side: self.side });
        }
        if !self.density.is_finite() || !(0.0..=1.0).contains(&self.density) {
            return Err(ConfigError::InvalidDensity {
                value: self.density,
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.threads_per_worker == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }

    /// Number of workers that receive layers.
    pub fn active_workers(&self) -> usize {
        self.workers.min(self.side)
    }

    /// Resolve the compute threads per active worker.
    ///
    /// Explicit values are used as given. Otherwise the machine's
    /// available parallelism is divided across active workers, with at
    /// least one thread each.
    pub fn resolved_threads(&self) -> usize {
        match self.threads_per_worker {
            Some(n) => n.max(1),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                (cpus / self.active_workers().max(1)).max(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SimConfig {
        SimConfig::new(10, 8, 0.3, 42)
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
        assert!(valid().with_workers(16).with_threads(2).validate().is_ok());
    }

    #[test]
    fn zero_generations_rejected() {
        let mut c = valid();
        c.generations = 0;
        assert_eq!(c.validate(), Err(ConfigError::ZeroGenerations));
    }

    #[test]
    fn side_below_three_rejected() {
        let mut c = valid();
        c.side = 2;
        assert_eq!(c.validate(), Err(ConfigError::SideTooSmall { side: 2 }));
        c.side = 3;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn huge_side_rejected() {
        let mut c = valid();
        c.side = usize::MAX / 2;
        assert!(matches!(c.validate(), Err(ConfigError::GridTooLarge { .. })));
    }

    #[test]
    fn density_bounds() {
        for bad in [-0.01, 1.01, f32::NAN, f32::INFINITY] {
            let mut c = valid();
            c.density = bad;
            assert!(matches!(
                c.validate(),
                Err(ConfigError::InvalidDensity { .. })
            ));
        }
        for good in [0.0, 1.0, 0.5] {
            let mut c = valid();
            c.density = good;
            assert!(c.validate().is_ok());
        }
    }

    #[test]
    fn zero_workers_and_threads_rejected() {
        assert_eq!(
            valid().with_workers(0).validate(),
            Err(ConfigError::NoWorkers)
        );
        assert_eq!(
            valid().with_threads(0).validate(),
            Err(ConfigError::ZeroThreads)
        );
    }

    #[test]
    fn active_workers_capped_by_side() {
        assert_eq!(valid().with_workers(3).active_workers(), 3);
        assert_eq!(valid().with_workers(100).active_workers(), 8);
    }

    #[test]
    fn resolved_threads_never_zero() {
        assert_eq!(valid().with_threads(3).resolved_threads(), 3);
        assert!(valid().with_workers(1_000).resolved_threads() >= 1);
    }
}
