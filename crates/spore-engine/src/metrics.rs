//! Per-generation timing collected by each worker.
//!
//! [`GenerationMetrics`] captures where one generation's wall time went;
//! [`RunMetrics`] folds them into totals for the run report.

use std::time::Duration;

/// Timing collected during a single generation.
///
/// All durations are in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationMetrics {
    /// Time spent in the parallel compute phase.
    pub compute_us: u64,
    /// Time spent waiting for the previous reduction to resolve.
    pub reduce_wait_us: u64,
    /// Time spent waiting for halo transfers to complete.
    pub halo_wait_us: u64,
}

/// Aggregate timing over a whole run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Generations recorded.
    pub generations: u32,
    /// Summed compute time, in microseconds.
    pub compute_us: u64,
    /// Summed reduction wait time, in microseconds.
    pub reduce_wait_us: u64,
    /// Summed halo wait time, in microseconds.
    pub halo_wait_us: u64,
    /// Slowest single compute phase, in microseconds.
    pub max_compute_us: u64,
}

impl RunMetrics {
    /// Fold one generation into the totals.
    pub fn record(&mut self, m: &GenerationMetrics) {
        self.generations += 1;
        self.compute_us += m.compute_us;
        self.reduce_wait_us += m.reduce_wait_us;
        self.halo_wait_us += m.halo_wait_us;
        self.max_compute_us = self.max_compute_us.max(m.compute_us);
    }

    /// Mean compute time per generation, or zero before any generation.
    pub fn mean_compute(&self) -> Duration {
        match self.generations {
            0 => Duration::ZERO,
            n => Duration::from_micros(self.compute_us / u64::from(n)),
        }
    }

    /// Share of recorded time spent blocked on communication, in `[0, 1]`.
    pub fn wait_fraction(&self) -> f64 {
        let waiting = self.reduce_wait_us + self.halo_wait_us;
        let total = self.compute_us + waiting;
        if total == 0 {
            0.0
        } else {
            waiting as f64 / total as f64
        }
    }
}

pub(crate) fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.generations, 0);
        assert_eq!(m.mean_compute(), Duration::ZERO);
        assert_eq!(m.wait_fraction(), 0.0);
    }

    #[test]
    fn record_accumulates_and_tracks_max() {
        let mut run = RunMetrics::default();
        run.record(&GenerationMetrics {
            compute_us: 100,
            reduce_wait_us: 10,
            halo_wait_us: 40,
        });
        run.record(&GenerationMetrics {
            compute_us: 300,
            reduce_wait_us: 0,
            halo_wait_us: 50,
        });
        assert_eq!(run.generations, 2);
        assert_eq!(run.compute_us, 400);
        assert_eq!(run.max_compute_us, 300);
        assert_eq!(run.mean_compute(), Duration::from_micros(200));
        assert!((run.wait_fraction() - 100.0 / 500.0).abs() < 1e-12);
    }
}
