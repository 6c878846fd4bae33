//! Results of a completed run.

use std::time::Duration;

use spore_core::{PeakTable, PopulationTally, Species};

use crate::metrics::RunMetrics;

/// Everything the coordinator learned during a run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Peak population per species and the generation it was reached.
    pub peaks: PeakTable,
    /// Global population of every state `0..=generations`, in order.
    pub history: Vec<PopulationTally>,
    /// Wall time from the first halo exchange to the final reduction,
    /// as measured by the coordinator.
    pub elapsed: Duration,
    /// The coordinator's phase timings.
    pub metrics: RunMetrics,
    /// Workers that owned layers.
    pub active_workers: usize,
    /// Workers spawned, active or not.
    pub workers: usize,
    /// Final grid, layer-major, when collection was requested.
    pub final_grid: Option<Vec<Species>>,
}

impl RunReport {
    /// Number of generations simulated.
    pub fn generations(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// Highest total live population seen in any state.
    pub fn max_live(&self) -> u64 {
        self.history.iter().map(PopulationTally::live).max().unwrap_or(0)
    }
}
