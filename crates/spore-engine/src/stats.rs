//! Population statistics: local tallies and the lagged global reduction.
//!
//! Every worker issues one sum-reduction per generation onto the
//! [`COORDINATOR`]. A reduction is started right after the swap and
//! resolved during the following generation, so it overlaps the next
//! compute phase. At most one reduction is outstanding per worker.

use spore_comm::{CommError, Communicator, ReduceRequest};
use spore_core::{PeakTable, PopulationTally};

use crate::error::EngineError;

/// Rank that receives global tallies and owns the peak table.
pub const COORDINATOR: usize = 0;

/// A worker's two local tallies.
///
/// `accumulating` is written by the compute phase of the generation in
/// progress; `completed` belongs to the most recently swapped-in grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalTallies {
    /// Tally of the generation being computed.
    pub accumulating: PopulationTally,
    /// Tally of the current grid.
    pub completed: PopulationTally,
}

impl LocalTallies {
    /// Start with the initial grid's tally as `completed`.
    pub fn new(initial: PopulationTally) -> Self {
        Self {
            accumulating: PopulationTally::zeroed(),
            completed: initial,
        }
    }

    /// Exchange roles alongside the grid swap.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.accumulating, &mut self.completed);
    }
}

/// Drives the per-generation reductions and, on the coordinator, folds
/// the results into a [`PeakTable`] and population history.
#[derive(Debug)]
pub struct StatsAggregator {
    in_flight: Option<(u32, ReduceRequest)>,
    peaks: Option<PeakTable>,
    history: Vec<PopulationTally>,
}

impl StatsAggregator {
    /// Aggregator for worker `rank`.
    pub fn new(rank: usize) -> Self {
        Self {
            in_flight: None,
            peaks: (rank == COORDINATOR).then(PeakTable::new),
            history: Vec::new(),
        }
    }

    /// Whether this aggregator belongs to the coordinator.
    pub fn is_coordinator(&self) -> bool {
        self.peaks.is_some()
    }

    /// Generation of the outstanding reduction, if any.
    pub fn in_flight(&self) -> Option<u32> {
        self.in_flight.as_ref().map(|(g, _)| *g)
    }

    /// Start the reduction of `tally` for `generation`.
    ///
    /// The tally is copied into the request, so the caller may keep
    /// mutating its own copy. Fails with
    /// [`CommError::ReductionInFlight`] if the previous one is unresolved.
    pub fn issue(
        &mut self,
        comm: &Communicator,
        generation: u32,
        tally: &PopulationTally,
    ) -> Result<(), EngineError> {
        if self.in_flight.is_some() {
            return Err(CommError::ReductionInFlight.into());
        }
        let request = comm.ireduce_sum(COORDINATOR, tally.as_slice())?;
        self.in_flight = Some((generation, request));
        Ok(())
    }

    /// Complete the outstanding reduction, if any.
    ///
    /// On the coordinator the global tally is folded into the peak table
    /// and returned; other workers get `None`.
    pub fn resolve(
        &mut self,
        comm: &mut Communicator,
    ) -> Result<Option<(u32, PopulationTally)>, EngineError> {
        let Some((generation, request)) = self.in_flight.take() else {
            return Ok(None);
        };
        let Some(counts) = comm.wait_reduce(request)? else {
            return Ok(None);
        };
        let global = PopulationTally::from_slice(&counts).ok_or(CommError::LengthMismatch {
            expected: spore_core::SPECIES_SLOTS,
            got: counts.len(),
        })?;
        if let Some(peaks) = self.peaks.as_mut() {
            peaks.observe(generation, &global);
        }
        self.history.push(global);
        tracing::debug!(generation, live = global.live(), "global population");
        Ok(Some((generation, global)))
    }

    /// The peak table so far (coordinator only).
    pub fn peaks(&self) -> Option<&PeakTable> {
        self.peaks.as_ref()
    }

    /// Consume the aggregator, returning the peaks and history.
    pub fn into_summary(self) -> (Option<PeakTable>, Vec<PopulationTally>) {
        (self.peaks, self.history)
    }
}
