//! One worker's generation loop.
//!
//! A [`WorkerContext`] owns everything a worker touches: its endpoint,
//! its slab's double buffer, its tallies, and a private rayon pool. No
//! state is shared with other workers except through the communicator.

use std::time::{Duration, Instant};

use spore_comm::Communicator;
use spore_core::{PeakTable, PopulationTally};
use spore_grid::{GridBuffer, GridPair, RingTopology, Slab};

use crate::compute;
use crate::error::EngineError;
use crate::halo;
use crate::metrics::{micros, GenerationMetrics, RunMetrics};
use crate::stats::{LocalTallies, StatsAggregator};

/// Largest side for which grids are dumped at trace level.
const RENDER_MAX_SIDE: usize = 8;

/// What a worker hands back when its loop finishes.
#[derive(Debug)]
pub struct WorkerOutcome {
    /// The worker's rank.
    pub rank: usize,
    /// Layers it owned.
    pub slab: Slab,
    /// Peak table (coordinator only).
    pub peaks: Option<PeakTable>,
    /// Global tallies per state (coordinator only).
    pub history: Vec<PopulationTally>,
    /// Local tally of the final state.
    pub final_tally: PopulationTally,
    /// Final state of the slab, halos included.
    pub final_grid: GridBuffer,
    /// Phase timings.
    pub metrics: RunMetrics,
    /// Wall time of the loop, from the first exchange to the last
    /// reduction.
    pub elapsed: Duration,
}

/// State owned by one active worker.
pub struct WorkerContext {
    comm: Communicator,
    ring: RingTopology,
    slab: Slab,
    pair: GridPair,
    tallies: LocalTallies,
    stats: StatsAggregator,
    pool: rayon::ThreadPool,
    generations: u32,
    metrics: RunMetrics,
}

impl WorkerContext {
    /// Prepare worker `comm.rank()` to run `generations` generations on
    /// `grid`, the initial contents of `slab`.
    ///
    /// `comm` must already be restricted to the active workers.
    pub fn new(
        comm: Communicator,
        slab: Slab,
        grid: GridBuffer,
        generations: u32,
        threads: usize,
    ) -> Result<Self, EngineError> {
        let rank = comm.rank();
        let ring = RingTopology::new(rank, comm.size()).ok_or(
            spore_comm::CommError::RankOutOfRange {
                rank,
                size: comm.size(),
            },
        )?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("spore-{rank}-compute-{i}"))
            .build()
            .map_err(|e| EngineError::ThreadPool {
                rank,
                reason: e.to_string(),
            })?;
        let initial = pool.install(|| compute::tally(&grid));
        Ok(Self {
            comm,
            ring,
            slab,
            pair: GridPair::new(grid),
            tallies: LocalTallies::new(initial),
            stats: StatsAggregator::new(rank),
            pool,
            generations,
            metrics: RunMetrics::default(),
        })
    }

    /// This worker's rank.
    pub fn rank(&self) -> usize {
        self.comm.rank()
    }

    /// Run every generation and return the outcome.
    pub fn run(mut self) -> Result<WorkerOutcome, EngineError> {
        let span = tracing::info_span!("worker", rank = self.comm.rank());
        let _enter = span.enter();
        tracing::debug!(
            start = self.slab.start,
            end = self.slab.end,
            prev = self.ring.prev,
            next = self.ring.next,
            shared_neighbour = self.ring.neighbours_coincide(),
            coordinator = self.stats.is_coordinator(),
            threads = self.pool.current_num_threads(),
            "slab assigned"
        );

        let started = Instant::now();
        // Generators leave halos unset; fill them before the first read.
        halo::exchange(&mut self.comm, &self.ring, self.pair.current_mut())?;
        self.trace_grid(0);
        self.stats.issue(&self.comm, 0, &self.tallies.completed)?;

        for generation in 0..self.generations {
            self.step(generation)?;
        }
        self.stats.resolve(&mut self.comm)?;
        let elapsed = started.elapsed();

        tracing::debug!(
            ?elapsed,
            live = self.tallies.completed.live(),
            unexpected = self.comm.pending_unexpected(),
            "worker finished"
        );
        let (peaks, history) = self.stats.into_summary();
        Ok(WorkerOutcome {
            rank: self.comm.rank(),
            slab: self.slab,
            peaks,
            history,
            final_tally: self.tallies.completed,
            final_grid: self.pair.into_current(),
            metrics: self.metrics,
            elapsed,
        })
    }

    /// Produce state `generation + 1` from state `generation`.
    fn step(&mut self, generation: u32) -> Result<(), EngineError> {
        let mut m = GenerationMetrics::default();

        let t = Instant::now();
        let pair = &mut self.pair;
        self.tallies.accumulating = self.pool.install(|| compute::advance(pair));
        m.compute_us = micros(t.elapsed());

        let pending = halo::post(&self.comm, &self.ring, self.pair.next())?;

        let t = Instant::now();
        self.stats.resolve(&mut self.comm)?;
        m.reduce_wait_us = micros(t.elapsed());

        let t = Instant::now();
        pending.complete(&mut self.comm, self.pair.next_mut())?;
        m.halo_wait_us = micros(t.elapsed());

        self.pair.swap();
        self.tallies.swap();
        self.stats
            .issue(&self.comm, generation + 1, &self.tallies.completed)?;

        self.metrics.record(&m);
        tracing::trace!(
            generation = generation + 1,
            local_live = self.tallies.completed.live(),
            compute_us = m.compute_us,
            reduce_wait_us = m.reduce_wait_us,
            halo_wait_us = m.halo_wait_us,
            "generation done"
        );
        self.trace_grid(generation + 1);
        Ok(())
    }

    fn trace_grid(&self, generation: u32) {
        let grid = self.pair.current();
        if grid.side() <= RENDER_MAX_SIDE && tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(generation, "slab state\n{}", grid.render_layers());
        }
    }
}

impl std::fmt::Debug for WorkerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerContext")
            .field("rank", &self.comm.rank())
            .field("slab", &self.slab)
            .field("generations", &self.generations)
            .finish()
    }
}
