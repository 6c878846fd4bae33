//! Run orchestration: spawn workers, join them, build the report.
//!
//! Each configured worker is an OS thread holding one endpoint of a
//! [`Universe`]. Workers past `min(P, N)` drop out of the group right
//! after it is built and never touch a grid.

use std::thread;
use std::time::Instant;

use spore_comm::{AbortSignal, CommError, Communicator, Universe};
use spore_grid::{Partition, RandomFill, SlabGenerator};

use crate::config::SimConfig;
use crate::error::EngineError;
use crate::report::RunReport;
use crate::stats::COORDINATOR;
use crate::worker::{WorkerContext, WorkerOutcome};

/// Raises the abort signal if the owning thread unwinds.
struct AbortOnPanic(AbortSignal);

impl Drop for AbortOnPanic {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.raise();
        }
    }
}

/// A validated simulation, ready to run.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    partition: Partition,
    collect_final_grid: bool,
}

impl Simulation {
    /// Validate `config` and plan the decomposition.
    pub fn new(config: SimConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let partition = Partition::new(config.side, config.workers)?;
        Ok(Self {
            config,
            partition,
            collect_final_grid: false,
        })
    }

    /// Also return the assembled final grid in the report.
    pub fn collect_final_grid(mut self, collect: bool) -> Self {
        self.collect_final_grid = collect;
        self
    }

    /// The validated configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The layer decomposition.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Run with the random initial grid described by the configuration.
    pub fn run(&self) -> Result<RunReport, EngineError> {
        let generator = RandomFill::new(self.config.density, self.config.seed)?;
        self.run_with(&generator)
    }

    /// Run with a caller-supplied initial grid.
    pub fn run_with<G: SlabGenerator>(&self, generator: &G) -> Result<RunReport, EngineError> {
        let workers = self.config.workers;
        let active = self.partition.active();
        let threads = self.config.resolved_threads();
        tracing::info!(
            generations = self.config.generations,
            side = self.config.side,
            density = self.config.density,
            seed = self.config.seed,
            workers,
            active,
            threads,
            "starting run"
        );
        if active < workers {
            tracing::debug!(excluded = workers - active, "more workers than layers");
        }

        let universe = Universe::new(workers)?;
        let abort = universe.abort_signal();
        let started = Instant::now();

        let results: Vec<WorkerResult> = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for comm in universe.into_endpoints() {
                let rank = comm.rank();
                let worker_abort = abort.clone();
                let spawned = thread::Builder::new()
                    .name(format!("spore-worker-{rank}"))
                    .spawn_scoped(scope, move || {
                        let _guard = AbortOnPanic(worker_abort.clone());
                        let result = self.worker_main(comm, generator, threads);
                        if let Err(e) = &result {
                            if !e.is_secondary() {
                                tracing::error!(rank, error = %e, "worker failed");
                            }
                            worker_abort.raise();
                        }
                        result
                    });
                match spawned {
                    Ok(handle) => handles.push((rank, handle)),
                    Err(e) => {
                        abort.raise();
                        tracing::error!(rank, error = %e, "worker spawn failed");
                        let mut results = join_all(handles);
                        results.push(Err(EngineError::SpawnFailed {
                            rank,
                            reason: e.to_string(),
                        }));
                        return results;
                    }
                }
            }
            join_all(handles)
        });

        let wall = started.elapsed();
        let outcomes = first_error(results)?;
        let report = self.assemble(outcomes, wall)?;
        tracing::info!(
            elapsed = ?report.elapsed,
            max_live = report.max_live(),
            "run finished"
        );
        Ok(report)
    }

    fn worker_main<G: SlabGenerator>(
        &self,
        comm: Communicator,
        generator: &G,
        threads: usize,
    ) -> WorkerResult {
        let Some(comm) = comm.include_first(self.partition.active()) else {
            tracing::debug!("excluded from active group");
            return Ok(None);
        };
        let rank = comm.rank();
        let slab = self.partition.slab(rank).ok_or(CommError::RankOutOfRange {
            rank,
            size: self.partition.active(),
        })?;
        let grid = generator.generate(self.config.side, slab)?;
        grid.check_species()?;
        WorkerContext::new(comm, slab, grid, self.config.generations, threads)?
            .run()
            .map(Some)
    }

    fn assemble(
        &self,
        mut outcomes: Vec<WorkerOutcome>,
        wall: std::time::Duration,
    ) -> Result<RunReport, EngineError> {
        outcomes.sort_by_key(|o| o.rank);
        let final_grid = self.collect_final_grid.then(|| {
            outcomes
                .iter()
                .flat_map(|o| o.final_grid.interior().iter().copied())
                .collect()
        });
        let coordinator = outcomes
            .iter_mut()
            .find(|o| o.rank == COORDINATOR)
            .ok_or(EngineError::MissingCoordinator)?;
        let peaks = coordinator
            .peaks
            .take()
            .ok_or(EngineError::MissingCoordinator)?;
        tracing::debug!(wall = ?wall, "workers joined");
        Ok(RunReport {
            peaks,
            history: std::mem::take(&mut coordinator.history),
            elapsed: coordinator.elapsed,
            metrics: coordinator.metrics.clone(),
            active_workers: self.partition.active(),
            workers: self.config.workers,
            final_grid,
        })
    }
}

type WorkerResult = Result<Option<WorkerOutcome>, EngineError>;

/// Join every started worker, in rank order.
fn join_all(handles: Vec<(usize, thread::ScopedJoinHandle<'_, WorkerResult>)>) -> Vec<WorkerResult> {
    handles
        .into_iter()
        .map(|(rank, h)| h.join().unwrap_or(Err(EngineError::WorkerPanicked { rank })))
        .collect()
}

/// Collect active outcomes, or return the root cause of a failed run.
///
/// Workers that stopped only because the run was aborted are ignored in
/// favour of the worker that caused the abort.
fn first_error(results: Vec<WorkerResult>) -> Result<Vec<WorkerOutcome>, EngineError> {
    let mut outcomes = Vec::with_capacity(results.len());
    let mut secondary = None;
    let mut primary = None;
    for result in results {
        match result {
            Ok(Some(o)) => outcomes.push(o),
            Ok(None) => {}
            Err(e) if e.is_secondary() => {
                secondary.get_or_insert(e);
            }
            Err(e) => {
                primary.get_or_insert(e);
            }
        }
    }
    match primary.or(secondary) {
        Some(e) => Err(e),
        None => Ok(outcomes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use spore_core::Species;
    use spore_grid::{GridBuffer, GridError, Pattern, Slab};

    #[test]
    fn invalid_config_rejected_before_spawn() {
        let err = Simulation::new(SimConfig::new(0, 5, 0.5, 1)).unwrap_err();
        assert_eq!(err, EngineError::Config(ConfigError::ZeroGenerations));
    }

    #[test]
    fn single_worker_run_reports_all_states() {
        let report = Simulation::new(SimConfig::new(3, 5, 0.3, 9).with_threads(1))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(report.generations(), 3);
        assert_eq!(report.active_workers, 1);
        assert!(report.final_grid.is_none());
    }

    #[test]
    fn excluded_workers_do_not_participate() {
        let report = Simulation::new(SimConfig::new(2, 3, 0.5, 4).with_workers(7).with_threads(1))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(report.active_workers, 3);
        assert_eq!(report.workers, 7);
        for t in &report.history {
            assert_eq!(t.total(), 27);
        }
    }

    struct FailsOn(usize);

    impl SlabGenerator for FailsOn {
        fn generate(&self, side: usize, slab: Slab) -> Result<GridBuffer, GridError> {
            if slab.rank == self.0 {
                return Err(GridError::InvalidGenerator {
                    reason: "boom".into(),
                });
            }
            GridBuffer::new(slab.depth(), side)
        }
    }

    #[test]
    fn one_failing_worker_fails_the_run_with_its_error() {
        let sim = Simulation::new(SimConfig::new(5, 6, 0.0, 0).with_workers(3).with_threads(1))
            .unwrap();
        let err = sim.run_with(&FailsOn(1)).unwrap_err();
        assert_eq!(
            err,
            EngineError::Grid(GridError::InvalidGenerator {
                reason: "boom".into()
            })
        );
    }

    #[test]
    fn generator_output_outside_species_range_is_rejected() {
        let sim = Simulation::new(SimConfig::new(2, 4, 0.0, 0).with_workers(2).with_threads(1))
            .unwrap();
        let bad = Pattern(|x: usize, y: usize, z: usize| -> Species {
            if (x, y, z) == (3, 2, 1) {
                10
            } else {
                1
            }
        });
        assert_eq!(
            sim.run_with(&bad).unwrap_err(),
            EngineError::Grid(GridError::InvalidSpecies {
                layer: 2,
                row: 2,
                col: 1,
                value: 10,
            })
        );

        let flooded = Pattern(|_: usize, _: usize, _: usize| -> Species { 10 });
        assert!(matches!(
            sim.run_with(&flooded),
            Err(EngineError::Grid(GridError::InvalidSpecies { value: 10, .. }))
        ));
    }

    #[test]
    fn final_grid_collected_when_asked() {
        let sim = Simulation::new(SimConfig::new(1, 4, 0.5, 2).with_workers(2).with_threads(1))
            .unwrap()
            .collect_final_grid(true);
        let report = sim.run().unwrap();
        let grid = report.final_grid.unwrap();
        assert_eq!(grid.len(), 64);
        assert_eq!(
            spore_core::PopulationTally::from_cells(&grid),
            *report.history.last().unwrap()
        );
    }
}
