//! Distributed generation stepper for the Spore automaton.
//!
//! A run spawns one worker thread per configured worker. Workers share no
//! grid memory: each owns a [`GridPair`](spore_grid::GridPair) for its
//! slab and talks to its ring neighbours through a
//! [`Communicator`](spore_comm::Communicator). Inside a worker the compute
//! phase is fork-join over a private rayon pool; everything else
//! (halo exchange, reduction, peak bookkeeping, swap) runs on the worker
//! thread itself.
//!
//! # Generation loop (per worker)
//!
//! ```text
//! compute  ── next ← rule(current), local tally        (parallel)
//! exchange ── post halo sends/receives for next
//! reduce   ── wait previous reduction, update peaks     (coordinator)
//! barrier  ── wait all halo transfers
//! swap     ── current ↔ next, issue reduction of the new tally
//! ```
//!
//! The reduction of generation *g* overlaps the compute phase of
//! generation *g + 1*; the halo wait-all is the only per-generation
//! blocking point.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compute;
pub mod config;
pub mod error;
pub mod halo;
pub mod metrics;
pub mod report;
pub mod run;
pub mod stats;
pub mod worker;

pub use config::{ConfigError, SimConfig};
pub use error::EngineError;
pub use metrics::{GenerationMetrics, RunMetrics};
pub use report::RunReport;
pub use run::Simulation;
pub use stats::{LocalTallies, StatsAggregator, COORDINATOR};
pub use worker::{WorkerContext, WorkerOutcome};
