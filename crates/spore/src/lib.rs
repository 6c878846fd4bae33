//! Spore: a distributed, multi-species 3D cellular automaton.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Spore sub-crates. For most users, adding `spore` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use spore::prelude::*;
//!
//! // 4 generations on a 6×6×6 torus split across 3 workers.
//! let config = SimConfig::new(4, 6, 0.3, 42).with_workers(3).with_threads(1);
//! let report = Simulation::new(config).unwrap().run().unwrap();
//!
//! assert_eq!(report.history.len(), 5);
//! for (species, peak) in report.peaks.iter() {
//!     assert!(peak.population <= 216, "species {species}");
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `spore-core` | Species ids, tallies, peak table |
//! | [`grid`] | `spore-grid` | Halo-padded buffers, decomposition, generators |
//! | [`rule`] | `spore-rule` | Neighbourhood census and transition rule |
//! | [`comm`] | `spore-comm` | Worker endpoints, transfers, reduction |
//! | [`engine`] | `spore-engine` | Configuration, workers, run orchestration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Species ids, population tallies, and the peak table (`spore-core`).
pub use spore_core as types;

/// Grid buffers and domain decomposition (`spore-grid`).
///
/// [`grid::Partition`] splits the layer axis across workers;
/// [`grid::SlabGenerator`] is the extension point for initial grids.
pub use spore_grid as grid;

/// The transition rule (`spore-rule`).
pub use spore_rule as rule;

/// Message passing between workers (`spore-comm`).
pub use spore_comm as comm;

/// Run orchestration (`spore-engine`).
///
/// [`engine::Simulation`] validates a [`engine::SimConfig`], spawns the
/// workers, and returns a [`engine::RunReport`].
pub use spore_engine as engine;

/// Common imports for typical Spore usage.
///
/// ```rust
/// use spore::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use spore_core::{PeakEntry, PeakTable, PopulationTally, Species, EMPTY, N_SPECIES};

    // Grid
    pub use spore_grid::{GridBuffer, Partition, Pattern, RandomFill, SlabGenerator};

    // Engine
    pub use spore_engine::{ConfigError, EngineError, RunMetrics, RunReport, SimConfig, Simulation};
}
