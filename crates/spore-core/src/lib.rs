//! Core types for the Spore simulation workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! cell representation, per-species population tallies, and the peak table
//! that the coordinator maintains across generations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod peak;
pub mod species;
pub mod tally;

pub use peak::{PeakEntry, PeakTable};
pub use species::{is_valid, live_species, Species, EMPTY, N_SPECIES, SPECIES_SLOTS};
pub use tally::PopulationTally;
