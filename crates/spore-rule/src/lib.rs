//! Transition rule for the Spore automaton.
//!
//! The next state of a cell depends only on the 26 cells of its
//! `3 × 3 × 3` neighbourhood in the current generation:
//!
//! - a live cell survives with its species while `5 ≤ live ≤ 13`;
//! - an empty cell is colonised by the most common neighbouring species
//!   while `7 ≤ live ≤ 10`, ties going to the lowest species id.
//!
//! [`next_state`] reads a shared [`GridBuffer`](spore_grid::GridBuffer)
//! and has no side effects, so any number of threads may evaluate
//! disjoint cells of the same buffer concurrently.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod neighbourhood;
pub mod rule;

pub use neighbourhood::Neighbourhood;
pub use rule::{decide, next_state, BIRTH, SURVIVAL};
