//! Grid storage and domain decomposition for Spore simulations.
//!
//! A worker owns one contiguous slab of layers of the global `N × N × N`
//! torus. The slab is stored in a [`GridBuffer`] padded with one halo
//! layer on each side of the decomposition axis; two buffers form a
//! [`GridPair`] that is ping-ponged every generation.
//!
//! ```text
//! layer 0           ← halo: last interior layer of the previous worker
//! layers 1..=depth  ← interior: owned by this worker
//! layer depth + 1   ← halo: first interior layer of the next worker
//! ```
//!
//! [`Partition`] decides which worker owns which layers and how active
//! workers are arranged in a ring. [`SlabGenerator`] fills a fresh slab
//! with the initial population.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod error;
pub mod generate;
pub mod pair;
pub mod partition;

pub use buffer::{GridBuffer, Halo};
pub use error::GridError;
pub use generate::{Pattern, RandomFill, SlabGenerator};
pub use pair::GridPair;
pub use partition::{Partition, RingTopology, Slab};
