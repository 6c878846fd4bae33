//! Benchmark profiles for the Spore automaton.
//!
//! - [`reference_profile`]: 32³ grid at 30% density on one worker
//! - [`stress_profile`]: 96³ grid split across four workers
//! - [`wrapped_pair`]: a single-slab grid with halos already filled, for
//!   timing the compute phase without any messaging

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use spore_engine::SimConfig;
use spore_grid::{GridPair, Halo, Partition, RandomFill, SlabGenerator};

/// 32³ cells, 10 generations, one worker.
pub fn reference_profile(seed: u64) -> SimConfig {
    SimConfig::new(10, 32, 0.3, seed)
}

/// 96³ cells, 10 generations, four workers.
pub fn stress_profile(seed: u64) -> SimConfig {
    SimConfig::new(10, 96, 0.3, seed).with_workers(4)
}

/// A whole `side³` torus as one slab, halos wrapped by hand.
///
/// # Panics
///
/// Panics if `side` is zero or `density` is outside `[0, 1]`.
pub fn wrapped_pair(side: usize, density: f32, seed: u64) -> GridPair {
    let slab = Partition::new(side, 1)
        .and_then(|p| p.slab(0).ok_or(spore_grid::GridError::EmptyDimension { name: "side" }))
        .expect("valid side");
    let mut grid = RandomFill::new(density, seed)
        .and_then(|g| g.generate(side, slab))
        .expect("valid generator");
    let first = grid.first_interior().to_vec();
    let last = grid.last_interior().to_vec();
    grid.fill_halo(Halo::Leading, &last).expect("layer length");
    grid.fill_halo(Halo::Trailing, &first).expect("layer length");
    GridPair::new(grid)
}
