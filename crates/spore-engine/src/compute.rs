//! Compute phase: apply the rule to every interior cell.
//!
//! Work is split by row. Each row of the next buffer is a disjoint
//! `side`-long chunk of the interior, so rayon tasks write without
//! synchronisation and only the per-task tallies are merged.

use rayon::prelude::*;
use spore_core::PopulationTally;
use spore_grid::{GridBuffer, GridPair};
use spore_rule::next_state;

/// Write the next generation into `pair.next()` and return its
/// population.
///
/// Reads only `pair.current()`, whose halo layers must already hold the
/// neighbours' boundary layers. Runs on the ambient rayon pool; call
/// it inside [`rayon::ThreadPool::install`] to pin it to a worker's pool.
pub fn advance(pair: &mut GridPair) -> PopulationTally {
    let (current, next) = pair.split();
    let side = current.side();
    next.interior_mut()
        .par_chunks_mut(side)
        .enumerate()
        .map(|(row, cells)| {
            let x = row / side + 1;
            let y = row % side;
            let mut tally = PopulationTally::zeroed();
            for (z, cell) in cells.iter_mut().enumerate() {
                let species = next_state(current, x, y, z);
                *cell = species;
                tally.record(species);
            }
            tally
        })
        .reduce(PopulationTally::zeroed, |a, b| a + b)
}

/// Population of the interior of `grid`, counted in parallel.
pub fn tally(grid: &GridBuffer) -> PopulationTally {
    grid.interior()
        .par_chunks(grid.side().max(1))
        .map(PopulationTally::from_cells)
        .sum()
}
