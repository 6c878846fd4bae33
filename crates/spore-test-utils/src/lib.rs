//! Test utilities for Spore development.
//!
//! Provides a [`SerialReference`] simulator that steps the whole torus on
//! one thread with no decomposition, halos, or messaging, plus a few
//! hand-placed [`patterns`] for engine and benchmark tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod patterns;

use spore_core::{PeakTable, PopulationTally, Species};
use spore_grid::{GridError, SlabGenerator, Slab};
use spore_rule::{decide, Neighbourhood};

/// Whole-grid simulator wrapping in all three axes.
///
/// Ground truth for the distributed engine: same rule, same peak
/// bookkeeping, no partitioning.
#[derive(Clone, Debug, PartialEq)]
pub struct SerialReference {
    side: usize,
    cells: Vec<Species>,
}

impl SerialReference {
    /// Build the initial state from `generator` as a single slab.
    pub fn from_generator<G: SlabGenerator>(side: usize, generator: &G) -> Result<Self, GridError> {
        let slab = Slab {
            rank: 0,
            start: 0,
            end: side - 1,
        };
        let grid = generator.generate(side, slab)?;
        Ok(Self {
            side,
            cells: grid.interior().to_vec(),
        })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Cells in layer-major order.
    pub fn cells(&self) -> &[Species] {
        &self.cells
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Species {
        self.cells[(x * self.side + y) * self.side + z]
    }

    pub fn tally(&self) -> PopulationTally {
        PopulationTally::from_cells(&self.cells)
    }

    fn census(&self, x: usize, y: usize, z: usize) -> Neighbourhood {
        let n = self.side;
        let wrap = |v: usize, d: isize| (v as isize + d).rem_euclid(n as isize) as usize;
        let mut around = Vec::with_capacity(26);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if (dx, dy, dz) != (0, 0, 0) {
                        around.push(self.get(wrap(x, dx), wrap(y, dy), wrap(z, dz)));
                    }
                }
            }
        }
        Neighbourhood::from_cells(around)
    }

    /// Advance one generation.
    pub fn step(&mut self) {
        let n = self.side;
        let mut next = vec![0; self.cells.len()];
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    next[(x * n + y) * n + z] = decide(self.get(x, y, z), &self.census(x, y, z));
                }
            }
        }
        self.cells = next;
    }

    /// Run `generations` steps, returning the peaks and the population of
    /// every state `0..=generations`.
    pub fn run(&mut self, generations: u32) -> (PeakTable, Vec<PopulationTally>) {
        let mut peaks = PeakTable::new();
        let mut history = Vec::with_capacity(generations as usize + 1);
        for generation in 0..=generations {
            if generation > 0 {
                self.step();
            }
            let tally = self.tally();
            peaks.observe(generation, &tally);
            history.push(tally);
        }
        (peaks, history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spore_grid::RandomFill;

    #[test]
    fn reference_conserves_cell_count() {
        let gen = RandomFill::new(0.4, 5).unwrap();
        let mut r = SerialReference::from_generator(5, &gen).unwrap();
        let (_, history) = r.run(3);
        assert_eq!(history.len(), 4);
        assert!(history.iter().all(|t| t.total() == 125));
    }

    #[test]
    fn wraps_on_layer_axis_too() {
        // A full layer at x = 0 has neighbours at x = N-1.
        let mut r = SerialReference::from_generator(4, &patterns::layer(0, 2)).unwrap();
        assert_eq!(r.census(3, 0, 0).count(2), 9);
        r.step();
    }
}
