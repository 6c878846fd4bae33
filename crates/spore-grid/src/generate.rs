//! Initial slab generation.
//!
//! A [`SlabGenerator`] produces the starting contents of one worker's
//! slab. The engine relies only on the shape contract: the returned
//! buffer has `slab.depth()` interior layers of `side × side` cells.
//!
//! [`RandomFill`] seeds a ChaCha8 stream per *global* layer, so the
//! initial grid is identical no matter how it is decomposed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spore_core::{Species, N_SPECIES};

use crate::buffer::GridBuffer;
use crate::error::GridError;
use crate::partition::Slab;

/// Produces the initial contents of a worker's slab.
pub trait SlabGenerator: Sync {
    /// Build the buffer for `slab` of a grid with side `side`.
    ///
    /// Halo layers may hold anything; the engine overwrites them
    /// before they are read.
    fn generate(&self, side: usize, slab: Slab) -> Result<GridBuffer, GridError>;
}

fn check_slab(side: usize, slab: Slab) -> Result<(), GridError> {
    if slab.start > slab.end || slab.end >= side {
        return Err(GridError::SlabOutOfRange {
            start: slab.start,
            end: slab.end,
            side,
        });
    }
    Ok(())
}

/// Uniform random population at a given density.
///
/// Each cell is alive with probability `density`; live cells draw their
/// species uniformly from `1..=N_SPECIES`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomFill {
    density: f32,
    seed: u64,
}

impl RandomFill {
    /// Create a generator.
    ///
    /// Returns `Err(GridError::InvalidGenerator)` unless `density` is a
    /// finite value in `[0, 1]`.
    pub fn new(density: f32, seed: u64) -> Result<Self, GridError> {
        if !density.is_finite() || !(0.0..=1.0).contains(&density) {
            return Err(GridError::InvalidGenerator {
                reason: format!("density must be within [0, 1], got {density}"),
            });
        }
        Ok(Self { density, seed })
    }

    /// Live-cell probability.
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Base seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn fill_layer(&self, layer: usize, cells: &mut [Species]) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(layer as u64);
        for cell in cells {
            *cell = if rng.random::<f32>() < self.density {
                rng.random_range(1..=N_SPECIES as Species)
            } else {
                0
            };
        }
    }
}

impl SlabGenerator for RandomFill {
    fn generate(&self, side: usize, slab: Slab) -> Result<GridBuffer, GridError> {
        check_slab(side, slab)?;
        let mut grid = GridBuffer::new(slab.depth(), side)?;
        for (i, layer) in (slab.start..=slab.end).enumerate() {
            self.fill_layer(layer, grid.layer_mut(i + 1)?);
        }
        Ok(grid)
    }
}

/// Deterministic pattern given by a function of global `(layer, row, col)`.
///
/// Mostly useful for tests and benchmarks that need hand-placed cells.
#[derive(Clone, Copy, Debug)]
pub struct Pattern<F>(pub F);

impl<F> SlabGenerator for Pattern<F>
where
    F: Fn(usize, usize, usize) -> Species + Sync,
{
    fn generate(&self, side: usize, slab: Slab) -> Result<GridBuffer, GridError> {
        check_slab(side, slab)?;
        let mut grid = GridBuffer::new(slab.depth(), side)?;
        for layer in slab.start..=slab.end {
            let x = layer - slab.start + 1;
            for y in 0..side {
                for z in 0..side {
                    grid.set(x, y, z, (self.0)(layer, y, z));
                }
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::Partition;

    fn whole(side: usize) -> Slab {
        Slab {
            rank: 0,
            start: 0,
            end: side - 1,
        }
    }

    #[test]
    fn rejects_density_out_of_range() {
        assert!(RandomFill::new(-0.1, 1).is_err());
        assert!(RandomFill::new(1.5, 1).is_err());
        assert!(RandomFill::new(f32::NAN, 1).is_err());
        assert!(RandomFill::new(0.0, 1).is_ok());
        assert!(RandomFill::new(1.0, 1).is_ok());
    }

    #[test]
    fn zero_density_is_empty() {
        let g = RandomFill::new(0.0, 7).unwrap().generate(5, whole(5)).unwrap();
        assert_eq!(g.tally_interior().live(), 0);
    }

    #[test]
    fn full_density_fills_every_cell_with_valid_species() {
        let g = RandomFill::new(1.0, 7).unwrap().generate(4, whole(4)).unwrap();
        assert_eq!(g.tally_interior().live(), 64);
        assert!(g.interior().iter().all(|&c| (1..=N_SPECIES as u8).contains(&c)));
    }

    #[test]
    fn shape_matches_slab() {
        let slab = Slab {
            rank: 1,
            start: 2,
            end: 4,
        };
        let g = RandomFill::new(0.5, 1).unwrap().generate(6, slab).unwrap();
        assert_eq!(g.depth(), 3);
        assert_eq!(g.side(), 6);
    }

    #[test]
    fn slab_outside_grid_rejected() {
        let slab = Slab {
            rank: 0,
            start: 3,
            end: 5,
        };
        assert!(matches!(
            RandomFill::new(0.5, 1).unwrap().generate(5, slab),
            Err(GridError::SlabOutOfRange { .. })
        ));
    }

    #[test]
    fn same_seed_same_grid() {
        let gen = RandomFill::new(0.3, 99).unwrap();
        assert_eq!(
            gen.generate(6, whole(6)).unwrap(),
            gen.generate(6, whole(6)).unwrap()
        );
    }

    #[test]
    fn decomposition_does_not_change_contents() {
        let side = 9;
        let gen = RandomFill::new(0.4, 1234).unwrap();
        let full = gen.generate(side, whole(side)).unwrap();
        let partition = Partition::new(side, 4).unwrap();
        for slab in partition.slabs() {
            let part = gen.generate(side, slab).unwrap();
            for (i, layer) in (slab.start..=slab.end).enumerate() {
                assert_eq!(
                    part.layer(i + 1).unwrap(),
                    full.layer(layer + 1).unwrap(),
                );
            }
        }
    }

    #[test]
    fn pattern_places_cells_by_global_coordinate() {
        let pattern = Pattern(|x: usize, y: usize, z: usize| -> Species {
            if (x, y, z) == (3, 1, 2) {
                5
            } else {
                0
            }
        });
        let slab = Slab {
            rank: 1,
            start: 2,
            end: 3,
        };
        let g = pattern.generate(4, slab).unwrap();
        assert_eq!(g.get(2, 1, 2), 5);
        assert_eq!(g.tally_interior().live(), 1);
    }
}
