//! Census of the 26 cells surrounding a grid position.

use spore_core::{live_species, Species, EMPTY, SPECIES_SLOTS};
use spore_grid::GridBuffer;

/// Per-species counts over a cell's 26 neighbours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbourhood {
    counts: [u8; SPECIES_SLOTS],
}

impl Neighbourhood {
    /// Count the neighbours of `(x, y, z)` in `grid`.
    ///
    /// `x` is a buffer layer index and must be an interior layer
    /// (`1..=depth`), so that `x - 1` and `x + 1` are valid layers or
    /// halos. Rows and columns wrap modulo the side length.
    pub fn gather(grid: &GridBuffer, x: usize, y: usize, z: usize) -> Self {
        debug_assert!(
            x >= 1 && x <= grid.depth(),
            "neighbourhood of non-interior layer {x}"
        );
        let n = grid.side();
        let rows = [(y + n - 1) % n, y, (y + 1) % n];
        let cols = [(z + n - 1) % n, z, (z + 1) % n];

        let mut counts = [0u8; SPECIES_SLOTS];
        for layer in [x - 1, x, x + 1] {
            for row in rows {
                for col in cols {
                    if layer == x && row == y && col == z {
                        continue;
                    }
                    counts[grid.get(layer, row, col) as usize] += 1;
                }
            }
        }
        Self { counts }
    }

    /// Build a census from an explicit list of neighbour states.
    pub fn from_cells<I: IntoIterator<Item = Species>>(cells: I) -> Self {
        let mut counts = [0u8; SPECIES_SLOTS];
        for cell in cells {
            counts[cell as usize] += 1;
        }
        Self { counts }
    }

    /// Neighbours of `species`.
    pub fn count(&self, species: Species) -> u8 {
        self.counts[species as usize]
    }

    /// Number of live (non-empty) neighbours.
    pub fn live(&self) -> u8 {
        self.counts.iter().sum::<u8>() - self.counts[EMPTY as usize]
    }

    /// The most frequent live species, or [`EMPTY`] if there is none.
    ///
    /// Species are scanned in ascending id order and only a strictly
    /// greater count replaces the leader, so ties resolve to the lowest id.
    pub fn most_common(&self) -> Species {
        let mut best = EMPTY;
        let mut best_count = 0;
        for species in live_species() {
            let c = self.counts[species as usize];
            if c > best_count {
                best_count = c;
                best = species;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_common_prefers_lowest_on_tie() {
        let n = Neighbourhood::from_cells([4, 4, 2, 2, 7]);
        assert_eq!(n.most_common(), 2);
    }

    #[test]
    fn most_common_empty_when_no_live_neighbours() {
        let n = Neighbourhood::from_cells([0, 0, 0]);
        assert_eq!(n.most_common(), EMPTY);
        assert_eq!(n.live(), 0);
    }

    #[test]
    fn live_excludes_empty() {
        let n = Neighbourhood::from_cells([0, 0, 1, 3, 3]);
        assert_eq!(n.live(), 3);
        assert_eq!(n.count(3), 2);
    }

    #[test]
    fn gather_counts_exactly_26_cells() {
        let mut g = GridBuffer::new(3, 4).unwrap();
        for x in 0..5 {
            for y in 0..4 {
                for z in 0..4 {
                    g.set(x, y, z, 1);
                }
            }
        }
        let n = Neighbourhood::gather(&g, 2, 1, 1);
        assert_eq!(n.live(), 26);
        assert_eq!(n.count(1), 26);
    }

    #[test]
    fn gather_excludes_centre() {
        let mut g = GridBuffer::new(1, 3).unwrap();
        g.set(1, 1, 1, 5);
        let n = Neighbourhood::gather(&g, 1, 1, 1);
        assert_eq!(n.live(), 0);
    }

    #[test]
    fn gather_wraps_rows_and_columns() {
        // side 5: column 0's front neighbour is column 4.
        let mut g = GridBuffer::new(1, 5).unwrap();
        g.set(1, 0, 4, 3);
        g.set(1, 4, 0, 6);
        let n = Neighbourhood::gather(&g, 1, 0, 0);
        assert_eq!(n.count(3), 1);
        assert_eq!(n.count(6), 1);
        assert_eq!(n.live(), 2);
    }

    #[test]
    fn gather_reads_halo_layers_without_wrapping() {
        let mut g = GridBuffer::new(2, 3).unwrap();
        // Leading halo is a neighbour of interior layer 1.
        g.set(0, 1, 1, 2);
        // Trailing halo (layer 3) is not a neighbour of layer 1.
        g.set(3, 1, 1, 8);
        let n = Neighbourhood::gather(&g, 1, 1, 1);
        assert_eq!(n.count(2), 1);
        assert_eq!(n.count(8), 0);
    }
}
