//! Halo-padded 3D cell buffer.

use std::fmt::Write as _;

use spore_core::{is_valid, PopulationTally, Species, EMPTY};

use crate::error::GridError;

/// Which halo layer of a [`GridBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Halo {
    /// Layer 0: mirrors the previous ring neighbour's last interior layer.
    Leading,
    /// Layer `depth + 1`: mirrors the next ring neighbour's first interior layer.
    Trailing,
}

/// A worker's slab of the grid, addressed `[layer][row][col]`.
///
/// Holds `depth + 2` layers of `side × side` cells in one contiguous
/// allocation. Layers `1..=depth` are the interior owned by the worker;
/// layers `0` and `depth + 1` are halos filled by the exchange protocol.
/// Rows and columns are toroidal and need no padding.
///
/// Index arithmetic is checked with `debug_assert!` so halo/interior
/// mix-ups surface in debug builds without slowing release runs.
#[derive(Clone, PartialEq, Eq)]
pub struct GridBuffer {
    cells: Vec<Species>,
    depth: usize,
    side: usize,
}

impl GridBuffer {
    /// Allocate an all-empty buffer for `depth` interior layers of
    /// `side × side` cells.
    ///
    /// Returns `Err(GridError::EmptyDimension)` if either dimension is 0.
    pub fn new(depth: usize, side: usize) -> Result<Self, GridError> {
        if depth == 0 {
            return Err(GridError::EmptyDimension { name: "depth" });
        }
        if side == 0 {
            return Err(GridError::EmptyDimension { name: "side" });
        }
        Ok(Self {
            cells: vec![EMPTY; (depth + 2) * side * side],
            depth,
            side,
        })
    }

    /// Number of interior layers.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Side length of each layer.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of layers including both halos.
    pub fn layer_count(&self) -> usize {
        self.depth + 2
    }

    /// Cells per layer.
    pub fn plane(&self) -> usize {
        self.side * self.side
    }

    #[inline]
    fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(
            x < self.depth + 2,
            "layer {x} out of range ({} layers)",
            self.depth + 2
        );
        debug_assert!(y < self.side, "row {y} out of range (side {})", self.side);
        debug_assert!(z < self.side, "col {z} out of range (side {})", self.side);
        (x * self.side + y) * self.side + z
    }

    /// Cell at `(layer, row, col)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Species {
        self.cells[self.offset(x, y, z)]
    }

    /// Overwrite the cell at `(layer, row, col)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, species: Species) {
        let i = self.offset(x, y, z);
        self.cells[i] = species;
    }

    /// One layer as a flat `side * side` slice, row-major.
    pub fn layer(&self, x: usize) -> Result<&[Species], GridError> {
        let range = self.layer_range(x)?;
        Ok(&self.cells[range])
    }

    /// Mutable access to one layer.
    pub fn layer_mut(&mut self, x: usize) -> Result<&mut [Species], GridError> {
        let range = self.layer_range(x)?;
        Ok(&mut self.cells[range])
    }

    fn layer_range(&self, x: usize) -> Result<std::ops::Range<usize>, GridError> {
        if x >= self.layer_count() {
            return Err(GridError::LayerOutOfRange {
                layer: x,
                layers: self.layer_count(),
            });
        }
        let plane = self.plane();
        Ok(x * plane..(x + 1) * plane)
    }

    /// First interior layer (sent to the previous neighbour).
    pub fn first_interior(&self) -> &[Species] {
        let plane = self.plane();
        &self.cells[plane..2 * plane]
    }

    /// Last interior layer (sent to the next neighbour).
    pub fn last_interior(&self) -> &[Species] {
        let plane = self.plane();
        &self.cells[self.depth * plane..(self.depth + 1) * plane]
    }

    /// Overwrite a halo layer with a neighbour's boundary cells.
    ///
    /// Returns `Err(GridError::LayerLength)` if `cells` is not exactly one
    /// layer long.
    pub fn fill_halo(&mut self, halo: Halo, cells: &[Species]) -> Result<(), GridError> {
        if cells.len() != self.plane() {
            return Err(GridError::LayerLength {
                expected: self.plane(),
                got: cells.len(),
            });
        }
        let x = match halo {
            Halo::Leading => 0,
            Halo::Trailing => self.depth + 1,
        };
        self.layer_mut(x)?.copy_from_slice(cells);
        Ok(())
    }

    /// The interior layers as one flat slice.
    pub fn interior(&self) -> &[Species] {
        let plane = self.plane();
        &self.cells[plane..(self.depth + 1) * plane]
    }

    /// Mutable view of the interior layers, halos excluded.
    ///
    /// Rows are `side` cells long and laid out layer by layer, so
    /// splitting this slice into `side`-sized chunks yields disjoint rows
    /// that can be written concurrently.
    pub fn interior_mut(&mut self) -> &mut [Species] {
        let plane = self.plane();
        let end = (self.depth + 1) * plane;
        &mut self.cells[plane..end]
    }

    /// Check that every interior cell is empty or a live species.
    ///
    /// Returns the first offending cell as `Err(GridError::InvalidSpecies)`.
    pub fn check_species(&self) -> Result<(), GridError> {
        match self.interior().iter().position(|&c| !is_valid(c)) {
            None => Ok(()),
            Some(i) => {
                let plane = self.plane();
                Err(GridError::InvalidSpecies {
                    layer: i / plane + 1,
                    row: i % plane / self.side,
                    col: i % self.side,
                    value: self.interior()[i],
                })
            }
        }
    }

    /// Population of the interior layers.
    pub fn tally_interior(&self) -> PopulationTally {
        PopulationTally::from_cells(self.interior())
    }

    /// Human-readable dump of every layer, halos included.
    ///
    /// Live cells print their species id; empty cells print blank.
    pub fn render_layers(&self) -> String {
        let mut out = String::new();
        for x in 0..self.layer_count() {
            let _ = writeln!(out, "Layer {x}:");
            for y in 0..self.side {
                for z in 0..self.side {
                    match self.get(x, y, z) {
                        EMPTY => out.push_str("  "),
                        s => {
                            let _ = write!(out, "{s} ");
                        }
                    }
                }
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Debug for GridBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridBuffer")
            .field("depth", &self.depth)
            .field("side", &self.side)
            .field("live", &self.tally_interior().live())
            .finish()
    }
}
