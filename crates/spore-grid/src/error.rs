//! Grid-specific error types.

use std::error::Error;
use std::fmt;

use spore_core::Species;

/// Errors arising from grid construction or layer access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Side length or slab depth is zero.
    EmptyDimension {
        /// Which dimension was empty.
        name: &'static str,
    },
    /// A layer index outside `0..depth + 2`.
    LayerOutOfRange {
        /// The offending layer index.
        layer: usize,
        /// Number of layers in the buffer, halos included.
        layers: usize,
    },
    /// A layer payload does not hold exactly `side * side` cells.
    LayerLength {
        /// Cells expected.
        expected: usize,
        /// Cells supplied.
        got: usize,
    },
    /// A cell holds a value outside `0..=N_SPECIES`.
    InvalidSpecies {
        /// Interior layer of the cell (1-based).
        layer: usize,
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
        /// The value found.
        value: Species,
    },
    /// A slab does not fit inside the global grid.
    SlabOutOfRange {
        /// First layer of the slab.
        start: usize,
        /// Last layer of the slab (inclusive).
        end: usize,
        /// Global side length.
        side: usize,
    },
    /// A generator setting is outside its valid range.
    InvalidGenerator {
        /// Description of the invalid setting.
        reason: String,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDimension { name } => write!(f, "grid dimension '{name}' must be non-zero"),
            Self::LayerOutOfRange { layer, layers } => {
                write!(f, "layer {layer} out of range (buffer has {layers} layers)")
            }
            Self::LayerLength { expected, got } => {
                write!(f, "layer holds {got} cells, expected {expected}")
            }
            Self::InvalidSpecies {
                layer,
                row,
                col,
                value,
            } => write!(
                f,
                "cell ({layer}, {row}, {col}) holds {value}, not a species id"
            ),
            Self::SlabOutOfRange { start, end, side } => {
                write!(f, "slab [{start}, {end}] does not fit a grid of side {side}")
            }
            Self::InvalidGenerator { reason } => write!(f, "invalid generator: {reason}"),
        }
    }
}

impl Error for GridError {}
