//! Survival and birth thresholds.

use std::ops::RangeInclusive;

use spore_core::{Species, EMPTY};
use spore_grid::GridBuffer;

use crate::neighbourhood::Neighbourhood;

/// Live-neighbour counts under which a live cell survives.
pub const SURVIVAL: RangeInclusive<u8> = 5..=13;

/// Live-neighbour counts under which an empty cell is colonised.
pub const BIRTH: RangeInclusive<u8> = 7..=10;

/// Apply the rule to a cell in state `current` with census `around`.
pub fn decide(current: Species, around: &Neighbourhood) -> Species {
    let live = around.live();
    if current != EMPTY {
        if SURVIVAL.contains(&live) {
            current
        } else {
            EMPTY
        }
    } else if BIRTH.contains(&live) {
        around.most_common()
    } else {
        EMPTY
    }
}

/// Next state of cell `(x, y, z)` of `grid`.
///
/// `x` is an interior layer index of the buffer. Pure: repeated calls
/// with the same buffer return the same species.
#[inline]
pub fn next_state(grid: &GridBuffer, x: usize, y: usize, z: usize) -> Species {
    decide(grid.get(x, y, z), &Neighbourhood::gather(grid, x, y, z))
}
