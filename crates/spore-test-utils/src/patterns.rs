//! Hand-placed initial grids.

use spore_core::{Species, EMPTY, N_SPECIES};
use spore_grid::Pattern;

/// A cube of `species` with corner `origin` and the given edge length.
/// Coordinates past the grid edge are not wrapped.
pub fn cube(
    species: Species,
    origin: (usize, usize, usize),
    edge: usize,
) -> Pattern<impl Fn(usize, usize, usize) -> Species + Sync + Copy> {
    let (ox, oy, oz) = origin;
    Pattern(move |x: usize, y: usize, z: usize| -> Species {
        let inside = (ox..ox + edge).contains(&x)
            && (oy..oy + edge).contains(&y)
            && (oz..oz + edge).contains(&z);
        if inside {
            species
        } else {
            EMPTY
        }
    })
}

/// Every cell of global layer `at` holds `species`.
pub fn layer(at: usize, species: Species) -> Pattern<impl Fn(usize, usize, usize) -> Species + Sync + Copy> {
    Pattern(move |x: usize, _y: usize, _z: usize| -> Species {
        if x == at {
            species
        } else {
            EMPTY
        }
    })
}

/// Deterministic mix of all species with roughly half the cells empty.
pub fn scatter() -> Pattern<impl Fn(usize, usize, usize) -> Species + Sync + Copy> {
    Pattern(|x: usize, y: usize, z: usize| -> Species {
        let h = (x * 73_856_093) ^ (y * 19_349_663) ^ (z * 83_492_791);
        if h % 2 == 0 {
            EMPTY
        } else {
            (h / 2 % N_SPECIES) as Species + 1
        }
    })
}
