//! Cell representation.
//!
//! A cell holds nothing but a species identifier. `0` is the empty cell;
//! `1..=N_SPECIES` name one of the competing species.

/// Species identifier stored in every grid cell.
pub type Species = u8;

/// The empty (dead) cell.
pub const EMPTY: Species = 0;

/// Number of live species. Species ids run `1..=N_SPECIES`.
pub const N_SPECIES: usize = 9;

/// Number of tally slots: one per species plus slot 0 for empty cells.
pub const SPECIES_SLOTS: usize = N_SPECIES + 1;

/// Iterate over the live species ids in ascending order.
pub fn live_species() -> impl Iterator<Item = Species> + Clone {
    1..=N_SPECIES as Species
}

/// Whether `cell` holds a valid species id (empty included).
pub fn is_valid(cell: Species) -> bool {
    (cell as usize) < SPECIES_SLOTS
}
