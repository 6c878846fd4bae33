//! Per-species population counts.

use std::fmt;
use std::ops::{Add, AddAssign};

use crate::species::{Species, SPECIES_SLOTS};

/// Population count per species slot.
///
/// Slot 0 counts empty cells, slots `1..=N_SPECIES` count each species.
/// Tallies are plain values: workers accumulate them locally, the
/// compute phase merges per-task tallies with `+`, and the coordinator
/// sums them across workers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PopulationTally {
    counts: [u64; SPECIES_SLOTS],
}

impl PopulationTally {
    /// A tally with every slot at zero.
    pub const fn zeroed() -> Self {
        Self {
            counts: [0; SPECIES_SLOTS],
        }
    }

    /// Build a tally from raw slot counts.
    pub const fn from_counts(counts: [u64; SPECIES_SLOTS]) -> Self {
        Self { counts }
    }

    /// Build a tally from a slice of slot counts.
    ///
    /// Returns `None` if the slice does not have exactly
    /// [`SPECIES_SLOTS`] entries.
    pub fn from_slice(counts: &[u64]) -> Option<Self> {
        let counts: [u64; SPECIES_SLOTS] = counts.try_into().ok()?;
        Some(Self { counts })
    }

    /// Count every cell in `cells`.
    ///
    /// Cells holding an out-of-range id are ignored.
    pub fn from_cells(cells: &[Species]) -> Self {
        let mut tally = Self::zeroed();
        for &cell in cells {
            tally.record(cell);
        }
        tally
    }

    /// Add one cell of the given species.
    #[inline]
    pub fn record(&mut self, species: Species) {
        if let Some(slot) = self.counts.get_mut(species as usize) {
            *slot += 1;
        }
    }

    /// Population of `species` (0 for out-of-range ids).
    pub fn get(&self, species: Species) -> u64 {
        self.counts.get(species as usize).copied().unwrap_or(0)
    }

    /// Raw slot counts, empty cells first.
    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    /// Number of live (non-empty) cells.
    pub fn live(&self) -> u64 {
        self.counts[1..].iter().sum()
    }

    /// Number of cells counted, empty cells included.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl AddAssign for PopulationTally {
    fn add_assign(&mut self, rhs: Self) {
        for (slot, other) in self.counts.iter_mut().zip(rhs.counts) {
            *slot += other;
        }
    }
}

impl Add for PopulationTally {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl std::iter::Sum for PopulationTally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zeroed(), Add::add)
    }
}

impl fmt::Debug for PopulationTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopulationTally")
            .field("empty", &self.counts[0])
            .field("species", &&self.counts[1..])
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{EMPTY, N_SPECIES};
    use proptest::prelude::*;

    #[test]
    fn record_and_query() {
        let mut t = PopulationTally::zeroed();
        t.record(EMPTY);
        t.record(3);
        t.record(3);
        assert_eq!(t.get(EMPTY), 1);
        assert_eq!(t.get(3), 2);
        assert_eq!(t.live(), 2);
        assert_eq!(t.total(), 3);
    }

    #[test]
    fn out_of_range_species_ignored() {
        let mut t = PopulationTally::zeroed();
        t.record(N_SPECIES as Species + 1);
        assert_eq!(t.total(), 0);
        assert_eq!(t.get(200), 0);
    }

    #[test]
    fn from_slice_requires_exact_len() {
        assert!(PopulationTally::from_slice(&[0; SPECIES_SLOTS]).is_some());
        assert!(PopulationTally::from_slice(&[0; SPECIES_SLOTS - 1]).is_none());
        assert!(PopulationTally::from_slice(&[0; SPECIES_SLOTS + 1]).is_none());
    }

    proptest! {
        #[test]
        fn merge_matches_counting_the_concatenation(
            a in proptest::collection::vec(0u8..=N_SPECIES as u8, 0..200),
            b in proptest::collection::vec(0u8..=N_SPECIES as u8, 0..200),
        ) {
            let merged = PopulationTally::from_cells(&a) + PopulationTally::from_cells(&b);
            let mut all = a.clone();
            all.extend_from_slice(&b);
            prop_assert_eq!(merged, PopulationTally::from_cells(&all));
            prop_assert_eq!(merged.total(), all.len() as u64);
        }
    }
}
