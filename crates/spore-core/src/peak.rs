//! Historical peak populations.
//!
//! [`PeakTable`] remembers, for every species, the highest global
//! population observed so far and the generation at which it was first
//! reached. Only the coordinator owns one.

use std::fmt;

use crate::species::{live_species, Species, SPECIES_SLOTS};
use crate::tally::PopulationTally;

/// Peak population of one species.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeakEntry {
    /// Highest population observed.
    pub population: u64,
    /// Generation at which `population` was first observed.
    pub generation: u32,
}

/// Running per-species maxima across generations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeakTable {
    entries: [PeakEntry; SPECIES_SLOTS],
}

impl PeakTable {
    /// An empty table: every peak is 0 at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the global population of `generation` into the table.
    ///
    /// A species' peak moves only if the new population is strictly
    /// greater, so ties keep the earlier generation. Callers must observe
    /// generations in increasing order.
    pub fn observe(&mut self, generation: u32, population: &PopulationTally) {
        for (slot, entry) in self.entries.iter_mut().enumerate() {
            let value = population.as_slice()[slot];
            if value > entry.population {
                entry.population = value;
                entry.generation = generation;
            }
        }
    }

    /// Peak entry for `species`.
    ///
    /// # Panics
    ///
    /// Panics if `species` is not a valid id.
    pub fn get(&self, species: Species) -> PeakEntry {
        self.entries[species as usize]
    }

    /// Live species with their peak, in ascending species order.
    pub fn iter(&self) -> impl Iterator<Item = (Species, PeakEntry)> + '_ {
        live_species().map(move |s| (s, self.entries[s as usize]))
    }
}

/// One line per live species: `<species> <population> <generation>`.
impl fmt::Display for PeakTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (species, entry) in self.iter() {
            writeln!(f, "{species} {} {}", entry.population, entry.generation)?;
        }
        Ok(())
    }
}
