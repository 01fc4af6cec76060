//! Shared fixtures for the housing benchmarks.

use housing_core::error::Result;
use housing_core::{Biome, Placement};

/// Every NPC housed: two to three residents per village across all biomes,
/// the solitary NPC in its home.
///
/// # Errors
///
/// Only if the fixture breaks a placement invariant.
pub fn full_town() -> Result<Placement> {
    use housing_core::NpcName::*;

    Placement::from_villages([
        (Biome::Forest, vec![vec![Guide, Merchant, Nurse], vec![Golfer, Zoologist, Painter]]),
        (Biome::Desert, vec![vec![ArmsDealer, DyeTrader, Demolitionist]]),
        (Biome::Cavern, vec![vec![Mechanic, GoblinTinkerer, Clothier]]),
        (Biome::Hallow, vec![vec![PartyGirl, Wizard, Princess]]),
        (Biome::Jungle, vec![vec![WitchDoctor, Dryad]]),
        (Biome::Snow, vec![vec![SantaClaus, Cyborg, Steampunker]]),
        (Biome::GlowingMushroom, vec![vec![Truffle, Stylist, TaxCollector]]),
        (Biome::Ocean, vec![vec![Angler, Pirate, Tavernkeep]]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_town_houses_everyone() {
        let town = full_town().expect("valid");
        assert_eq!(town.housed_count(), housing_core::NpcName::ALL.len());
    }
}
