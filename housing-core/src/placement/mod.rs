//! Placement mapping: who lives where.
//!
//! Every biome owns an ordered, never-empty list of villages, and every
//! village is an ordered list of residents. An NPC lives in at most one
//! village across the whole mapping. Villages have no identity beyond their
//! index, which shifts when an earlier village is pruned.
//!
//! Serialized form (the persisted snapshot):
//!
//! ```json
//! { "Forest": [["Guide", "Merchant"], ["Golfer"]], "Desert": [[]], ... }
//! ```

pub mod lookup;
pub mod store;

pub use lookup::locate;
pub use store::MoveOutcome;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{HousingError, Result};
use crate::types::{Biome, Location, NpcName};

/// An ordered list of residents sharing a village.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Village(Vec<NpcName>);

impl Village {
    /// An empty village.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Residents in insertion order.
    #[must_use]
    pub fn residents(&self) -> &[NpcName] {
        &self.0
    }

    /// Whether `npc` lives here.
    #[must_use]
    pub fn contains(&self, npc: NpcName) -> bool {
        self.0.contains(&npc)
    }

    /// Number of residents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nobody lives here.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add `npc` unless already present. Returns `true` if it was added.
    pub(crate) fn insert(&mut self, npc: NpcName) -> bool {
        if self.contains(npc) {
            return false;
        }
        self.0.push(npc);
        true
    }

    /// Remove `npc`. Returns `true` if it was present.
    pub(crate) fn evict(&mut self, npc: NpcName) -> bool {
        let before = self.0.len();
        self.0.retain(|&resident| resident != npc);
        self.0.len() != before
    }
}

impl From<Vec<NpcName>> for Village {
    fn from(residents: Vec<NpcName>) -> Self {
        Self(residents)
    }
}

/// The biome → villages → residents mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placement {
    biomes: BTreeMap<Biome, Vec<Village>>,
}

impl Placement {
    /// The default state: every biome holds exactly one empty village.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            biomes: Biome::ALL.iter().map(|&b| (b, vec![Village::new()])).collect(),
        }
    }

    /// Build a placement from explicit village lists, checking invariants.
    /// Biomes missing from `biomes` get one empty village.
    ///
    /// # Errors
    ///
    /// Returns [`HousingError::Corrupted`] if an NPC appears twice or a
    /// biome is given an empty village list.
    pub fn from_villages<I>(biomes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Biome, Vec<Vec<NpcName>>)>,
    {
        let mut placement = Self::empty();
        for (biome, villages) in biomes {
            placement
                .biomes
                .insert(biome, villages.into_iter().map(Village::from).collect());
        }
        placement.check_invariants()?;
        Ok(placement)
    }

    /// Villages of `biome`, in index order.
    #[must_use]
    pub fn villages(&self, biome: Biome) -> &[Village] {
        self.biomes
            .get(&biome)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The village at `location`, if it exists.
    #[must_use]
    pub fn village(&self, location: Location) -> Option<&Village> {
        self.villages(location.biome).get(location.village)
    }

    /// Every housed NPC with its location, in biome then village order.
    pub fn residents(&self) -> impl Iterator<Item = (NpcName, Location)> + '_ {
        self.biomes.iter().flat_map(|(&biome, villages)| {
            villages.iter().enumerate().flat_map(move |(index, village)| {
                village
                    .residents()
                    .iter()
                    .map(move |&npc| (npc, Location::new(biome, index)))
            })
        })
    }

    /// Number of housed NPCs.
    #[must_use]
    pub fn housed_count(&self) -> usize {
        self.biomes.values().flatten().map(Village::len).sum()
    }

    /// Verify the structural invariants: every biome present with at least
    /// one village, and no NPC living in two places.
    ///
    /// # Errors
    ///
    /// Returns [`HousingError::Corrupted`] describing the first violation.
    pub fn check_invariants(&self) -> Result<()> {
        for biome in Biome::ALL {
            match self.biomes.get(&biome) {
                None => {
                    return Err(HousingError::Corrupted(format!("{biome} is missing")));
                }
                Some(villages) if villages.is_empty() => {
                    return Err(HousingError::Corrupted(format!("{biome} has no villages")));
                }
                Some(_) => {}
            }
        }

        let mut seen: BTreeMap<NpcName, Location> = BTreeMap::new();
        for (npc, location) in self.residents() {
            if let Some(first) = seen.insert(npc, location) {
                return Err(HousingError::Corrupted(format!(
                    "{npc} lives in both {first} and {location}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn villages_mut(&mut self, biome: Biome) -> &mut Vec<Village> {
        self.biomes.entry(biome).or_insert_with(|| vec![Village::new()])
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::empty()
    }
}

/// NPCs not housed anywhere, in catalog order.
#[must_use]
pub fn unplaced(placement: &Placement, catalog: &Catalog) -> Vec<NpcName> {
    catalog
        .npcs()
        .iter()
        .map(|npc| npc.name)
        .filter(|&name| locate(name, placement).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_one_empty_village_per_biome() {
        let placement = Placement::empty();
        for biome in Biome::ALL {
            assert_eq!(placement.villages(biome).len(), 1);
            assert!(placement.villages(biome)[0].is_empty());
        }
        assert_eq!(placement.housed_count(), 0);
        placement.check_invariants().expect("empty is valid");
    }

    #[test]
    fn from_villages_fills_missing_biomes() {
        let placement = Placement::from_villages([(
            Biome::Forest,
            vec![vec![NpcName::Guide, NpcName::Merchant], vec![NpcName::Golfer]],
        )])
        .expect("valid");
        assert_eq!(placement.villages(Biome::Forest).len(), 2);
        assert_eq!(placement.villages(Biome::Ocean).len(), 1);
        assert_eq!(placement.housed_count(), 3);
    }

    #[test]
    fn from_villages_rejects_double_residence() {
        let err = Placement::from_villages([
            (Biome::Forest, vec![vec![NpcName::Guide]]),
            (Biome::Snow, vec![vec![NpcName::Guide]]),
        ])
        .expect_err("duplicate");
        assert!(matches!(err, HousingError::Corrupted(_)));
    }

    #[test]
    fn from_villages_rejects_empty_biome_list() {
        assert!(Placement::from_villages([(Biome::Jungle, vec![])]).is_err());
    }

    #[test]
    fn residents_iterate_in_biome_then_village_order() {
        let placement = Placement::from_villages([
            (Biome::Snow, vec![vec![NpcName::SantaClaus]]),
            (Biome::Forest, vec![vec![NpcName::Guide], vec![NpcName::Golfer]]),
        ])
        .expect("valid");
        let residents: Vec<_> = placement.residents().collect();
        assert_eq!(
            residents,
            vec![
                (NpcName::Guide, Location::new(Biome::Forest, 0)),
                (NpcName::Golfer, Location::new(Biome::Forest, 1)),
                (NpcName::SantaClaus, Location::new(Biome::Snow, 0)),
            ]
        );
    }

    #[test]
    fn unplaced_lists_everyone_not_housed() {
        let catalog = Catalog::standard();
        let placement = Placement::from_villages([(
            Biome::Forest,
            vec![vec![NpcName::Angler, NpcName::Zoologist]],
        )])
        .expect("valid");
        let roster = unplaced(&placement, &catalog);
        assert_eq!(roster.len(), NpcName::ALL.len() - 2);
        assert_eq!(roster[0], NpcName::ArmsDealer);
        assert!(!roster.contains(&NpcName::Zoologist));
    }

    #[test]
    fn snapshot_json_uses_display_names() {
        let placement = Placement::from_villages([(
            Biome::Desert,
            vec![vec![NpcName::ArmsDealer, NpcName::DyeTrader]],
        )])
        .expect("valid");
        let json = serde_json::to_string(&placement).expect("serialize");
        assert!(json.contains(r#""Desert":[["Arms Dealer","Dye Trader"]]"#));
        assert!(json.contains(r#""Forest":[[]]"#));

        let back: Placement = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, placement);
    }
}
