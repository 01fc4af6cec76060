//! Affinity Catalog: static opinion data for every NPC.
//!
//! Each NPC has at most one opinion tier per biome (favorite, liked,
//! disliked, hated) and four neighbour lists. The catalog is immutable and
//! loaded once; lookups that miss return `None`.

use serde::Serialize;

use crate::error::{HousingError, Result};
use crate::types::{Biome, NpcName, Opinion};

/// Static affinity record for one NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Npc {
    /// Identity.
    pub name: NpcName,
    /// Sprite asset path. Opaque to the core.
    pub sprite: &'static str,
    /// Favorite biome.
    pub biome_love: Option<Biome>,
    /// Liked biome.
    pub biome_like: Option<Biome>,
    /// Disliked biome.
    pub biome_dislike: Option<Biome>,
    /// Hated biome.
    pub biome_hate: Option<Biome>,
    /// Neighbours this NPC loves.
    pub loves: &'static [NpcName],
    /// Neighbours this NPC likes.
    pub likes: &'static [NpcName],
    /// Neighbours this NPC dislikes.
    pub dislikes: &'static [NpcName],
    /// Neighbours this NPC hates.
    pub hates: &'static [NpcName],
}

impl Npc {
    /// The NPC's opinion of `biome`, if it has one.
    #[must_use]
    pub fn biome_opinion(&self, biome: Biome) -> Option<Opinion> {
        self.biome_tiers()
            .into_iter()
            .find(|(_, b)| *b == Some(biome))
            .map(|(opinion, _)| opinion)
    }

    /// The NPC's opinion of another NPC as a neighbour, if it has one.
    #[must_use]
    pub fn opinion_of(&self, other: NpcName) -> Option<Opinion> {
        self.neighbour_tiers()
            .into_iter()
            .find(|(_, names)| names.contains(&other))
            .map(|(opinion, _)| opinion)
    }

    /// Group this NPC's opinions for display.
    #[must_use]
    pub fn profile(&self) -> AffinityProfile {
        AffinityProfile {
            name: self.name,
            biomes: self
                .biome_tiers()
                .into_iter()
                .filter_map(|(opinion, biome)| biome.map(|b| (opinion, b)))
                .collect(),
            neighbours: self
                .neighbour_tiers()
                .into_iter()
                .filter(|(_, names)| !names.is_empty())
                .map(|(opinion, names)| (opinion, names.to_vec()))
                .collect(),
        }
    }

    fn biome_tiers(&self) -> [(Opinion, Option<Biome>); 4] {
        [
            (Opinion::Love, self.biome_love),
            (Opinion::Like, self.biome_like),
            (Opinion::Dislike, self.biome_dislike),
            (Opinion::Hate, self.biome_hate),
        ]
    }

    fn neighbour_tiers(&self) -> [(Opinion, &'static [NpcName]); 4] {
        [
            (Opinion::Love, self.loves),
            (Opinion::Like, self.likes),
            (Opinion::Dislike, self.dislikes),
            (Opinion::Hate, self.hates),
        ]
    }
}

/// An NPC's opinions grouped by tier, most favorable first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffinityProfile {
    /// Whose profile this is.
    pub name: NpcName,
    /// Biome opinions that are set.
    pub biomes: Vec<(Opinion, Biome)>,
    /// Non-empty neighbour lists.
    pub neighbours: Vec<(Opinion, Vec<NpcName>)>,
}

/// The one NPC with special housing rules.
///
/// It may only be housed in `home`, needs company to be content, loves
/// every neighbour and is loved by every neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolitaryRule {
    /// The NPC the rule applies to.
    pub npc: NpcName,
    /// The only biome the NPC may be placed in.
    pub home: Biome,
}

/// Read-only lookup over NPC affinity data and the fixed biome list.
#[derive(Debug, Clone)]
pub struct Catalog {
    npcs: Vec<Npc>,
    solitary: SolitaryRule,
}

impl Catalog {
    /// Build a catalog from custom data, checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HousingError::Catalog`] describing the first violation.
    pub fn new(npcs: Vec<Npc>, solitary: SolitaryRule) -> Result<Self> {
        let catalog = Self { npcs, solitary };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in reference catalog.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            npcs: data::STANDARD_NPCS.to_vec(),
            solitary: SolitaryRule {
                npc: NpcName::Truffle,
                home: Biome::GlowingMushroom,
            },
        }
    }

    /// Look up an NPC's record.
    #[must_use]
    pub fn by_name(&self, name: NpcName) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.name == name)
    }

    /// All NPC records, in catalog order.
    #[must_use]
    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    /// The fixed biome list, in catalog order.
    #[must_use]
    pub fn biomes(&self) -> &'static [Biome] {
        &Biome::ALL
    }

    /// Position of `biome` in the fixed ordering.
    #[must_use]
    pub fn index_of(&self, biome: Biome) -> usize {
        biome.index()
    }

    /// The biome at `index` in the fixed ordering.
    #[must_use]
    pub fn biome_at(&self, index: usize) -> Option<Biome> {
        Biome::from_index(index)
    }

    /// The special-case NPC and its home biome.
    #[must_use]
    pub fn solitary(&self) -> SolitaryRule {
        self.solitary
    }

    /// Whether `npc` is the special-case NPC.
    #[must_use]
    pub fn is_solitary(&self, npc: NpcName) -> bool {
        self.solitary.npc == npc
    }

    /// Check the data-model invariants: one tier per biome, one opinion per
    /// neighbour, no self-opinions, no duplicate records.
    ///
    /// # Errors
    ///
    /// Returns [`HousingError::Catalog`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        for (i, npc) in self.npcs.iter().enumerate() {
            if self.npcs[..i].iter().any(|other| other.name == npc.name) {
                return Err(HousingError::Catalog(format!(
                    "{} appears more than once",
                    npc.name
                )));
            }

            let biomes: Vec<Biome> = npc.biome_tiers().iter().filter_map(|(_, b)| *b).collect();
            for (j, biome) in biomes.iter().enumerate() {
                if biomes[..j].contains(biome) {
                    return Err(HousingError::Catalog(format!(
                        "{} has more than one opinion of {biome}",
                        npc.name
                    )));
                }
            }

            let neighbours: Vec<NpcName> = npc
                .neighbour_tiers()
                .iter()
                .flat_map(|(_, names)| names.iter().copied())
                .collect();
            for (j, other) in neighbours.iter().enumerate() {
                if *other == npc.name {
                    return Err(HousingError::Catalog(format!(
                        "{} has an opinion of itself",
                        npc.name
                    )));
                }
                if neighbours[..j].contains(other) {
                    return Err(HousingError::Catalog(format!(
                        "{} has more than one opinion of {other}",
                        npc.name
                    )));
                }
            }
        }

        if self.by_name(self.solitary.npc).is_none() {
            return Err(HousingError::Catalog(format!(
                "special-case NPC {} has no record",
                self.solitary.npc
            )));
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

mod data {
    use crate::types::Biome::{Cavern, Desert, Forest, Hallow, Jungle, Ocean, Snow};
    use crate::types::NpcName::{
        self, Angler, ArmsDealer, Clothier, Cyborg, Demolitionist, Dryad, DyeTrader,
        GoblinTinkerer, Golfer, Guide, Mechanic, Merchant, Nurse, Painter, PartyGirl, Pirate,
        Princess, SantaClaus, Steampunker, Stylist, Tavernkeep, TaxCollector, Truffle,
        WitchDoctor, Wizard, Zoologist,
    };

    use super::Npc;

    pub(super) const fn npc(name: NpcName, sprite: &'static str) -> Npc {
        Npc {
            name,
            sprite,
            biome_love: None,
            biome_like: None,
            biome_dislike: None,
            biome_hate: None,
            loves: &[],
            likes: &[],
            dislikes: &[],
            hates: &[],
        }
    }

    pub(super) static STANDARD_NPCS: [Npc; 26] = [
        Npc {
            biome_like: Some(Ocean),
            biome_hate: Some(Desert),
            likes: &[Demolitionist, PartyGirl, TaxCollector],
            hates: &[Tavernkeep],
            ..npc(Angler, "images/npcs/Angler.png")
        },
        Npc {
            biome_like: Some(Desert),
            biome_dislike: Some(Snow),
            loves: &[Nurse],
            likes: &[Steampunker],
            dislikes: &[Golfer],
            hates: &[Demolitionist],
            ..npc(ArmsDealer, "images/npcs/Arms_Dealer.png")
        },
        Npc {
            biome_like: Some(Cavern),
            biome_dislike: Some(Hallow),
            loves: &[Truffle],
            likes: &[TaxCollector],
            dislikes: &[Nurse],
            hates: &[Mechanic],
            ..npc(Clothier, "images/npcs/Clothier.png")
        },
        Npc {
            biome_like: Some(Snow),
            biome_dislike: Some(Jungle),
            likes: &[Steampunker, Pirate, Stylist],
            dislikes: &[Zoologist],
            hates: &[Wizard],
            ..npc(Cyborg, "images/npcs/Cyborg.png")
        },
        Npc {
            biome_like: Some(Cavern),
            biome_dislike: Some(Ocean),
            loves: &[Tavernkeep],
            likes: &[Mechanic],
            dislikes: &[ArmsDealer, GoblinTinkerer],
            ..npc(Demolitionist, "images/npcs/Demolitionist.png")
        },
        Npc {
            biome_like: Some(Jungle),
            biome_dislike: Some(Desert),
            likes: &[WitchDoctor, Truffle],
            dislikes: &[Angler, Zoologist],
            hates: &[Golfer],
            ..npc(Dryad, "images/npcs/Dryad.png")
        },
        Npc {
            biome_like: Some(Desert),
            biome_dislike: Some(Forest),
            likes: &[ArmsDealer, Painter],
            dislikes: &[Steampunker],
            hates: &[Pirate],
            ..npc(DyeTrader, "images/npcs/Dye_Trader.png")
        },
        Npc {
            biome_like: Some(Cavern),
            biome_dislike: Some(Jungle),
            loves: &[Mechanic],
            likes: &[DyeTrader],
            dislikes: &[Clothier],
            hates: &[Stylist],
            ..npc(GoblinTinkerer, "images/npcs/Goblin_Tinkerer.png")
        },
        Npc {
            biome_like: Some(Forest),
            biome_dislike: Some(Cavern),
            loves: &[Angler],
            likes: &[Painter, Zoologist],
            dislikes: &[Pirate],
            hates: &[Merchant],
            ..npc(Golfer, "images/npcs/Golfer.png")
        },
        Npc {
            biome_like: Some(Forest),
            biome_dislike: Some(Ocean),
            likes: &[Clothier, Zoologist],
            dislikes: &[Steampunker],
            hates: &[Painter],
            ..npc(Guide, "images/npcs/Guide.png")
        },
        Npc {
            biome_like: Some(Snow),
            biome_dislike: Some(Cavern),
            loves: &[GoblinTinkerer],
            likes: &[Cyborg],
            dislikes: &[ArmsDealer],
            hates: &[Clothier],
            ..npc(Mechanic, "images/npcs/Mechanic.png")
        },
        Npc {
            biome_like: Some(Forest),
            biome_dislike: Some(Desert),
            likes: &[Golfer, Nurse],
            dislikes: &[TaxCollector],
            hates: &[Angler],
            ..npc(Merchant, "images/npcs/Merchant.png")
        },
        Npc {
            biome_like: Some(Hallow),
            biome_dislike: Some(Snow),
            loves: &[ArmsDealer],
            likes: &[Wizard],
            dislikes: &[Dryad, PartyGirl],
            hates: &[Zoologist],
            ..npc(Nurse, "images/npcs/Nurse.png")
        },
        Npc {
            biome_like: Some(Jungle),
            biome_dislike: Some(Forest),
            loves: &[Dryad],
            likes: &[PartyGirl],
            dislikes: &[Truffle, Cyborg],
            ..npc(Painter, "images/npcs/Painter.png")
        },
        Npc {
            biome_like: Some(Hallow),
            biome_dislike: Some(Cavern),
            loves: &[Wizard],
            likes: &[Stylist],
            dislikes: &[Merchant],
            hates: &[TaxCollector],
            ..npc(PartyGirl, "images/npcs/Party_Girl.png")
        },
        Npc {
            biome_like: Some(Ocean),
            biome_dislike: Some(Cavern),
            loves: &[Angler],
            likes: &[Tavernkeep],
            dislikes: &[Stylist],
            hates: &[Guide],
            ..npc(Pirate, "images/npcs/Pirate.png")
        },
        npc(Princess, "images/npcs/Princess.png"),
        Npc {
            biome_love: Some(Snow),
            biome_hate: Some(Desert),
            hates: &[TaxCollector],
            ..npc(SantaClaus, "images/npcs/Santa_Claus.png")
        },
        Npc {
            biome_like: Some(Desert),
            biome_dislike: Some(Jungle),
            loves: &[Cyborg],
            likes: &[Painter],
            dislikes: &[Dryad, Wizard, PartyGirl],
            ..npc(Steampunker, "images/npcs/Steampunker.png")
        },
        Npc {
            biome_like: Some(Ocean),
            biome_dislike: Some(Snow),
            loves: &[DyeTrader],
            likes: &[Pirate],
            dislikes: &[Tavernkeep],
            hates: &[GoblinTinkerer],
            ..npc(Stylist, "images/npcs/Stylist.png")
        },
        Npc {
            biome_like: Some(Hallow),
            biome_dislike: Some(Snow),
            loves: &[Demolitionist],
            likes: &[GoblinTinkerer],
            dislikes: &[Guide],
            hates: &[DyeTrader],
            ..npc(Tavernkeep, "images/npcs/Tavernkeep.png")
        },
        Npc {
            biome_like: Some(Snow),
            biome_dislike: Some(Hallow),
            loves: &[Merchant],
            likes: &[PartyGirl],
            dislikes: &[Demolitionist, Mechanic],
            hates: &[SantaClaus],
            ..npc(TaxCollector, "images/npcs/Tax_Collector.png")
        },
        Npc {
            loves: &[Guide],
            likes: &[Dryad],
            dislikes: &[Clothier],
            hates: &[WitchDoctor],
            ..npc(Truffle, "images/npcs/Truffle.png")
        },
        Npc {
            biome_like: Some(Jungle),
            biome_dislike: Some(Hallow),
            likes: &[Dryad, Guide],
            dislikes: &[Nurse],
            hates: &[Truffle],
            ..npc(WitchDoctor, "images/npcs/Witch_Doctor.png")
        },
        Npc {
            biome_like: Some(Hallow),
            biome_dislike: Some(Ocean),
            loves: &[Golfer],
            likes: &[Merchant],
            dislikes: &[WitchDoctor],
            hates: &[Cyborg],
            ..npc(Wizard, "images/npcs/Wizard.png")
        },
        Npc {
            biome_like: Some(Forest),
            biome_dislike: Some(Desert),
            loves: &[WitchDoctor],
            likes: &[Golfer],
            dislikes: &[Angler],
            hates: &[ArmsDealer],
            ..npc(Zoologist, "images/npcs/Zoologist.png")
        },
    ];
}
