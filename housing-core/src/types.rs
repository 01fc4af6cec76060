//! Core type definitions for the housing planner.
//!
//! Biomes and NPCs are closed sets: every name the planner can talk about is
//! a variant here, so an unknown name can only appear at a parsing boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Biomes
// ---------------------------------------------------------------------------

/// A biome an NPC can be housed in.
///
/// Declaration order is the fixed catalog order; biomes are addressable by
/// their position in it (see [`Biome::index`]).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Biome {
    /// Surface forest.
    Forest,
    /// Desert.
    Desert,
    /// Underground cavern layer.
    Cavern,
    /// The Hallow.
    Hallow,
    /// Jungle.
    Jungle,
    /// Snow / tundra.
    Snow,
    /// Glowing mushroom biome.
    #[strum(
        to_string = "GlowingMushroom",
        serialize = "glowing_mushroom",
        serialize = "mushroom"
    )]
    GlowingMushroom,
    /// Ocean.
    Ocean,
}

impl Biome {
    /// Every biome, in catalog order.
    pub const ALL: [Biome; 8] = [
        Biome::Forest,
        Biome::Desert,
        Biome::Cavern,
        Biome::Hallow,
        Biome::Jungle,
        Biome::Snow,
        Biome::GlowingMushroom,
        Biome::Ocean,
    ];

    /// Position of this biome in the catalog order.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The biome at `index` in catalog order, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

// ---------------------------------------------------------------------------
// NPCs
// ---------------------------------------------------------------------------

/// Identity of a town NPC.
///
/// Displays as the in-game name ("Arms Dealer"); parsing also accepts the
/// underscore form ("arms_dealer") and ignores ASCII case.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum NpcName {
    Angler,
    #[serde(rename = "Arms Dealer")]
    #[strum(to_string = "Arms Dealer", serialize = "arms_dealer")]
    ArmsDealer,
    Clothier,
    Cyborg,
    Demolitionist,
    Dryad,
    #[serde(rename = "Dye Trader")]
    #[strum(to_string = "Dye Trader", serialize = "dye_trader")]
    DyeTrader,
    #[serde(rename = "Goblin Tinkerer")]
    #[strum(to_string = "Goblin Tinkerer", serialize = "goblin_tinkerer")]
    GoblinTinkerer,
    Golfer,
    Guide,
    Mechanic,
    Merchant,
    Nurse,
    Painter,
    #[serde(rename = "Party Girl")]
    #[strum(to_string = "Party Girl", serialize = "party_girl")]
    PartyGirl,
    Pirate,
    Princess,
    #[serde(rename = "Santa Claus")]
    #[strum(to_string = "Santa Claus", serialize = "santa_claus")]
    SantaClaus,
    Steampunker,
    Stylist,
    Tavernkeep,
    #[serde(rename = "Tax Collector")]
    #[strum(to_string = "Tax Collector", serialize = "tax_collector")]
    TaxCollector,
    Truffle,
    #[serde(rename = "Witch Doctor")]
    #[strum(to_string = "Witch Doctor", serialize = "witch_doctor")]
    WitchDoctor,
    Wizard,
    Zoologist,
}

impl NpcName {
    /// Every NPC, in catalog order.
    pub const ALL: [NpcName; 26] = [
        NpcName::Angler,
        NpcName::ArmsDealer,
        NpcName::Clothier,
        NpcName::Cyborg,
        NpcName::Demolitionist,
        NpcName::Dryad,
        NpcName::DyeTrader,
        NpcName::GoblinTinkerer,
        NpcName::Golfer,
        NpcName::Guide,
        NpcName::Mechanic,
        NpcName::Merchant,
        NpcName::Nurse,
        NpcName::Painter,
        NpcName::PartyGirl,
        NpcName::Pirate,
        NpcName::Princess,
        NpcName::SantaClaus,
        NpcName::Steampunker,
        NpcName::Stylist,
        NpcName::Tavernkeep,
        NpcName::TaxCollector,
        NpcName::Truffle,
        NpcName::WitchDoctor,
        NpcName::Wizard,
        NpcName::Zoologist,
    ];
}

// ---------------------------------------------------------------------------
// Opinions
// ---------------------------------------------------------------------------

/// How strongly an NPC feels about a biome or a neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum Opinion {
    /// Loved; for a biome this is the NPC's favorite.
    Love,
    /// Liked.
    Like,
    /// Disliked.
    Dislike,
    /// Hated.
    Hate,
}

impl Opinion {
    /// All tiers, most favorable first.
    pub const ALL: [Opinion; 4] = [Opinion::Love, Opinion::Like, Opinion::Dislike, Opinion::Hate];

    /// Price multiplier this opinion contributes to a happiness score.
    /// Below 1.0 is favorable.
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Love => 0.88,
            Self::Like => 0.94,
            Self::Dislike => 1.06,
            Self::Hate => 1.12,
        }
    }
}

// ---------------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------------

/// Destination village within a biome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VillageSlot {
    /// The village currently at this index.
    Existing(usize),
    /// A fresh village appended to the end of the biome's list.
    New,
}

impl fmt::Display for VillageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Existing(index) => write!(f, "village {index}"),
            Self::New => write!(f, "new village"),
        }
    }
}

/// Where an NPC lives: a biome and a village index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// The biome.
    pub biome: Biome,
    /// Index of the village within the biome's village list.
    pub village: usize,
}

impl Location {
    /// Create a location.
    #[must_use]
    pub fn new(biome: Biome, village: usize) -> Self {
        Self { biome, village }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.biome, self.village)
    }
}
