//! Error types for the housing core library.

use thiserror::Error;

use crate::types::{Biome, NpcName};

/// Top-level error type for all housing operations.
///
/// Lookup misses (an NPC that is not placed, a biome index outside the
/// catalog) are not errors: they surface as `None` from the query APIs.
#[derive(Error, Debug)]
pub enum HousingError {
    /// The move is not allowed for this NPC. This is a user-facing denial,
    /// not a fault: nothing was mutated.
    #[error("{npc} may only live in {home}, not in {biome}")]
    PlacementDisallowed {
        /// The NPC that was being moved.
        npc: NpcName,
        /// The requested destination biome.
        biome: Biome,
        /// The only biome this NPC accepts.
        home: Biome,
    },

    /// The destination village index does not exist in the biome.
    #[error("Village {index} does not exist in {biome} ({villages} villages)")]
    VillageOutOfRange {
        /// Destination biome.
        biome: Biome,
        /// Requested village index.
        index: usize,
        /// Number of villages the biome currently has.
        villages: usize,
    },

    /// The affinity catalog violates one of its data invariants.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A placement mapping violates a structural invariant.
    #[error("Corrupted placement: {0}")]
    Corrupted(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HousingError {
    /// Whether this error is the user-facing "this placement is not allowed"
    /// denial rather than an internal fault.
    #[must_use]
    pub fn is_disallowed(&self) -> bool {
        matches!(self, Self::PlacementDisallowed { .. })
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, HousingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallowed_is_distinguishable() {
        let denial = HousingError::PlacementDisallowed {
            npc: NpcName::Truffle,
            biome: Biome::Forest,
            home: Biome::GlowingMushroom,
        };
        assert!(denial.is_disallowed());
        assert_eq!(
            denial.to_string(),
            "Truffle may only live in GlowingMushroom, not in Forest"
        );

        let fault = HousingError::VillageOutOfRange {
            biome: Biome::Snow,
            index: 4,
            villages: 1,
        };
        assert!(!fault.is_disallowed());
    }
}
