//! Placement Lookup: which village, if any, houses an NPC.
//!
//! A linear scan over at most a few dozen residents. The first match in
//! biome order then village order wins, so callers get a deterministic
//! answer even from a mapping that has been corrupted outside the move
//! contract.

use tracing::error;

use super::Placement;
use crate::types::{Location, NpcName};

/// Locate `npc` in `placement`.
///
/// Returns `None` when the NPC is not housed. If the NPC is found in more
/// than one village the mapping has been corrupted: the fault is logged and
/// the first residence is returned.
#[must_use]
pub fn locate(npc: NpcName, placement: &Placement) -> Option<Location> {
    let mut homes = placement
        .residents()
        .filter(|(resident, _)| *resident == npc)
        .map(|(_, location)| location);

    let first = homes.next()?;
    for other in homes {
        error!(
            npc = %npc,
            first = %first,
            duplicate = %other,
            "NPC resident in more than one village"
        );
    }
    Some(first)
}
