//! Placement Store: the move, remove and reset operations.
//!
//! Pruning policy: a village emptied by a move or removal is deleted unless
//! it is the only village left in its biome. A move prunes the NPC's old
//! village before it inserts, so within one biome the destination index
//! addresses the list as it stands after the NPC has left.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Placement, Village, locate};
use crate::catalog::Catalog;
use crate::error::{HousingError, Result};
use crate::types::{Biome, Location, NpcName, VillageSlot};

/// What a successful move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The NPC now lives at `to`.
    Moved {
        /// Previous home, or `None` if the NPC was unplaced.
        from: Option<Location>,
        /// Resolved home after pruning.
        to: Location,
    },
    /// The NPC already lived at the destination; nothing changed.
    Unchanged {
        /// The NPC's unchanged home.
        at: Location,
    },
}

impl MoveOutcome {
    /// Where the NPC lives after the move.
    #[must_use]
    pub fn location(&self) -> Location {
        match *self {
            Self::Moved { to, .. } => to,
            Self::Unchanged { at } => at,
        }
    }
}

impl Placement {
    /// Move `npc` into `slot` of `biome`.
    ///
    /// The NPC leaves its current village (pruning it if emptied) and joins
    /// the destination, or a new village appended to the biome. Repeating a
    /// move is a no-op, as is any move that would leave the mapping as it
    /// was.
    ///
    /// # Errors
    ///
    /// - [`HousingError::PlacementDisallowed`] if `npc` is the special-case
    ///   NPC and `biome` is not its home.
    /// - [`HousingError::VillageOutOfRange`] if `slot` names a village the
    ///   biome does not have once the NPC's old village has been pruned.
    ///
    /// The mapping is untouched on error.
    pub fn move_npc(
        &mut self,
        npc: NpcName,
        biome: Biome,
        slot: VillageSlot,
        catalog: &Catalog,
    ) -> Result<MoveOutcome> {
        let rule = catalog.solitary();
        if rule.npc == npc && rule.home != biome {
            warn!(npc = %npc, biome = %biome, home = %rule.home, "Placement disallowed");
            return Err(HousingError::PlacementDisallowed {
                npc,
                biome,
                home: rule.home,
            });
        }

        let from = locate(npc, self);
        if let (Some(current), VillageSlot::Existing(index)) = (from, slot) {
            if current.biome == biome && current.village == index {
                return Ok(MoveOutcome::Unchanged { at: current });
            }
        }

        let mut next = self.clone();
        if let Some(current) = from {
            next.evict_and_prune(npc, current);
        }

        let villages = next.villages_mut(biome);
        let target = match slot {
            VillageSlot::New => {
                for village in villages.iter_mut() {
                    village.evict(npc);
                }
                villages.push(Village::from(vec![npc]));
                villages.len() - 1
            }
            VillageSlot::Existing(index) => {
                let count = villages.len();
                let Some(village) = villages.get_mut(index) else {
                    return Err(HousingError::VillageOutOfRange {
                        biome,
                        index,
                        villages: count,
                    });
                };
                village.insert(npc);
                index
            }
        };

        // An empty placeholder goes once the biome has another village.
        let emptied = villages
            .iter()
            .enumerate()
            .find(|(i, village)| *i != target && village.is_empty())
            .map(|(i, _)| i);
        let target = match emptied {
            Some(i) => {
                villages.remove(i);
                if i < target { target - 1 } else { target }
            }
            None => target,
        };

        let to = Location::new(biome, target);
        if next == *self {
            return Ok(MoveOutcome::Unchanged { at: to });
        }
        *self = next;

        debug!(
            npc = %npc,
            from = ?from.map(|l| l.to_string()),
            to = %to,
            slot = %slot,
            "Moved NPC"
        );
        Ok(MoveOutcome::Moved { from, to })
    }

    /// Unplace `npc`, returning where it lived.
    ///
    /// Its village is pruned if emptied, unless it is the biome's last.
    /// Removing an NPC that is not housed is a no-op returning `None`.
    pub fn remove(&mut self, npc: NpcName) -> Option<Location> {
        let at = locate(npc, self)?;
        self.evict_and_prune(npc, at);
        debug!(npc = %npc, from = %at, "Removed NPC");
        Some(at)
    }

    /// Restore the default state: one empty village per biome.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    fn evict_and_prune(&mut self, npc: NpcName, at: Location) {
        let villages = self.villages_mut(at.biome);
        if let Some(village) = villages.get_mut(at.village) {
            village.evict(npc);
            if village.is_empty() && villages.len() > 1 {
                villages.remove(at.village);
            }
        }
    }
}
