//! Discrete requests against the placement and the pure transition that
//! applies them.
//!
//! Commands are what the input layer produces: a drop onto a village is a
//! [`Command::Move`], a drop anywhere else is a [`Command::Remove`]. They
//! serialize with an `action` tag:
//!
//! ```json
//! {"action": "move", "npc": "Guide", "biome": "Forest", "slot": {"existing": 0}}
//! {"action": "remove", "npc": "Guide"}
//! {"action": "reset"}
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::placement::{MoveOutcome, Placement};
use crate::types::{Biome, Location, NpcName, VillageSlot};

/// A request to change the placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// House `npc` in `slot` of `biome`.
    Move {
        /// NPC being moved.
        npc: NpcName,
        /// Destination biome.
        biome: Biome,
        /// Destination village.
        slot: VillageSlot,
    },
    /// Unplace `npc`.
    Remove {
        /// NPC being unplaced.
        npc: NpcName,
    },
    /// Empty every biome.
    Reset,
}

/// What an applied command changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// An NPC moved.
    Moved {
        /// NPC that moved.
        npc: NpcName,
        /// Previous home, if it had one.
        from: Option<Location>,
        /// New home.
        to: Location,
    },
    /// An NPC was unplaced.
    Removed {
        /// NPC that was unplaced.
        npc: NpcName,
        /// Its former home.
        from: Location,
    },
    /// Every biome was emptied.
    Reset,
    /// The command matched the current state.
    Unchanged,
}

impl Effect {
    /// Whether the placement differs from before the command.
    #[must_use]
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// The result of applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The placement after the command.
    pub placement: Placement,
    /// What changed.
    pub effect: Effect,
}

/// Apply `command` to a copy of `placement`.
///
/// # Errors
///
/// Propagates rejections from [`Placement::move_npc`]. The input is never
/// mutated.
pub fn transition(placement: &Placement, command: &Command, catalog: &Catalog) -> Result<Transition> {
    let mut next = placement.clone();
    let effect = match *command {
        Command::Move { npc, biome, slot } => match next.move_npc(npc, biome, slot, catalog)? {
            MoveOutcome::Moved { from, to } => Effect::Moved { npc, from, to },
            MoveOutcome::Unchanged { .. } => Effect::Unchanged,
        },
        Command::Remove { npc } => match next.remove(npc) {
            Some(from) => Effect::Removed { npc, from },
            None => Effect::Unchanged,
        },
        Command::Reset => {
            next.reset();
            if next == *placement {
                Effect::Unchanged
            } else {
                Effect::Reset
            }
        }
    };
    Ok(Transition {
        placement: next,
        effect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_produces_new_placement_and_leaves_input() {
        let catalog = Catalog::standard();
        let start = Placement::empty();
        let command = Command::Move {
            npc: NpcName::Dryad,
            biome: Biome::Jungle,
            slot: VillageSlot::Existing(0),
        };

        let result = transition(&start, &command, &catalog).expect("move");
        assert_eq!(start, Placement::empty());
        assert_eq!(
            result.effect,
            Effect::Moved {
                npc: NpcName::Dryad,
                from: None,
                to: Location::new(Biome::Jungle, 0),
            }
        );
        assert_eq!(result.placement.housed_count(), 1);
    }

    #[test]
    fn removing_unplaced_npc_is_unchanged() {
        let catalog = Catalog::standard();
        let result = transition(
            &Placement::empty(),
            &Command::Remove { npc: NpcName::Nurse },
            &catalog,
        )
        .expect("remove");
        assert_eq!(result.effect, Effect::Unchanged);
        assert!(!result.effect.is_change());
    }

    #[test]
    fn reset_of_empty_placement_is_unchanged() {
        let catalog = Catalog::standard();
        let result = transition(&Placement::empty(), &Command::Reset, &catalog).expect("reset");
        assert_eq!(result.effect, Effect::Unchanged);

        let housed = Placement::from_villages([(Biome::Forest, vec![vec![NpcName::Guide]])])
            .expect("valid");
        let result = transition(&housed, &Command::Reset, &catalog).expect("reset");
        assert_eq!(result.effect, Effect::Reset);
        assert_eq!(result.placement, Placement::empty());
    }

    #[test]
    fn rejection_propagates() {
        let catalog = Catalog::standard();
        let command = Command::Move {
            npc: NpcName::Truffle,
            biome: Biome::Desert,
            slot: VillageSlot::New,
        };
        let err = transition(&Placement::empty(), &command, &catalog).expect_err("rejected");
        assert!(err.is_disallowed());
    }

    #[test]
    fn commands_use_action_tag() {
        let command: Command = serde_json::from_str(
            r#"{"action": "move", "npc": "Witch Doctor", "biome": "Jungle", "slot": "new"}"#,
        )
        .expect("parse");
        assert_eq!(
            command,
            Command::Move {
                npc: NpcName::WitchDoctor,
                biome: Biome::Jungle,
                slot: VillageSlot::New,
            }
        );

        let command: Command =
            serde_json::from_str(r#"{"action": "move", "npc": "Guide", "biome": "Forest", "slot": {"existing": 2}}"#)
                .expect("parse");
        assert!(matches!(
            command,
            Command::Move {
                slot: VillageSlot::Existing(2),
                ..
            }
        ));

        let json = serde_json::to_string(&Command::Reset).expect("serialize");
        assert_eq!(json, r#"{"action":"reset"}"#);
    }
}
