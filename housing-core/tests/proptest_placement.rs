//! Property-Based Tests for the placement store and evaluator.
//!
//! Random sequences of moves and removals must preserve single residency
//! and the one-village-per-biome minimum, repeated moves must be no-ops,
//! and every score must stay inside its clamp.

use proptest::prelude::*;

use housing_core::placement::MoveOutcome;
use housing_core::{Biome, Catalog, NpcName, Placement, VillageSlot, evaluate, locate};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Op {
    Move(NpcName, Biome, VillageSlot),
    Remove(NpcName),
}

fn arb_npc() -> impl Strategy<Value = NpcName> {
    prop::sample::select(NpcName::ALL.to_vec())
}

fn arb_biome() -> impl Strategy<Value = Biome> {
    prop::sample::select(Biome::ALL.to_vec())
}

fn arb_slot() -> impl Strategy<Value = VillageSlot> {
    prop_oneof![
        1 => Just(VillageSlot::New),
        3 => (0..4usize).prop_map(VillageSlot::Existing),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (arb_npc(), arb_biome(), arb_slot()).prop_map(|(n, b, s)| Op::Move(n, b, s)),
        1 => arb_npc().prop_map(Op::Remove),
    ]
}

/// Apply `ops`, ignoring rejected moves.
fn play(ops: &[Op], catalog: &Catalog) -> Placement {
    let mut placement = Placement::empty();
    for op in ops {
        match *op {
            Op::Move(npc, biome, slot) => {
                let _ = placement.move_npc(npc, biome, slot, catalog);
            }
            Op::Remove(npc) => {
                placement.remove(npc);
            }
        }
    }
    placement
}

fn assert_structure(placement: &Placement) -> Result<(), TestCaseError> {
    prop_assert!(placement.check_invariants().is_ok(), "{:?}", placement.check_invariants());
    for biome in Biome::ALL {
        let villages = placement.villages(biome);
        prop_assert!(!villages.is_empty());
        if villages.len() > 1 {
            prop_assert!(
                villages.iter().all(|v| !v.is_empty()),
                "dangling empty village in {biome}"
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Property: structure survives any sequence of operations
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn single_residency_and_village_minimum(ops in prop::collection::vec(arb_op(), 0..80)) {
        let catalog = Catalog::standard();
        let mut placement = Placement::empty();
        for op in ops {
            match op {
                Op::Move(npc, biome, slot) => {
                    let before = placement.clone();
                    if placement.move_npc(npc, biome, slot, &catalog).is_err() {
                        prop_assert_eq!(&placement, &before);
                    } else {
                        prop_assert_eq!(locate(npc, &placement).map(|l| l.biome), Some(biome));
                    }
                }
                Op::Remove(npc) => {
                    placement.remove(npc);
                    prop_assert_eq!(locate(npc, &placement), None);
                }
            }
            assert_structure(&placement)?;
        }
    }
}

// ---------------------------------------------------------------------------
// Property: the solitary NPC only ever lives in its home biome
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn solitary_npc_stays_home(ops in prop::collection::vec(arb_op(), 0..60)) {
        let catalog = Catalog::standard();
        let placement = play(&ops, &catalog);
        let rule = catalog.solitary();
        if let Some(location) = locate(rule.npc, &placement) {
            prop_assert_eq!(location.biome, rule.home);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: repeating a move is a no-op
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn repeated_move_is_idempotent(
        ops in prop::collection::vec(arb_op(), 0..40),
        npc in arb_npc(),
        biome in arb_biome(),
        slot in arb_slot(),
    ) {
        let catalog = Catalog::standard();
        let mut placement = play(&ops, &catalog);

        let Ok(outcome) = placement.move_npc(npc, biome, slot, &catalog) else {
            return Ok(());
        };
        let after_first = placement.clone();
        let to = outcome.location();

        let again = placement
            .move_npc(npc, biome, slot, &catalog)
            .expect("repeat accepted");
        prop_assert_eq!(again, MoveOutcome::Unchanged { at: to });
        prop_assert_eq!(&placement, &after_first);

        // The reported home addresses the same village.
        let resolved = placement
            .move_npc(npc, biome, VillageSlot::Existing(to.village), &catalog)
            .expect("reported home is in range");
        prop_assert_eq!(resolved, MoveOutcome::Unchanged { at: to });
        prop_assert_eq!(&placement, &after_first);
    }
}

// ---------------------------------------------------------------------------
// Property: scores stay within the clamp and on the hundredth grid
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn scores_within_bounds(ops in prop::collection::vec(arb_op(), 0..80)) {
        let catalog = Catalog::standard();
        let placement = play(&ops, &catalog);
        for (npc, _) in placement.residents() {
            let score = evaluate(npc, &placement, &catalog).expect("housed NPC has a score");
            prop_assert!((0.75..=1.5).contains(&score), "{} scored {}", npc, score);
            prop_assert!(((score * 100.0).round() - score * 100.0).abs() < 1e-6);
        }
        for npc in NpcName::ALL {
            prop_assert_eq!(
                evaluate(npc, &placement, &catalog).is_some(),
                locate(npc, &placement).is_some()
            );
        }
    }
}
