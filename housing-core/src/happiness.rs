//! Happiness Evaluator: the price ratio an NPC charges where it lives.
//!
//! A score is the product of three multipliers (biome, space, neighbours),
//! clamped and rounded to the hundredth. 1.0 is baseline; lower is happier.
//! Scores are a projection of the placement, never stored.
//!
//! The solitary NPC is special on both sides of the neighbour lookup: it
//! loves every neighbour, and every neighbour loves it.

use serde::Serialize;

use crate::catalog::{Catalog, Npc};
use crate::config::ScoringConfig;
use crate::placement::{Placement, locate};
use crate::types::{Biome, NpcName, Opinion};

/// The factors behind one NPC's score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HappinessBreakdown {
    /// Where the NPC lives.
    pub biome: f64,
    /// How crowded its village is.
    pub space: f64,
    /// Product of its opinions of every co-resident.
    pub neighbours: f64,
    /// `biome * space * neighbours`, before clamping.
    pub raw: f64,
    /// Clamped, rounded score.
    pub score: f64,
}

/// Score `npc` with the in-game constants. `None` if it is not housed.
#[must_use]
pub fn evaluate(npc: NpcName, placement: &Placement, catalog: &Catalog) -> Option<f64> {
    evaluate_with(npc, placement, catalog, &ScoringConfig::default()).map(|b| b.score)
}

/// Score `npc` with explicit constants, keeping every factor.
///
/// Returns `None` if the NPC is not housed or the catalog has no record
/// for it.
#[must_use]
pub fn evaluate_with(
    npc: NpcName,
    placement: &Placement,
    catalog: &Catalog,
    scoring: &ScoringConfig,
) -> Option<HappinessBreakdown> {
    let location = locate(npc, placement)?;
    let record = catalog.by_name(npc)?;
    let others: Vec<NpcName> = placement
        .village(location)?
        .residents()
        .iter()
        .copied()
        .filter(|&resident| resident != npc)
        .collect();

    let biome = biome_multiplier(record, location.biome);
    let space = space_multiplier(catalog.is_solitary(npc), others.len(), scoring);
    let neighbours = others
        .iter()
        .map(|&other| neighbour_multiplier(record, other, catalog))
        .product::<f64>();

    let raw = biome * space * neighbours;
    let score = round_hundredth(raw.clamp(scoring.min_score, scoring.max_score));
    Some(HappinessBreakdown {
        biome,
        space,
        neighbours,
        raw,
        score,
    })
}

/// Scores of every housed NPC, in biome then village order.
#[must_use]
pub fn evaluate_all(placement: &Placement, catalog: &Catalog) -> Vec<(NpcName, f64)> {
    placement
        .residents()
        .filter_map(|(npc, _)| evaluate(npc, placement, catalog).map(|score| (npc, score)))
        .collect()
}

/// A score as the whole percentage shown next to an NPC.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn as_percent(score: f64) -> u32 {
    (score * 100.0).round().max(0.0) as u32
}

fn biome_multiplier(record: &Npc, biome: Biome) -> f64 {
    record.biome_opinion(biome).map_or(1.0, Opinion::multiplier)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn space_multiplier(solitary: bool, others: usize, scoring: &ScoringConfig) -> f64 {
    if solitary {
        return if others < scoring.solitary_min_company {
            scoring.solitary_penalty
        } else {
            1.0
        };
    }

    let base = if others < scoring.crowd_threshold {
        scoring.small_village_multiplier
    } else {
        1.0
    };
    let crowd = others.saturating_sub(scoring.crowd_threshold) as i32;
    base * scoring.crowd_multiplier.powi(crowd)
}

fn neighbour_multiplier(record: &Npc, other: NpcName, catalog: &Catalog) -> f64 {
    if catalog.is_solitary(record.name) || catalog.is_solitary(other) {
        return Opinion::Love.multiplier();
    }
    record.opinion_of(other).map_or(1.0, Opinion::multiplier)
}

fn round_hundredth(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn village(biome: Biome, residents: &[NpcName]) -> Placement {
        Placement::from_villages([(biome, vec![residents.to_vec()])]).expect("valid")
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn unplaced_npc_has_no_score() {
        let catalog = Catalog::standard();
        assert_eq!(evaluate(NpcName::Guide, &Placement::empty(), &catalog), None);
    }

    #[test]
    fn alone_in_favorite_biome() {
        let catalog = Catalog::standard();
        let placement = village(Biome::Snow, &[NpcName::SantaClaus]);
        // 0.88 favorite biome, 0.95 small village.
        let score = evaluate(NpcName::SantaClaus, &placement, &catalog).expect("placed");
        assert!(close(score, 0.84));
    }

    #[test]
    fn crowding_compounds_past_three_others() {
        let catalog = Catalog::standard();
        let placement = village(
            Biome::Desert,
            &[
                NpcName::Golfer,
                NpcName::Zoologist,
                NpcName::Princess,
                NpcName::Stylist,
                NpcName::Nurse,
            ],
        );
        let breakdown =
            evaluate_with(NpcName::Princess, &placement, &catalog, &ScoringConfig::default())
                .expect("placed");
        // The Princess holds no opinions, so only crowding counts.
        assert!(close(breakdown.biome, 1.0));
        assert!(close(breakdown.space, 1.04));
        assert!(close(breakdown.neighbours, 1.0));
        assert!(close(breakdown.score, 1.04));
    }

    #[test]
    fn exactly_three_others_is_neutral_space() {
        assert!(close(space_multiplier(false, 3, &ScoringConfig::default()), 1.0));
        assert!(close(space_multiplier(false, 2, &ScoringConfig::default()), 0.95));
        assert!(close(space_multiplier(false, 5, &ScoringConfig::default()), 1.04 * 1.04));
    }

    #[test]
    fn solitary_npc_alone_is_clamped_to_max() {
        let catalog = Catalog::standard();
        let placement = village(Biome::GlowingMushroom, &[NpcName::Truffle]);
        let breakdown =
            evaluate_with(NpcName::Truffle, &placement, &catalog, &ScoringConfig::default())
                .expect("placed");
        assert!(close(breakdown.space, 1000.0));
        assert!(close(breakdown.score, 1.5));
    }

    #[test]
    fn solitary_npc_loves_every_neighbour() {
        let catalog = Catalog::standard();
        let placement = village(
            Biome::GlowingMushroom,
            &[NpcName::Truffle, NpcName::Guide, NpcName::Merchant, NpcName::Nurse],
        );
        let breakdown =
            evaluate_with(NpcName::Truffle, &placement, &catalog, &ScoringConfig::default())
                .expect("placed");
        assert!(close(breakdown.space, 1.0));
        assert!(close(breakdown.neighbours, 0.88 * 0.88 * 0.88));
        assert!(close(breakdown.score, 0.75));
    }

    #[test]
    fn every_neighbour_loves_the_solitary_npc() {
        let catalog = Catalog::standard();
        let mut placement = village(Biome::GlowingMushroom, &[NpcName::Truffle]);
        placement
            .move_npc(
                NpcName::Guide,
                Biome::GlowingMushroom,
                crate::types::VillageSlot::Existing(0),
                &catalog,
            )
            .expect("move");
        let breakdown =
            evaluate_with(NpcName::Guide, &placement, &catalog, &ScoringConfig::default())
                .expect("placed");
        assert!(close(breakdown.neighbours, 0.88));
    }

    #[test]
    fn hated_neighbour_and_biome() {
        let catalog = Catalog::standard();
        let record = catalog.by_name(NpcName::Angler).expect("angler");
        let hated_biome = record.biome_hate.expect("angler hates a biome");
        let hated = record.hates[0];

        let placement = village(hated_biome, &[NpcName::Angler, hated]);
        let breakdown =
            evaluate_with(NpcName::Angler, &placement, &catalog, &ScoringConfig::default())
                .expect("placed");
        assert!(close(breakdown.biome, 1.12));
        assert!(close(breakdown.neighbours, 1.12));
        assert!(close(breakdown.raw, 1.12 * 0.95 * 1.12));
        assert!(close(breakdown.score, 1.19));
    }

    #[test]
    fn score_is_clamped_and_rounded() {
        let catalog = Catalog::standard();
        let placement = village(
            Biome::Forest,
            &[
                NpcName::Guide,
                NpcName::Merchant,
                NpcName::Nurse,
                NpcName::Painter,
                NpcName::Golfer,
            ],
        );
        for (npc, score) in evaluate_all(&placement, &catalog) {
            assert!((0.75..=1.5).contains(&score), "{npc}: {score}");
            assert!(close(score, round_hundredth(score)), "{npc}: {score}");
        }
    }

    #[test]
    fn evaluate_all_follows_placement_order() {
        let catalog = Catalog::standard();
        let placement = Placement::from_villages([
            (Biome::Snow, vec![vec![NpcName::SantaClaus]]),
            (Biome::Forest, vec![vec![NpcName::Guide]]),
        ])
        .expect("valid");
        let names: Vec<_> = evaluate_all(&placement, &catalog)
            .into_iter()
            .map(|(npc, _)| npc)
            .collect();
        assert_eq!(names, vec![NpcName::Guide, NpcName::SantaClaus]);
    }

    #[test]
    fn custom_constants_change_the_score() {
        let catalog = Catalog::standard();
        let placement = village(Biome::Snow, &[NpcName::SantaClaus]);
        let scoring = ScoringConfig {
            small_village_multiplier: 1.0,
            ..ScoringConfig::default()
        };
        let breakdown =
            evaluate_with(NpcName::SantaClaus, &placement, &catalog, &scoring).expect("placed");
        assert!(close(breakdown.score, 0.88));
    }

    #[test]
    fn percent_rounds_to_whole_number() {
        assert_eq!(as_percent(0.84), 84);
        assert_eq!(as_percent(1.5), 150);
        assert_eq!(as_percent(1.07), 107);
    }
}
