//! Planner session: the owned state a front end drives.
//!
//! A [`Planner`] holds the catalog, the current placement and the snapshot
//! store. Every accepted change is persisted immediately; rejected commands
//! leave both memory and storage untouched.

use tracing::info;

use crate::catalog::Catalog;
use crate::command::{Command, Effect, Transition, transition};
use crate::config::{HousingConfig, ScoringConfig};
use crate::error::Result;
use crate::happiness::{HappinessBreakdown, evaluate_with};
use crate::metrics::PlannerCounters;
use crate::persistence::{LoadedPlacement, SnapshotStore, recover_placement, save_placement};
use crate::placement::{self, Placement};
use crate::types::{Biome, Location, NpcName, VillageSlot};

/// A housing session over a snapshot store.
#[derive(Debug)]
pub struct Planner<S> {
    catalog: Catalog,
    placement: Placement,
    store: S,
    storage_key: String,
    scoring: ScoringConfig,
    counters: PlannerCounters,
}

impl<S: SnapshotStore> Planner<S> {
    /// Open a session with the standard catalog, loading the stored
    /// placement (or starting empty).
    #[must_use]
    pub fn open(store: S, config: &HousingConfig) -> Self {
        Self::with_catalog(store, Catalog::standard(), config)
    }

    /// Open a session with a custom catalog.
    #[must_use]
    pub fn with_catalog(store: S, catalog: Catalog, config: &HousingConfig) -> Self {
        let storage_key = config.persistence.storage_key.clone();
        let counters = PlannerCounters::new();

        let LoadedPlacement {
            placement,
            recovered,
        } = recover_placement(&store, &storage_key);
        if recovered {
            PlannerCounters::bump(&counters.snapshot_recoveries);
        }

        info!(
            key = %storage_key,
            housed = placement.housed_count(),
            "Planner opened"
        );

        Self {
            catalog,
            placement,
            store,
            storage_key,
            scoring: config.scoring.clone(),
            counters,
        }
    }

    /// Apply `command`, persisting the result if it changed anything.
    ///
    /// A reset is always written, so it also overwrites a snapshot that was
    /// discarded at startup.
    ///
    /// # Errors
    ///
    /// Rejections from [`Placement::move_npc`] leave everything untouched.
    /// A storage failure is returned after the in-memory change has been
    /// applied; the next successful write persists it.
    pub fn dispatch(&mut self, command: Command) -> Result<Effect> {
        let Transition { placement, effect } =
            match transition(&self.placement, &command, &self.catalog) {
                Ok(transition) => transition,
                Err(e) => {
                    PlannerCounters::bump(&self.counters.moves_rejected);
                    return Err(e);
                }
            };

        match effect {
            Effect::Moved { .. } => PlannerCounters::bump(&self.counters.moves_applied),
            Effect::Removed { .. } => PlannerCounters::bump(&self.counters.removals),
            Effect::Reset => {
                info!("Placement reset");
                PlannerCounters::bump(&self.counters.resets);
            }
            Effect::Unchanged if matches!(command, Command::Reset) => {}
            Effect::Unchanged => return Ok(effect),
        }

        self.placement = placement;
        self.persist()?;
        Ok(effect)
    }

    /// Move `npc` into `slot` of `biome`.
    ///
    /// # Errors
    ///
    /// See [`Planner::dispatch`].
    pub fn move_npc(&mut self, npc: NpcName, biome: Biome, slot: VillageSlot) -> Result<Effect> {
        self.dispatch(Command::Move { npc, biome, slot })
    }

    /// Unplace `npc`.
    ///
    /// # Errors
    ///
    /// See [`Planner::dispatch`].
    pub fn remove(&mut self, npc: NpcName) -> Result<Effect> {
        self.dispatch(Command::Remove { npc })
    }

    /// Empty every biome and overwrite the stored snapshot.
    ///
    /// # Errors
    ///
    /// See [`Planner::dispatch`].
    pub fn reset(&mut self) -> Result<Effect> {
        self.dispatch(Command::Reset)
    }

    /// Where `npc` lives.
    #[must_use]
    pub fn locate(&self, npc: NpcName) -> Option<Location> {
        placement::locate(npc, &self.placement)
    }

    /// `npc`'s score, or `None` if it is not housed.
    #[must_use]
    pub fn evaluate(&self, npc: NpcName) -> Option<f64> {
        self.breakdown(npc).map(|b| b.score)
    }

    /// `npc`'s score with every factor.
    #[must_use]
    pub fn breakdown(&self, npc: NpcName) -> Option<HappinessBreakdown> {
        evaluate_with(npc, &self.placement, &self.catalog, &self.scoring)
    }

    /// Scores of every housed NPC, in biome then village order.
    #[must_use]
    pub fn scores(&self) -> Vec<(NpcName, f64)> {
        self.placement
            .residents()
            .filter_map(|(npc, _)| self.evaluate(npc).map(|score| (npc, score)))
            .collect()
    }

    /// NPCs not housed anywhere, in catalog order.
    #[must_use]
    pub fn unplaced(&self) -> Vec<NpcName> {
        placement::unplaced(&self.placement, &self.catalog)
    }

    /// The current placement.
    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// The affinity catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Session counters.
    #[must_use]
    pub fn counters(&self) -> &PlannerCounters {
        &self.counters
    }

    /// The snapshot store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self) -> Result<()> {
        save_placement(&self.store, &self.storage_key, &self.placement)?;
        PlannerCounters::bump(&self.counters.saves_completed);
        Ok(())
    }
}
