//! # Housing Core Library
//!
//! Planning core for town NPC housing: who lives in which village of which
//! biome, and how happy that makes them.
//!
//! - **Catalog** ([`catalog`]): static biome and neighbour opinions per NPC
//! - **Placement** ([`placement`]): the biome → villages → residents
//!   mapping, with move/remove/reset and village pruning
//! - **Happiness** ([`happiness`]): the price-ratio score of a housed NPC
//! - **Persistence** ([`persistence`]): JSON snapshots in SQLite or memory,
//!   falling back to an empty town when a snapshot is unusable
//! - **Planner** ([`planner`]): an owned session tying it all together
//!
//! ## Invariants
//!
//! - An NPC lives in at most one village across the whole mapping.
//! - Every biome always has at least one (possibly empty) village.
//! - Repeating a move leaves the mapping unchanged.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod happiness;
pub mod metrics;
pub mod persistence;
pub mod placement;
pub mod planner;
pub mod types;

pub use catalog::Catalog;
pub use command::{Command, Effect};
pub use config::HousingConfig;
pub use error::HousingError;
pub use happiness::{as_percent, evaluate};
pub use placement::{Placement, Village, locate};
pub use planner::Planner;
pub use types::*;
