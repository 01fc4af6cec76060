//! Command-line host for the housing planner.
//!
//! Each invocation opens the stored town, applies at most one change and
//! prints the result. Run with: `housing <command>`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use housing_core::persistence::{MemorySnapshotStore, SnapshotStore, SqliteSnapshotStore};
use housing_core::{
    Biome, Effect, HousingConfig, NpcName, Placement, Planner, VillageSlot, as_percent,
};
use tracing_subscriber::EnvFilter;

/// Plan which NPCs live together in which biome
#[derive(Parser)]
#[command(name = "housing")]
#[command(about = "Town NPC housing planner", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding the configured path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Move an NPC into a village
    Move {
        /// NPC name, e.g. "Arms Dealer" or arms_dealer
        npc: NpcName,
        /// Destination biome
        biome: Biome,
        /// Index of an existing village in the biome
        #[arg(long, conflicts_with = "new")]
        village: Option<usize>,
        /// Start a new village instead
        #[arg(long)]
        new: bool,
    },

    /// Unplace an NPC
    Remove {
        /// NPC name
        npc: NpcName,
    },

    /// Empty every biome
    Reset,

    /// Print every biome's villages with scores
    Show,

    /// Print one NPC's score and its factors
    Score {
        /// NPC name
        npc: NpcName,
    },

    /// List NPCs that are not housed
    Roster,

    /// Print an NPC's biome and neighbour opinions
    Info {
        /// NPC name
        npc: NpcName,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HousingConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => HousingConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.persistence.path = db.display().to_string();
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = open_store(&config)?;
    let mut planner = Planner::open(store, &config);
    let code = run(cli.command, &mut planner)?;

    tracing::debug!(counters = ?planner.counters().snapshot(), "Session finished");
    Ok(code)
}

fn open_store(config: &HousingConfig) -> Result<Box<dyn SnapshotStore>> {
    let persistence = &config.persistence;
    match persistence.backend.as_str() {
        "sqlite" => {
            let store = SqliteSnapshotStore::open(&persistence.path, persistence)
                .with_context(|| format!("opening database {}", persistence.path))?;
            Ok(Box::new(store))
        }
        "memory" => Ok(Box::new(MemorySnapshotStore::new())),
        other => anyhow::bail!("unknown persistence backend `{other}` (expected sqlite or memory)"),
    }
}

fn run(command: Command, planner: &mut Planner<Box<dyn SnapshotStore>>) -> Result<ExitCode> {
    match command {
        Command::Move {
            npc,
            biome,
            village,
            new,
        } => {
            let slot = if new {
                VillageSlot::New
            } else {
                VillageSlot::Existing(village.unwrap_or(0))
            };
            match planner.move_npc(npc, biome, slot) {
                Ok(effect) => report(&effect, planner),
                Err(e) if e.is_disallowed() => {
                    println!("this placement is not allowed");
                    return Ok(ExitCode::from(2));
                }
                Err(e) => return Err(e).context("moving NPC"),
            }
        }
        Command::Remove { npc } => {
            let effect = planner.remove(npc).context("removing NPC")?;
            report(&effect, planner);
        }
        Command::Reset => {
            planner.reset().context("resetting placement")?;
            println!("All biomes emptied");
        }
        Command::Show => show(planner.placement(), planner),
        Command::Score { npc } => match planner.breakdown(npc) {
            Some(b) => {
                println!("{npc}: {}%", as_percent(b.score));
                println!("  biome      x{:.2}", b.biome);
                println!("  space      x{:.2}", b.space);
                println!("  neighbours x{:.4}", b.neighbours);
                println!("  raw         {:.4}", b.raw);
            }
            None => println!("{npc} is not housed"),
        },
        Command::Roster => {
            let roster = planner.unplaced();
            if roster.is_empty() {
                println!("Everyone is housed");
            }
            for npc in roster {
                println!("{npc}");
            }
        }
        Command::Info { npc } => {
            let Some(record) = planner.catalog().by_name(npc) else {
                anyhow::bail!("{npc} is not in the catalog");
            };
            let profile = record.profile();
            println!("{}", profile.name);
            for (opinion, biome) in &profile.biomes {
                println!("  {opinion:<8} {biome}");
            }
            for (opinion, names) in &profile.neighbours {
                let names: Vec<String> = names.iter().map(ToString::to_string).collect();
                println!("  {opinion:<8} {}", names.join(", "));
            }
            if planner.catalog().is_solitary(npc) {
                println!("  Lives only in {} and loves everyone", planner.catalog().solitary().home);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn report(effect: &Effect, planner: &Planner<Box<dyn SnapshotStore>>) {
    match *effect {
        Effect::Moved { npc, to, .. } => {
            let score = planner.evaluate(npc).map_or(0, as_percent);
            println!("{npc} now lives in {to} ({score}%)");
        }
        Effect::Removed { npc, from } => println!("{npc} moved out of {from}"),
        Effect::Reset => println!("All biomes emptied"),
        Effect::Unchanged => println!("Nothing changed"),
    }
}

fn show(placement: &Placement, planner: &Planner<Box<dyn SnapshotStore>>) {
    for biome in Biome::ALL {
        println!("{biome}");
        for (index, village) in placement.villages(biome).iter().enumerate() {
            if village.is_empty() {
                println!("  [{index}] (empty)");
                continue;
            }
            let residents: Vec<String> = village
                .residents()
                .iter()
                .map(|&npc| {
                    let score = planner.evaluate(npc).map_or(0, as_percent);
                    format!("{npc} ({score}%)")
                })
                .collect();
            println!("  [{index}] {}", residents.join(", "));
        }
    }
}
