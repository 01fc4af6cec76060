//! Configuration for the housing planner.
//!
//! Maps directly to `housing.toml`. Every field has a default, so an empty
//! file (or no file at all) reproduces the in-game rules.

use serde::{Deserialize, Serialize};

use crate::error::HousingError;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HousingConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Snapshot storage settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Happiness scoring constants.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl HousingConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `HousingError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| HousingError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Snapshot storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Backend: "sqlite" or "memory" (nothing survives the process).
    #[serde(default = "default_sqlite")]
    pub backend: String,
    /// Database file for the sqlite backend.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Key the placement snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Use WAL journaling.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
    /// Store and verify a CRC-32 alongside each snapshot.
    #[serde(default = "default_true")]
    pub checksum_enabled: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: default_sqlite(),
            path: default_db_path(),
            storage_key: default_storage_key(),
            wal_mode: true,
            checksum_enabled: true,
        }
    }
}

/// Constants of the happiness formula.
///
/// Biome and neighbour multipliers are fixed per opinion tier (see
/// [`crate::types::Opinion::multiplier`]); the rest is tunable here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Space multiplier for a village with fewer than `crowd_threshold`
    /// other residents.
    #[serde(default = "default_small_village")]
    pub small_village_multiplier: f64,
    /// Number of other residents at which crowding starts to count.
    #[serde(default = "default_crowd_threshold")]
    pub crowd_threshold: usize,
    /// Compounding penalty per resident beyond `crowd_threshold`.
    #[serde(default = "default_crowd_multiplier")]
    pub crowd_multiplier: f64,
    /// Company the solitary NPC needs before it stops sulking.
    #[serde(default = "default_solitary_min_company")]
    pub solitary_min_company: usize,
    /// Space multiplier for the solitary NPC with too little company.
    #[serde(default = "default_solitary_penalty")]
    pub solitary_penalty: f64,
    /// Lower clamp bound for a score.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Upper clamp bound for a score.
    #[serde(default = "default_max_score")]
    pub max_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            small_village_multiplier: 0.95,
            crowd_threshold: 3,
            crowd_multiplier: 1.04,
            solitary_min_company: 2,
            solitary_penalty: 1000.0,
            min_score: 0.75,
            max_score: 1.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value helpers (serde requires functions)
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_sqlite() -> String { "sqlite".to_string() }
fn default_db_path() -> String { "housing.db".to_string() }
fn default_storage_key() -> String { crate::persistence::DEFAULT_STORAGE_KEY.to_string() }
fn default_small_village() -> f64 { 0.95 }
fn default_crowd_threshold() -> usize { 3 }
fn default_crowd_multiplier() -> f64 { 1.04 }
fn default_solitary_min_company() -> usize { 2 }
fn default_solitary_penalty() -> f64 { 1000.0 }
fn default_min_score() -> f64 { 0.75 }
fn default_max_score() -> f64 { 1.5 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = HousingConfig::from_toml("").expect("parse");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.persistence.backend, "sqlite");
        assert_eq!(config.persistence.storage_key, "biomeState");
        assert!(config.persistence.wal_mode);
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = HousingConfig::from_toml(
            r#"
            [persistence]
            backend = "memory"

            [scoring]
            crowd_threshold = 4
            "#,
        )
        .expect("parse");
        assert_eq!(config.persistence.backend, "memory");
        assert_eq!(config.persistence.path, "housing.db");
        assert_eq!(config.scoring.crowd_threshold, 4);
        assert!((config.scoring.crowd_multiplier - 1.04).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = HousingConfig::from_toml("[scoring\nmin_score = ").expect_err("invalid");
        assert!(matches!(err, HousingError::Config(_)));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("housing.toml");
        std::fs::write(&path, "[general]\nlog_level = \"debug\"\n").expect("write");

        let config = HousingConfig::from_file(&path).expect("load");
        assert_eq!(config.general.log_level, "debug");
    }
}
