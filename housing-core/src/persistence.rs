//! Snapshot persistence for the placement mapping.
//!
//! The whole mapping is serialised to JSON and stored under one fixed key.
//! The backing store is injected through [`SnapshotStore`]; the SQLite
//! implementation uses this schema:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS snapshots (
//!     key        TEXT PRIMARY KEY,
//!     data       BLOB NOT NULL,
//!     updated_at TEXT NOT NULL,
//!     checksum   TEXT
//! );
//! ```
//!
//! Loading never fails: an absent, unreadable or invalid snapshot yields
//! the empty placement.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use tracing::{debug, info, warn};

use crate::config::PersistenceConfig;
use crate::error::{HousingError, Result};
use crate::placement::Placement;

/// Key the placement snapshot lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "biomeState";

// ---------------------------------------------------------------------------
// CRC-32 checksum helper
// ---------------------------------------------------------------------------

fn crc32_hex(data: &[u8]) -> String {
    format!("{:08x}", crc32_compute(data))
}

/// CRC-32 (ISO 3309 / ITU-T V.42).
fn crc32_compute(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            if crc & 1 == 1 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }
    !crc
}

// ---------------------------------------------------------------------------
// Store abstraction
// ---------------------------------------------------------------------------

/// Durable key-value storage for serialized snapshots.
pub trait SnapshotStore {
    /// Bytes stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `data` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Delete `key`. Returns `true` if something was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn clear(&self, key: &str) -> Result<bool>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, data: &[u8]) -> Result<()> {
        (**self).save(key, data)
    }

    fn clear(&self, key: &str) -> Result<bool> {
        (**self).clear(key)
    }
}

/// A loaded placement and whether an unusable snapshot was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPlacement {
    /// The stored placement, or the empty one.
    pub placement: Placement,
    /// `true` if a snapshot existed but could not be used.
    pub recovered: bool,
}

/// Load the placement stored under `key`.
///
/// Falls back to [`Placement::empty`] when nothing is stored, when the
/// store fails, or when the snapshot does not decode to a valid mapping.
/// The latter two are logged.
#[must_use]
pub fn load_placement(store: &dyn SnapshotStore, key: &str) -> Placement {
    recover_placement(store, key).placement
}

/// Like [`load_placement`], but also reports whether the stored snapshot
/// was discarded.
#[must_use]
pub fn recover_placement(store: &dyn SnapshotStore, key: &str) -> LoadedPlacement {
    match try_load_placement(store, key) {
        Ok(Some(placement)) => LoadedPlacement {
            placement,
            recovered: false,
        },
        Ok(None) => {
            debug!(key, "No stored placement, starting empty");
            LoadedPlacement {
                placement: Placement::empty(),
                recovered: false,
            }
        }
        Err(e) => {
            warn!(key, error = %e, "Discarding stored placement, starting empty");
            LoadedPlacement {
                placement: Placement::empty(),
                recovered: true,
            }
        }
    }
}

/// Load the placement stored under `key`, reporting why it is unusable.
///
/// # Errors
///
/// Returns the store's error, [`HousingError::Serialization`] for bad JSON,
/// or [`HousingError::Corrupted`] if the decoded mapping breaks an
/// invariant.
pub fn try_load_placement(store: &dyn SnapshotStore, key: &str) -> Result<Option<Placement>> {
    let Some(data) = store.load(key)? else {
        return Ok(None);
    };
    let placement: Placement =
        serde_json::from_slice(&data).map_err(|e| HousingError::Serialization(e.to_string()))?;
    placement.check_invariants()?;
    Ok(Some(placement))
}

/// Serialize `placement` and store it under `key`.
///
/// # Errors
///
/// Returns [`HousingError::Serialization`] if encoding fails, or the
/// store's error.
pub fn save_placement(store: &dyn SnapshotStore, key: &str, placement: &Placement) -> Result<()> {
    let json = serde_json::to_vec(placement).map_err(|e| HousingError::Serialization(e.to_string()))?;
    store.save(key, &json)?;
    debug!(key, housed = placement.housed_count(), bytes = json.len(), "Saved placement");
    Ok(())
}

// ---------------------------------------------------------------------------
// SqliteSnapshotStore
// ---------------------------------------------------------------------------

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS snapshots (
    key        TEXT PRIMARY KEY,
    data       BLOB NOT NULL,
    updated_at TEXT NOT NULL,
    checksum   TEXT
);";

/// Snapshot store backed by an SQLite database.
///
/// ```no_run
/// # use housing_core::persistence::{SqliteSnapshotStore, load_placement};
/// # use housing_core::config::PersistenceConfig;
/// let store = SqliteSnapshotStore::open("housing.db", &PersistenceConfig::default())?;
/// let placement = load_placement(&store, "biomeState");
/// # Ok::<(), housing_core::error::HousingError>(())
/// ```
pub struct SqliteSnapshotStore {
    conn: Connection,
    config: PersistenceConfig,
    db_path: PathBuf,
}

impl std::fmt::Debug for SqliteSnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSnapshotStore")
            .field("db_path", &self.db_path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SqliteSnapshotStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HousingError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &PersistenceConfig) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&db_path, flags)?;
        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        info!(
            path = %db_path.display(),
            wal = config.wal_mode,
            "Snapshot store opened"
        );

        Ok(Self {
            conn,
            config: config.clone(),
            db_path,
        })
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`HousingError::Database`] on SQLite failures.
    pub fn open_in_memory(config: &PersistenceConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            config: config.clone(),
            db_path: PathBuf::from(":memory:"),
        })
    }

    /// Copy the database to `dest_path` with SQLite's online-backup API.
    ///
    /// # Errors
    ///
    /// Returns [`HousingError::Database`] on SQLite failures.
    pub fn backup<P: AsRef<Path>>(&self, dest_path: P) -> Result<()> {
        let start = Instant::now();
        let mut dest = Connection::open(dest_path.as_ref())?;
        let backup = rusqlite::backup::Backup::new(&self.conn, &mut dest)?;
        backup.run_to_completion(256, std::time::Duration::from_millis(50), None)?;

        info!(
            dest = %dest_path.as_ref().display(),
            elapsed_ms = start.elapsed().as_millis(),
            "Snapshot backup completed"
        );
        Ok(())
    }

    /// `true` if `PRAGMA integrity_check` reports no corruption.
    ///
    /// # Errors
    ///
    /// Returns [`HousingError::Database`] if the check itself fails.
    pub fn integrity_check(&self) -> Result<bool> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        Ok(result == "ok")
    }

    /// Path to the database file (or `:memory:`).
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let start = Instant::now();
        let mut stmt = self
            .conn
            .prepare_cached("SELECT data, checksum FROM snapshots WHERE key = ?1")?;
        let row: Option<(Vec<u8>, Option<String>)> = stmt
            .query_row(params![key], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        let Some((data, stored_checksum)) = row else {
            return Ok(None);
        };

        if self.config.checksum_enabled {
            if let Some(expected) = stored_checksum {
                let actual = crc32_hex(&data);
                if expected != actual {
                    warn!(
                        key,
                        expected = %expected,
                        actual = %actual,
                        "Checksum mismatch, snapshot may be corrupted"
                    );
                }
            }
        }

        debug!(
            key,
            bytes = data.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Loaded snapshot"
        );
        Ok(Some(data))
    }

    fn save(&self, key: &str, data: &[u8]) -> Result<()> {
        let checksum = self.config.checksum_enabled.then(|| crc32_hex(data));
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO snapshots (key, data, updated_at, checksum)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at,
                checksum = excluded.checksum",
            params![key, data, now, checksum],
        )?;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM snapshots WHERE key = ?1", params![key])?;
        Ok(deleted > 0)
    }
}

// ---------------------------------------------------------------------------
// MemorySnapshotStore
// ---------------------------------------------------------------------------

/// Snapshot store that lives only as long as the process.
///
/// Clones share the same underlying map, so a test can keep a handle and
/// inspect what a planner wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemorySnapshotStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn save(&self, key: &str, data: &[u8]) -> Result<()> {
        self.entries.lock().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().remove(key).is_some())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
