use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use sled::IVec;

use crate::game::errors::GameError;
use crate::game::types::{
    Difficulty, PlayerProgress, TutorialState, PROGRESS_SCHEMA_VERSION, SNAPSHOT_SCHEMA_VERSION,
};

const TREE_SAVES: &str = "saves";
const SAVE_PREFIX: &str = "saves:";

/// The persisted slice of a session: progress plus settings. The tutorial is
/// always stored inactive so it never resumes mid-step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveSnapshot {
    pub schema_version: u8,
    pub saved_at: DateTime<Utc>,
    pub progress: PlayerProgress,
    pub difficulty: Difficulty,
    pub tutorial: TutorialState,
}

impl SaveSnapshot {
    pub fn new(progress: PlayerProgress, difficulty: Difficulty, tutorial: TutorialState) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            progress,
            difficulty,
            tutorial: TutorialState {
                is_active: false,
                ..tutorial
            },
        }
    }
}

/// Where the engine reads and writes save snapshots.
pub trait SnapshotStore {
    fn put_snapshot(&self, snapshot: SaveSnapshot) -> Result<(), GameError>;

    /// `NotFound` when the player has no save.
    fn get_snapshot(&self, player_id: &str) -> Result<SaveSnapshot, GameError>;
}

impl SnapshotStore for SaveStore {
    fn put_snapshot(&self, snapshot: SaveSnapshot) -> Result<(), GameError> {
        SaveStore::put_snapshot(self, snapshot)
    }

    fn get_snapshot(&self, player_id: &str) -> Result<SaveSnapshot, GameError> {
        SaveStore::get_snapshot(self, player_id)
    }
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct SaveStoreBuilder {
    path: PathBuf,
    flush_on_write: bool,
}

impl SaveStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            flush_on_write: true,
        }
    }

    /// Skip the fsync after each write (useful for tests that write a lot).
    pub fn without_flush(mut self) -> Self {
        self.flush_on_write = false;
        self
    }

    pub fn open(self) -> Result<SaveStore, GameError> {
        SaveStore::open_with_options(self.path, self.flush_on_write)
    }
}

/// Sled-backed save slots, one per player id.
pub struct SaveStore {
    _db: sled::Db,
    saves: sled::Tree,
    flush_on_write: bool,
}

impl SaveStore {
    /// Open (or create) the save database rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        Self::open_with_options(path, true)
    }

    fn open_with_options<P: AsRef<Path>>(path: P, flush_on_write: bool) -> Result<Self, GameError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let saves = db.open_tree(TREE_SAVES)?;
        debug!("opened save store at {}", path_ref.display());
        Ok(Self {
            _db: db,
            saves,
            flush_on_write,
        })
    }

    fn save_key(player_id: &str) -> Vec<u8> {
        format!("{}{}", SAVE_PREFIX, player_id.to_ascii_lowercase()).into_bytes()
    }

    fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, GameError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, GameError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    /// Insert or replace a player's snapshot.
    pub fn put_snapshot(&self, mut snapshot: SaveSnapshot) -> Result<(), GameError> {
        snapshot.schema_version = SNAPSHOT_SCHEMA_VERSION;
        snapshot.progress.schema_version = PROGRESS_SCHEMA_VERSION;
        snapshot.tutorial.is_active = false;
        snapshot.saved_at = Utc::now();
        let key = Self::save_key(&snapshot.progress.id);
        let bytes = Self::serialize(&snapshot)?;
        self.saves.insert(key, bytes)?;
        if self.flush_on_write {
            self.saves.flush()?;
        }
        Ok(())
    }

    /// Fetch a player's snapshot by id.
    pub fn get_snapshot(&self, player_id: &str) -> Result<SaveSnapshot, GameError> {
        let key = Self::save_key(player_id);
        let Some(bytes) = self.saves.get(&key)? else {
            return Err(GameError::not_found("save", player_id));
        };
        let record: SaveSnapshot = Self::deserialize(bytes)?;
        if record.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "snapshot",
                expected: SNAPSHOT_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        if record.progress.schema_version != PROGRESS_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "progress",
                expected: PROGRESS_SCHEMA_VERSION,
                found: record.progress.schema_version,
            });
        }
        Ok(record)
    }

    /// Remove a player's snapshot. Returns `true` when one existed.
    pub fn delete_snapshot(&self, player_id: &str) -> Result<bool, GameError> {
        let removed = self.saves.remove(Self::save_key(player_id))?;
        if self.flush_on_write {
            self.saves.flush()?;
        }
        Ok(removed.is_some())
    }

    /// List all player ids that have a snapshot.
    pub fn list_player_ids(&self) -> Result<Vec<String>, GameError> {
        let mut ids = Vec::new();
        for entry in self.saves.scan_prefix(SAVE_PREFIX.as_bytes()) {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(player_id) = text.strip_prefix(SAVE_PREFIX) {
                ids.push(player_id.to_string());
            }
        }
        Ok(ids)
    }
}
