//! Entity store with durable snapshot persistence.
//!
//! All tracked records live in a single `StoreData` snapshot that is
//! loaded at open and atomically rewritten after every mutating
//! operation. Writes go through a temp file with exclusive locking so a
//! crash mid-save never leaves a torn snapshot. Weight logs are kept
//! out of the snapshot in an append-only JSONL file (see `weight.rs`).
//!
//! The store is single-writer by design: each operation is an
//! independent unit of work and every read reflects the latest
//! committed write.

use crate::{Error, Result};
use crate::types::*;
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Snapshot of all record collections, serialized as one JSON document.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub plans: Vec<WorkoutPlan>,
    #[serde(default)]
    pub plan_exercises: Vec<WorkoutPlanExercise>,
    #[serde(default)]
    pub sessions: Vec<WorkoutSession>,
    #[serde(default)]
    pub exercise_logs: Vec<ExerciseLog>,
}

/// The entity store. Owns the canonical records and the data directory
/// they persist to.
pub struct Store {
    snapshot_path: PathBuf,
    weights_path: PathBuf,
    pub(crate) data: StoreData,
}

impl Store {
    /// Open the store rooted at the given data directory.
    ///
    /// A missing snapshot starts empty; a snapshot that exists but does
    /// not parse is a hard error, never silently replaced.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let snapshot_path = data_dir.join("store.json");
        let weights_path = data_dir.join("weight_logs.jsonl");

        let data = if snapshot_path.exists() {
            Self::read_snapshot(&snapshot_path)?
        } else {
            tracing::info!("No store snapshot at {:?}, starting empty", snapshot_path);
            StoreData::default()
        };

        Ok(Store {
            snapshot_path,
            weights_path,
            data,
        })
    }

    pub(crate) fn weights_path(&self) -> &Path {
        &self.weights_path
    }

    fn read_snapshot(path: &Path) -> Result<StoreData> {
        let file = File::open(path)?;

        // Shared lock for reading
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        let data: StoreData = serde_json::from_str(&contents)?;
        tracing::debug!(
            "Loaded store snapshot from {:?} ({} users, {} sessions)",
            path,
            data.users.len(),
            data.sessions.len()
        );
        Ok(data)
    }

    /// Persist the current snapshot atomically:
    /// 1. Write to a temp file in the same directory
    /// 2. Sync to disk
    /// 3. Rename over the original
    pub(crate) fn save(&self) -> Result<()> {
        if let Some(parent) = self.snapshot_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(self.snapshot_path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        // Exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(&self.data)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.snapshot_path)
            .map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved store snapshot to {:?}", self.snapshot_path);
        Ok(())
    }

    /// Generate a fresh record id.
    pub(crate) fn new_id() -> Uuid {
        Uuid::new_v4()
    }
}
