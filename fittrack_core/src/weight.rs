//! Append-only body-weight history.
//!
//! Weight logs are appended to a JSONL (JSON Lines) file with file
//! locking, never updated in place. Reads tolerate individual corrupt
//! lines rather than failing the whole history.

use crate::store::Store;
use crate::types::{NewWeightLog, WeightLog};
use crate::{Error, Result};
use chrono::Utc;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use uuid::Uuid;

impl Store {
    /// Record a weight measurement. `date` defaults to now.
    pub fn create_weight_log(&mut self, new: NewWeightLog) -> Result<WeightLog> {
        self.find_user(new.user_id)?;

        if new.weight <= 0.0 {
            return Err(Error::Validation(format!(
                "weight must be positive, got {}",
                new.weight
            )));
        }

        let log = WeightLog {
            id: Self::new_id(),
            user_id: new.user_id,
            weight: new.weight,
            date: new.date.unwrap_or_else(Utc::now),
            notes: new.notes,
        };

        append_log(self.weights_path(), &log)?;

        tracing::debug!("Appended weight log {} for user {}", log.id, log.user_id);
        Ok(log)
    }

    /// List a user's weight logs ordered by date descending (newest
    /// first).
    pub fn weight_logs_for_user(&self, user_id: Uuid) -> Result<Vec<WeightLog>> {
        self.find_user(user_id)?;

        let mut logs: Vec<WeightLog> = read_logs(self.weights_path())?
            .into_iter()
            .filter(|l| l.user_id == user_id)
            .collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(logs)
    }
}

fn append_log(path: &Path, log: &WeightLog) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // Exclusive lock while appending
    file.lock_exclusive()?;

    let mut writer = std::io::BufWriter::new(&file);
    let line = serde_json::to_string(log)?;
    let write_result = writer
        .write_all(line.as_bytes())
        .and_then(|_| writer.write_all(b"\n"))
        .and_then(|_| writer.flush());
    drop(writer);

    file.unlock()?;
    write_result?;
    Ok(())
}

fn read_logs(path: &Path) -> Result<Vec<WeightLog>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut logs = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(line) => line,
            Err(e) => {
                file.unlock()?;
                return Err(e.into());
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WeightLog>(&line) {
            Ok(log) => logs.push(log),
            Err(e) => {
                tracing::warn!("Failed to parse weight log at line {}: {}", line_num + 1, e);
                // Keep reading, one bad line does not lose the history
            }
        }
    }

    file.unlock()?;
    Ok(logs)
}
