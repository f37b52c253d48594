//! CSV export of a user's training and weight history.
//!
//! Exports are plain CSV files intended for spreadsheets or other
//! tools. Each export writes headers, flushes, and syncs to disk
//! before reporting the row count.

use crate::store::Store;
use crate::Result;
use std::path::Path;
use uuid::Uuid;

/// A session row in the CSV output
#[derive(Debug, serde::Serialize)]
struct SessionRow {
    id: String,
    name: String,
    start_time: String,
    end_time: Option<String>,
    is_completed: bool,
    exercises_logged: usize,
    exercises_completed: usize,
    notes: Option<String>,
}

/// A weight row in the CSV output
#[derive(Debug, serde::Serialize)]
struct WeightRow {
    date: String,
    weight_kg: f64,
    notes: Option<String>,
}

impl Store {
    /// Export a user's sessions (newest first) with per-session log
    /// completion counts. Returns the number of rows written.
    pub fn export_sessions_csv(&self, user_id: Uuid, path: &Path) -> Result<usize> {
        self.find_user(user_id)?;

        let sessions = self.sessions_for_user(user_id);
        let mut writer = csv::Writer::from_path(path)?;

        for session in &sessions {
            let logs = self.session_logs(session.id)?;
            writer.serialize(SessionRow {
                id: session.id.to_string(),
                name: session.name.clone(),
                start_time: session.start_time.to_rfc3339(),
                end_time: session.end_time.map(|t| t.to_rfc3339()),
                is_completed: session.is_completed,
                exercises_logged: logs.len(),
                exercises_completed: logs.iter().filter(|l| l.is_completed).count(),
                notes: session.notes.clone(),
            })?;
        }

        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        file.sync_all()?;

        tracing::info!("Exported {} sessions to {:?}", sessions.len(), path);
        Ok(sessions.len())
    }

    /// Export a user's weight history (newest first). Returns the
    /// number of rows written.
    pub fn export_weights_csv(&self, user_id: Uuid, path: &Path) -> Result<usize> {
        let logs = self.weight_logs_for_user(user_id)?;
        let mut writer = csv::Writer::from_path(path)?;

        for log in &logs {
            writer.serialize(WeightRow {
                date: log.date.to_rfc3339(),
                weight_kg: log.weight,
                notes: log.notes.clone(),
            })?;
        }

        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        file.sync_all()?;

        tracing::info!("Exported {} weight logs to {:?}", logs.len(), path);
        Ok(logs.len())
    }
}
