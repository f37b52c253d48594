//! Read-only derived metrics over session and weight history.
//!
//! Everything here is a pure computation over already-fetched records;
//! nothing in this module writes to the store.

use crate::store::Store;
use crate::types::{WeightLog, WorkoutSession};
use crate::Result;
use chrono::{DateTime, Datelike, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weekly completion statistics for one user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutStats {
    /// Completed sessions started in the current calendar week
    pub weekly_workouts: u32,
    /// All sessions ever, completed or not
    pub total_workouts: u32,
    /// All completed sessions, independent of the week window
    pub completed_workouts: u32,
}

/// Start of the calendar week containing `reference`: the preceding
/// (or same) Sunday at midnight UTC.
pub fn week_start(reference: DateTime<Utc>) -> DateTime<Utc> {
    let days_into_week = reference.weekday().num_days_from_sunday() as i64;
    let sunday = reference.date_naive() - chrono::Duration::days(days_into_week);
    sunday.and_time(NaiveTime::MIN).and_utc()
}

/// Compute weekly stats from a user's sessions.
pub fn weekly_stats(sessions: &[WorkoutSession], reference: DateTime<Utc>) -> WorkoutStats {
    let week_start = week_start(reference);

    let completed = sessions.iter().filter(|s| s.is_completed);
    let weekly_workouts = completed
        .clone()
        .filter(|s| s.start_time >= week_start)
        .count() as u32;

    WorkoutStats {
        weekly_workouts,
        total_workouts: sessions.len() as u32,
        completed_workouts: completed.count() as u32,
    }
}

/// Trend delta over a date-descending weight history: newest weight
/// minus oldest. Positive means a gain from oldest to newest. Returns
/// 0 when fewer than two logs exist.
pub fn weight_delta(logs: &[WeightLog]) -> f64 {
    match (logs.first(), logs.last()) {
        (Some(newest), Some(oldest)) if logs.len() >= 2 => newest.weight - oldest.weight,
        _ => 0.0,
    }
}

/// Weekly completion percentage: workouts out of 7 days, rounded,
/// capped at 100.
pub fn completion_rate(weekly_workouts: u32) -> u32 {
    let rate = (f64::from(weekly_workouts) / 7.0 * 100.0).round() as u32;
    rate.min(100)
}

impl Store {
    /// Gather a user's sessions and derive their weekly stats.
    pub fn workout_stats(&self, user_id: Uuid, reference: DateTime<Utc>) -> Result<WorkoutStats> {
        self.find_user(user_id)?;
        Ok(weekly_stats(&self.sessions_for_user(user_id), reference))
    }

    /// Gather a user's weight history and derive the trend delta.
    pub fn weight_trend(&self, user_id: Uuid) -> Result<f64> {
        Ok(weight_delta(&self.weight_logs_for_user(user_id)?))
    }
}
