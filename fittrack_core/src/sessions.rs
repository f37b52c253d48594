//! Workout session lifecycle and nested exercise logs.
//!
//! A session is live from `start_session` until `finish_session` sets
//! its end time; logs may only be created or mutated while the session
//! is live. Finished sessions (completed or abandoned) are terminal:
//! any further write fails with `Conflict`.

use crate::store::Store;
use crate::types::{ExerciseLog, LogPatch, SessionPatch, WorkoutSession};
use crate::{Error, Result};
use chrono::Utc;
use uuid::Uuid;

impl Store {
    /// Start a workout session for a user.
    ///
    /// When a plan is given, one `ExerciseLog` is seeded per plan entry
    /// (copying sets/reps/weight/order) so the session opens with the
    /// plan's checklist. The session row and all seeded logs land in a
    /// single snapshot save; a plan edited later does not touch the
    /// session's snapshot of it.
    pub fn start_session(
        &mut self,
        user_id: Uuid,
        plan_id: Option<Uuid>,
        name: &str,
    ) -> Result<WorkoutSession> {
        self.find_user(user_id)?;

        if name.trim().is_empty() {
            return Err(Error::Validation("session name must not be empty".into()));
        }

        let session = WorkoutSession {
            id: Self::new_id(),
            user_id,
            workout_plan_id: plan_id,
            name: name.into(),
            start_time: Utc::now(),
            end_time: None,
            is_completed: false,
            notes: None,
        };

        let mut seeded = 0;
        if let Some(plan_id) = plan_id {
            let plan = self.find_plan(plan_id)?;
            if plan.user_id != user_id {
                return Err(Error::Validation(format!(
                    "plan {} does not belong to user {}",
                    plan_id, user_id
                )));
            }

            let entries: Vec<_> = self
                .data
                .plan_exercises
                .iter()
                .filter(|e| e.workout_plan_id == plan_id)
                .cloned()
                .collect();
            for entry in entries {
                self.data.exercise_logs.push(ExerciseLog {
                    id: Self::new_id(),
                    workout_session_id: session.id,
                    exercise_id: entry.exercise_id,
                    sets: entry.sets,
                    reps: entry.reps,
                    weight: entry.weight,
                    is_completed: false,
                    order: entry.order,
                });
                seeded += 1;
            }
        }

        self.data.sessions.push(session.clone());
        self.save()?;

        tracing::info!(
            "Started session {} ({}) with {} seeded logs",
            session.name,
            session.id,
            seeded
        );
        Ok(session)
    }

    /// Fetch a session by id.
    pub fn session(&self, id: Uuid) -> Result<WorkoutSession> {
        self.find_session(id).cloned()
    }

    /// List a user's sessions ordered by start time descending.
    pub fn sessions_for_user(&self, user_id: Uuid) -> Vec<WorkoutSession> {
        let mut result: Vec<WorkoutSession> = self
            .data
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        result
    }

    /// Update a live session's name or notes. Completion goes through
    /// `finish_session`, never here.
    pub fn update_session(&mut self, id: Uuid, patch: SessionPatch) -> Result<WorkoutSession> {
        if matches!(patch.name, Some(ref n) if n.trim().is_empty()) {
            return Err(Error::Validation("session name must not be empty".into()));
        }

        let session = self
            .data
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found("session", id))?;
        if session.is_ended() {
            return Err(Error::Conflict(format!("session {} already ended", id)));
        }

        if let Some(name) = patch.name {
            session.name = name;
        }
        if let Some(notes) = patch.notes {
            session.notes = Some(notes);
        }

        let updated = session.clone();
        self.save()?;
        Ok(updated)
    }

    /// Finish a session, marking it completed or abandoned.
    ///
    /// Sets the end time to now. Finishing an already-finished session
    /// fails with `Conflict` and leaves the first finish untouched.
    pub fn finish_session(
        &mut self,
        id: Uuid,
        is_completed: bool,
        notes: Option<String>,
    ) -> Result<WorkoutSession> {
        let session = self
            .data
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found("session", id))?;
        if session.is_ended() {
            return Err(Error::Conflict(format!("session {} already ended", id)));
        }

        session.end_time = Some(Utc::now());
        session.is_completed = is_completed;
        if notes.is_some() {
            session.notes = notes;
        }

        let finished = session.clone();
        self.save()?;

        tracing::info!(
            "Finished session {} ({})",
            finished.id,
            if finished.is_completed {
                "completed"
            } else {
                "abandoned"
            }
        );
        Ok(finished)
    }

    /// Append an exercise log to a live session. With `order = None`
    /// the log is appended after the session's current last log.
    pub fn log_exercise(
        &mut self,
        session_id: Uuid,
        exercise_id: Uuid,
        sets: u32,
        reps: u32,
        weight: Option<f64>,
        order: Option<u32>,
    ) -> Result<ExerciseLog> {
        let session = self.find_session(session_id)?;
        if session.is_ended() {
            return Err(Error::Conflict(format!(
                "session {} already ended",
                session_id
            )));
        }
        self.find_exercise(exercise_id)?;

        if sets == 0 {
            return Err(Error::Validation("sets must be positive".into()));
        }
        if reps == 0 {
            return Err(Error::Validation("reps must be positive".into()));
        }

        let log_count = self
            .data
            .exercise_logs
            .iter()
            .filter(|l| l.workout_session_id == session_id)
            .count() as u32;
        // Clamp explicit positions into the gap-free range, same as
        // plan entries
        let order = order.map_or(log_count, |o| o.min(log_count));

        // Same shift-right discipline as plan entries
        for log in self
            .data
            .exercise_logs
            .iter_mut()
            .filter(|l| l.workout_session_id == session_id && l.order >= order)
        {
            log.order += 1;
        }

        let log = ExerciseLog {
            id: Self::new_id(),
            workout_session_id: session_id,
            exercise_id,
            sets,
            reps,
            weight,
            is_completed: false,
            order,
        };

        self.data.exercise_logs.push(log.clone());
        self.save()?;
        Ok(log)
    }

    /// Update a log of a live session (sets/reps/weight/completion).
    pub fn update_log(&mut self, id: Uuid, patch: LogPatch) -> Result<ExerciseLog> {
        if matches!(patch.sets, Some(0)) {
            return Err(Error::Validation("sets must be positive".into()));
        }
        if matches!(patch.reps, Some(0)) {
            return Err(Error::Validation("reps must be positive".into()));
        }

        let session_id = self
            .data
            .exercise_logs
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.workout_session_id)
            .ok_or_else(|| Error::not_found("exercise log", id))?;
        if self.find_session(session_id)?.is_ended() {
            return Err(Error::Conflict(format!(
                "session {} already ended",
                session_id
            )));
        }

        let log = self
            .data
            .exercise_logs
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| Error::not_found("exercise log", id))?;

        if let Some(sets) = patch.sets {
            log.sets = sets;
        }
        if let Some(reps) = patch.reps {
            log.reps = reps;
        }
        if let Some(weight) = patch.weight {
            log.weight = Some(weight);
        }
        if let Some(done) = patch.is_completed {
            log.is_completed = done;
        }

        let updated = log.clone();
        self.save()?;
        Ok(updated)
    }

    /// List a session's logs ordered by `order` ascending. Reads are
    /// allowed on finished sessions.
    pub fn session_logs(&self, session_id: Uuid) -> Result<Vec<ExerciseLog>> {
        self.find_session(session_id)?;

        let mut logs: Vec<ExerciseLog> = self
            .data
            .exercise_logs
            .iter()
            .filter(|l| l.workout_session_id == session_id)
            .cloned()
            .collect();
        logs.sort_by_key(|l| l.order);
        Ok(logs)
    }

    pub(crate) fn find_session(&self, id: Uuid) -> Result<&WorkoutSession> {
        self.data
            .sessions
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found("session", id))
    }
}
