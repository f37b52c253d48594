//! Workout plan composition: plan CRUD and the ordered exercise list
//! within a plan.
//!
//! `order` is the authoritative sequencing key. Entries within a plan
//! are kept unique and gap-free (0..n): inserting at a taken position
//! shifts the tail right, removing an entry closes the gap.

use crate::store::Store;
use crate::types::{
    NewWorkoutPlan, PlanEntry, PlanPatch, WorkoutPlan, WorkoutPlanExercise,
};
use crate::{Error, Result};
use chrono::Utc;
use uuid::Uuid;

/// Default weekly split used by `seed_default_week`. "Rest" days get no
/// stored plan.
const DEFAULT_WEEK: [&[&str]; 7] = [
    &["Chest", "Triceps"],
    &["Back", "Biceps"],
    &["Legs", "Glutes"],
    &["Rest"],
    &["Shoulders", "Core"],
    &["Arms", "Abs"],
    &["Rest"],
];

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

impl Store {
    /// Create a workout plan for a user.
    pub fn create_plan(&mut self, new: NewWorkoutPlan) -> Result<WorkoutPlan> {
        self.find_user(new.user_id)?;

        if new.name.trim().is_empty() {
            return Err(Error::Validation("plan name must not be empty".into()));
        }
        if new.day_of_week > 6 {
            return Err(Error::Validation(format!(
                "day_of_week must be 0-6 (Sunday=0), got {}",
                new.day_of_week
            )));
        }
        if new.muscle_groups.is_empty() {
            return Err(Error::Validation(format!(
                "plan {:?} must target at least one muscle group",
                new.name
            )));
        }
        if new.estimated_duration == 0 {
            return Err(Error::Validation(
                "estimated duration must be positive".into(),
            ));
        }

        let plan = WorkoutPlan {
            id: Self::new_id(),
            user_id: new.user_id,
            name: new.name,
            day_of_week: new.day_of_week,
            muscle_groups: new.muscle_groups,
            estimated_duration: new.estimated_duration,
            is_active: true,
            created_at: Utc::now(),
        };

        self.data.plans.push(plan.clone());
        self.save()?;

        tracing::info!(
            "Created plan {} ({}) for day {}",
            plan.name,
            plan.id,
            plan.day_of_week
        );
        Ok(plan)
    }

    /// Fetch a plan by id.
    pub fn plan(&self, id: Uuid) -> Result<WorkoutPlan> {
        self.find_plan(id).cloned()
    }

    /// List a user's plans ordered by day-of-week ascending.
    pub fn plans_for_user(&self, user_id: Uuid) -> Vec<WorkoutPlan> {
        let mut result: Vec<WorkoutPlan> = self
            .data
            .plans
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|p| p.day_of_week);
        result
    }

    /// Apply a partial plan update. Ownership and day assignment are
    /// not part of `PlanPatch` and stay fixed.
    pub fn update_plan(&mut self, id: Uuid, patch: PlanPatch) -> Result<WorkoutPlan> {
        // Validate before applying so a rejected patch changes nothing
        if matches!(patch.name, Some(ref n) if n.trim().is_empty()) {
            return Err(Error::Validation("plan name must not be empty".into()));
        }
        if matches!(patch.muscle_groups, Some(ref g) if g.is_empty()) {
            return Err(Error::Validation(
                "plan must target at least one muscle group".into(),
            ));
        }
        if matches!(patch.estimated_duration, Some(0)) {
            return Err(Error::Validation(
                "estimated duration must be positive".into(),
            ));
        }

        let plan = self
            .data
            .plans
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found("plan", id))?;

        if let Some(name) = patch.name {
            plan.name = name;
        }
        if let Some(groups) = patch.muscle_groups {
            plan.muscle_groups = groups;
        }
        if let Some(duration) = patch.estimated_duration {
            plan.estimated_duration = duration;
        }
        if let Some(active) = patch.is_active {
            plan.is_active = active;
        }

        let updated = plan.clone();
        self.save()?;
        Ok(updated)
    }

    /// Add an exercise to a plan's ordered list.
    ///
    /// With `order = None` the entry is appended after the current
    /// tail. A given `order` that collides with an existing entry
    /// shifts that entry and everything after it one position right.
    pub fn add_exercise_to_plan(
        &mut self,
        plan_id: Uuid,
        exercise_id: Uuid,
        sets: u32,
        reps: u32,
        weight: Option<f64>,
        rest_time: Option<u32>,
        order: Option<u32>,
    ) -> Result<WorkoutPlanExercise> {
        self.find_plan(plan_id)?;
        self.find_exercise(exercise_id)?;

        if sets == 0 {
            return Err(Error::Validation("sets must be positive".into()));
        }
        if reps == 0 {
            return Err(Error::Validation("reps must be positive".into()));
        }
        if let Some(w) = weight {
            if w <= 0.0 {
                return Err(Error::Validation("weight must be positive".into()));
            }
        }

        let entry_count = self.plan_entry_count(plan_id);
        // Clamp explicit positions into the gap-free range so the
        // sequence never grows holes
        let order = order.map_or(entry_count, |o| o.min(entry_count));

        // Shift-right on insert: everything at or after the target
        // position moves up one
        for entry in self
            .data
            .plan_exercises
            .iter_mut()
            .filter(|e| e.workout_plan_id == plan_id && e.order >= order)
        {
            entry.order += 1;
        }

        let entry = WorkoutPlanExercise {
            id: Self::new_id(),
            workout_plan_id: plan_id,
            exercise_id,
            sets,
            reps,
            weight,
            rest_time,
            order,
        };

        self.data.plan_exercises.push(entry.clone());
        self.save()?;

        tracing::debug!(
            "Added exercise {} to plan {} at position {}",
            exercise_id,
            plan_id,
            order
        );
        Ok(entry)
    }

    /// Move an entry to a new position within its plan, renumbering the
    /// rest of the list to stay gap-free.
    pub fn reorder_plan_entry(&mut self, entry_id: Uuid, new_order: u32) -> Result<WorkoutPlanExercise> {
        let (plan_id, old_order) = {
            let entry = self
                .data
                .plan_exercises
                .iter()
                .find(|e| e.id == entry_id)
                .ok_or_else(|| Error::not_found("plan entry", entry_id))?;
            (entry.workout_plan_id, entry.order)
        };

        let max_order = self.plan_entry_count(plan_id).saturating_sub(1);
        let new_order = new_order.min(max_order);
        if new_order == old_order {
            return self
                .data
                .plan_exercises
                .iter()
                .find(|e| e.id == entry_id)
                .cloned()
                .ok_or_else(|| Error::not_found("plan entry", entry_id));
        }

        for entry in self
            .data
            .plan_exercises
            .iter_mut()
            .filter(|e| e.workout_plan_id == plan_id)
        {
            if entry.id == entry_id {
                entry.order = new_order;
            } else if old_order < new_order && entry.order > old_order && entry.order <= new_order {
                entry.order -= 1;
            } else if old_order > new_order && entry.order >= new_order && entry.order < old_order {
                entry.order += 1;
            }
        }

        let moved = self
            .data
            .plan_exercises
            .iter()
            .find(|e| e.id == entry_id)
            .cloned()
            .ok_or_else(|| Error::not_found("plan entry", entry_id))?;
        self.save()?;
        Ok(moved)
    }

    /// Remove an entry from its plan and close the order gap.
    pub fn remove_plan_entry(&mut self, entry_id: Uuid) -> Result<()> {
        let position = self
            .data
            .plan_exercises
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| Error::not_found("plan entry", entry_id))?;

        let removed = self.data.plan_exercises.remove(position);
        for entry in self
            .data
            .plan_exercises
            .iter_mut()
            .filter(|e| e.workout_plan_id == removed.workout_plan_id && e.order > removed.order)
        {
            entry.order -= 1;
        }

        self.save()?;
        tracing::debug!("Removed entry {} from plan {}", entry_id, removed.workout_plan_id);
        Ok(())
    }

    /// List a plan's entries joined with their exercises, ordered by
    /// `order` ascending. Left-join semantics: a dangling exercise id
    /// yields `exercise: None` rather than dropping the entry.
    pub fn plan_entries(&self, plan_id: Uuid) -> Result<Vec<PlanEntry>> {
        self.find_plan(plan_id)?;

        let mut entries: Vec<PlanEntry> = self
            .data
            .plan_exercises
            .iter()
            .filter(|e| e.workout_plan_id == plan_id)
            .map(|e| PlanEntry {
                id: e.id,
                sets: e.sets,
                reps: e.reps,
                weight: e.weight,
                rest_time: e.rest_time,
                order: e.order,
                exercise: self.find_exercise(e.exercise_id).ok().cloned(),
            })
            .collect();

        entries.sort_by_key(|e| e.order);
        Ok(entries)
    }

    /// Seed a default week of plans for a user, one plan per training
    /// day of the standard split. Rest days are skipped, days that
    /// already have a plan are left alone. All created rows land in a
    /// single snapshot save, so the seeding is all-or-nothing.
    pub fn seed_default_week(&mut self, user_id: Uuid) -> Result<Vec<WorkoutPlan>> {
        self.find_user(user_id)?;

        let mut created = Vec::new();
        for (day, groups) in DEFAULT_WEEK.iter().enumerate() {
            if groups[0] == "Rest" {
                continue;
            }
            let day = day as u8;
            if self
                .data
                .plans
                .iter()
                .any(|p| p.user_id == user_id && p.day_of_week == day)
            {
                continue;
            }

            let muscle_groups: Vec<String> = groups.iter().map(|g| (*g).into()).collect();
            let plan = WorkoutPlan {
                id: Self::new_id(),
                user_id,
                name: format!("{} - {}", DAY_NAMES[day as usize], muscle_groups.join(" & ")),
                day_of_week: day,
                estimated_duration: if muscle_groups.len() == 1 { 45 } else { 60 },
                muscle_groups,
                is_active: true,
                created_at: Utc::now(),
            };
            self.data.plans.push(plan.clone());
            created.push(plan);
        }

        if !created.is_empty() {
            self.save()?;
            tracing::info!("Seeded {} default plans for user {}", created.len(), user_id);
        }
        Ok(created)
    }

    pub(crate) fn find_plan(&self, id: Uuid) -> Result<&WorkoutPlan> {
        self.data
            .plans
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found("plan", id))
    }

    fn plan_entry_count(&self, plan_id: Uuid) -> u32 {
        self.data
            .plan_exercises
            .iter()
            .filter(|e| e.workout_plan_id == plan_id)
            .count() as u32
    }
}
