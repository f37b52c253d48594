//! Core domain types for the FitTrack system.
//!
//! This module defines the fundamental records used throughout the system:
//! - Users and their profile data
//! - Exercises and muscle-group labels
//! - Workout plans and their ordered exercise entries
//! - Workout sessions and per-exercise logs
//! - Weight history entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// User Types
// ============================================================================

/// A registered user, root of ownership for all other records.
///
/// The `password_hash` is an opaque string computed at the transport
/// boundary; the core only stores and compares it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub height_feet: u32,
    pub height_inches: u32,
    pub current_weight: f64,
    pub goal_weight: f64,
    pub created_at: DateTime<Utc>,
}

/// Input for registering a new user. Omitted profile fields fall back
/// to standard defaults at creation time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub height_feet: Option<u32>,
    pub height_inches: Option<u32>,
    pub current_weight: Option<f64>,
    pub goal_weight: Option<f64>,
}

/// A user view with the password hash stripped, safe to hand to callers.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub height_feet: u32,
    pub height_inches: u32,
    pub current_weight: f64,
    pub goal_weight: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            height_feet: user.height_feet,
            height_inches: user.height_inches,
            current_weight: user.current_weight,
            goal_weight: user.goal_weight,
            created_at: user.created_at,
        }
    }
}

/// Partial profile update. Identity fields (id, username, email,
/// created_at) are deliberately absent and cannot be changed here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub height_feet: Option<u32>,
    pub height_inches: Option<u32>,
    pub current_weight: Option<f64>,
    pub goal_weight: Option<f64>,
}

// ============================================================================
// Exercise Types
// ============================================================================

/// An exercise definition, either built-in or user-authored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub muscle_groups: Vec<String>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub is_custom: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an exercise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub description: Option<String>,
    pub muscle_groups: Vec<String>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub is_custom: bool,
    pub created_by: Option<Uuid>,
}

// ============================================================================
// Workout Plan Types
// ============================================================================

/// A workout plan assigned to one day of the week (0 = Sunday).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub day_of_week: u8,
    pub muscle_groups: Vec<String>,
    pub estimated_duration: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a workout plan.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewWorkoutPlan {
    pub user_id: Uuid,
    pub name: String,
    pub day_of_week: u8,
    pub muscle_groups: Vec<String>,
    pub estimated_duration: u32,
}

/// Partial plan update. The owning user and day assignment stay fixed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlanPatch {
    pub name: Option<String>,
    pub muscle_groups: Option<Vec<String>>,
    pub estimated_duration: Option<u32>,
    pub is_active: Option<bool>,
}

/// One exercise entry within a plan. `order` is the authoritative
/// sequencing key, unique and gap-free within a plan.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlanExercise {
    pub id: Uuid,
    pub workout_plan_id: Uuid,
    pub exercise_id: Uuid,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub rest_time: Option<u32>,
    pub order: u32,
}

/// A plan entry joined with its exercise, as returned by plan listings.
///
/// The join is left-outer: an entry whose exercise record has gone
/// missing is still returned, with `exercise` set to `None`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanEntry {
    pub id: Uuid,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub rest_time: Option<u32>,
    pub order: u32,
    pub exercise: Option<Exercise>,
}

// ============================================================================
// Session and Log Types
// ============================================================================

/// A workout session. The session is "in progress" while `end_time` is
/// `None`; once `end_time` is set the session is terminal (completed or
/// abandoned, per `is_completed`) and can no longer be written.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_plan_id: Option<Uuid>,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub notes: Option<String>,
}

impl WorkoutSession {
    /// Whether the session has reached a terminal state.
    pub fn is_ended(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Partial session update for fields outside the lifecycle transitions.
/// Finishing a session goes through `Store::finish_session`, never here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionPatch {
    pub name: Option<String>,
    pub notes: Option<String>,
}

/// A per-session, per-exercise log. Seeded from the plan's entry at
/// session start, then independently mutable as the session progresses.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseLog {
    pub id: Uuid,
    pub workout_session_id: Uuid,
    pub exercise_id: Uuid,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub is_completed: bool,
    pub order: u32,
}

/// Partial exercise log update.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LogPatch {
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub is_completed: Option<bool>,
}

// ============================================================================
// Weight Log Types
// ============================================================================

/// One append-only body-weight measurement (kg). Never updated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight: f64,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Input for recording a weight measurement. `date` defaults to now.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewWeightLog {
    pub user_id: Uuid,
    pub weight: f64,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}
