//! Exercise definitions: creation, lookup, search, and the built-in
//! starter catalog.
//!
//! Built-in exercises are seeded once per store and carry no owning
//! user; user-authored exercises reference their creator.

use crate::store::Store;
use crate::types::{Exercise, NewExercise};
use crate::{Error, Result};
use chrono::Utc;
use once_cell::sync::Lazy;
use uuid::Uuid;

/// Cached built-in exercise definitions - built once and reused
static BUILTIN_EXERCISES: Lazy<Vec<NewExercise>> = Lazy::new(builtin_exercises_internal);

impl Store {
    /// Create an exercise definition.
    ///
    /// Requires a non-empty name and at least one muscle group. A
    /// `created_by` reference must point at an existing user.
    pub fn create_exercise(&mut self, new: NewExercise) -> Result<Exercise> {
        if new.name.trim().is_empty() {
            return Err(Error::Validation("exercise name must not be empty".into()));
        }
        if new.muscle_groups.is_empty() {
            return Err(Error::Validation(format!(
                "exercise {:?} must target at least one muscle group",
                new.name
            )));
        }
        if let Some(user_id) = new.created_by {
            self.find_user(user_id)?;
        }

        let exercise = Exercise {
            id: Self::new_id(),
            name: new.name,
            description: new.description,
            muscle_groups: new.muscle_groups,
            instructions: new.instructions,
            image_url: new.image_url,
            video_url: new.video_url,
            is_custom: new.is_custom,
            created_by: new.created_by,
            created_at: Utc::now(),
        };

        self.data.exercises.push(exercise.clone());
        self.save()?;

        tracing::info!("Created exercise {} ({})", exercise.name, exercise.id);
        Ok(exercise)
    }

    /// Fetch an exercise by id.
    pub fn exercise(&self, id: Uuid) -> Result<Exercise> {
        self.find_exercise(id).cloned()
    }

    /// List all exercises ordered by name ascending.
    pub fn exercises(&self) -> Vec<Exercise> {
        let mut result = self.data.exercises.clone();
        sort_by_name(&mut result);
        result
    }

    /// Search exercises by case-insensitive name substring and/or
    /// muscle-group membership. Results are ordered by name ascending.
    pub fn search_exercises(&self, name: Option<&str>, muscle_group: Option<&str>) -> Vec<Exercise> {
        let needle = name.map(str::to_lowercase);
        let group = muscle_group.map(str::to_lowercase);

        let mut result: Vec<Exercise> = self
            .data
            .exercises
            .iter()
            .filter(|e| {
                needle
                    .as_ref()
                    .map_or(true, |n| e.name.to_lowercase().contains(n))
            })
            .filter(|e| {
                group.as_ref().map_or(true, |g| {
                    e.muscle_groups.iter().any(|m| m.to_lowercase() == *g)
                })
            })
            .cloned()
            .collect();

        sort_by_name(&mut result);
        result
    }

    /// Seed the built-in exercise catalog, skipping any name that is
    /// already present. All inserted rows land in a single snapshot
    /// save. Returns the number of exercises added.
    pub fn seed_builtins(&mut self) -> Result<usize> {
        let mut added = 0;
        for builtin in BUILTIN_EXERCISES.iter() {
            if self.data.exercises.iter().any(|e| e.name == builtin.name) {
                continue;
            }
            self.data.exercises.push(Exercise {
                id: Self::new_id(),
                name: builtin.name.clone(),
                description: builtin.description.clone(),
                muscle_groups: builtin.muscle_groups.clone(),
                instructions: builtin.instructions.clone(),
                image_url: None,
                video_url: None,
                is_custom: false,
                created_by: None,
                created_at: Utc::now(),
            });
            added += 1;
        }

        if added > 0 {
            self.save()?;
            tracing::info!("Seeded {} built-in exercises", added);
        }
        Ok(added)
    }

    pub(crate) fn find_exercise(&self, id: Uuid) -> Result<&Exercise> {
        self.data
            .exercises
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::not_found("exercise", id))
    }
}

fn sort_by_name(exercises: &mut [Exercise]) {
    exercises.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

fn builtin(name: &str, groups: &[&str], description: &str, instructions: &str) -> NewExercise {
    NewExercise {
        name: name.into(),
        description: Some(description.into()),
        muscle_groups: groups.iter().map(|g| (*g).into()).collect(),
        instructions: Some(instructions.into()),
        image_url: None,
        video_url: None,
        is_custom: false,
        created_by: None,
    }
}

fn builtin_exercises_internal() -> Vec<NewExercise> {
    vec![
        builtin(
            "Bench Press",
            &["Chest", "Triceps"],
            "Barbell press from a flat bench",
            "Lower the bar to mid-chest, press back up to lockout",
        ),
        builtin(
            "Push-up",
            &["Chest", "Triceps", "Core"],
            "Bodyweight horizontal press",
            "Keep a straight line from shoulders to heels, chest to the floor",
        ),
        builtin(
            "Pull-up",
            &["Back", "Biceps"],
            "Bodyweight vertical pull",
            "Dead hang to chin over the bar, controlled descent",
        ),
        builtin(
            "Barbell Row",
            &["Back", "Biceps"],
            "Bent-over barbell pull",
            "Hinge at the hips, pull the bar to the lower ribs",
        ),
        builtin(
            "Squat",
            &["Legs", "Glutes"],
            "Barbell back squat",
            "Brace, sit down below parallel, drive back up",
        ),
        builtin(
            "Deadlift",
            &["Legs", "Glutes", "Back"],
            "Barbell hip hinge from the floor",
            "Flat back, push the floor away, lock out the hips",
        ),
        builtin(
            "Overhead Press",
            &["Shoulders", "Triceps"],
            "Standing barbell press",
            "Press overhead without leaning back, lock out over mid-foot",
        ),
        builtin(
            "Bicep Curl",
            &["Arms", "Biceps"],
            "Dumbbell curl",
            "Elbows pinned, curl without swinging",
        ),
        builtin(
            "Plank",
            &["Core", "Abs"],
            "Isometric trunk hold",
            "Forearms down, squeeze glutes, hold a straight line",
        ),
        builtin(
            "Crunch",
            &["Abs"],
            "Floor abdominal flexion",
            "Curl the shoulder blades off the floor, slow on the way down",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (tempfile::TempDir, Store) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).unwrap();
        (temp_dir, store)
    }

    fn custom(name: &str, groups: &[&str]) -> NewExercise {
        NewExercise {
            name: name.into(),
            description: None,
            muscle_groups: groups.iter().map(|g| (*g).into()).collect(),
            instructions: None,
            image_url: None,
            video_url: None,
            is_custom: true,
            created_by: None,
        }
    }

    #[test]
    fn test_create_and_get_roundtrip() {
        let (_dir, mut store) = open_store();

        let created = store.create_exercise(custom("Squat", &["Legs"])).unwrap();
        let fetched = store.exercise(created.id).unwrap();
        assert_eq!(created, fetched);
    }

    #[test]
    fn test_empty_muscle_groups_rejected() {
        let (_dir, mut store) = open_store();

        let result = store.create_exercise(custom("Squat", &[]));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_dangling_created_by_rejected() {
        let (_dir, mut store) = open_store();

        let mut new = custom("Squat", &["Legs"]);
        new.created_by = Some(Uuid::new_v4());

        let result = store.create_exercise(new);
        assert!(matches!(result, Err(Error::NotFound { entity: "user", .. })));
    }

    #[test]
    fn test_search_by_name_is_case_insensitive() {
        let (_dir, mut store) = open_store();
        store.create_exercise(custom("Front Squat", &["Legs"])).unwrap();
        store.create_exercise(custom("Bench Press", &["Chest"])).unwrap();

        let hits = store.search_exercises(Some("sQuAt"), None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Front Squat");
    }

    #[test]
    fn test_search_by_muscle_group() {
        let (_dir, mut store) = open_store();
        store.create_exercise(custom("Front Squat", &["Legs", "Glutes"])).unwrap();
        store.create_exercise(custom("Bench Press", &["Chest"])).unwrap();

        let hits = store.search_exercises(None, Some("glutes"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Front Squat");
    }

    #[test]
    fn test_listing_sorted_by_name() {
        let (_dir, mut store) = open_store();
        store.create_exercise(custom("Row", &["Back"])).unwrap();
        store.create_exercise(custom("bench", &["Chest"])).unwrap();
        store.create_exercise(custom("Curl", &["Arms"])).unwrap();

        let names: Vec<_> = store.exercises().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["bench", "Curl", "Row"]);
    }

    #[test]
    fn test_seed_builtins_is_idempotent() {
        let (_dir, mut store) = open_store();

        let first = store.seed_builtins().unwrap();
        assert!(first > 0);

        let second = store.seed_builtins().unwrap();
        assert_eq!(second, 0);
        assert_eq!(store.exercises().len(), first);
    }

    #[test]
    fn test_builtins_are_not_custom() {
        let (_dir, mut store) = open_store();
        store.seed_builtins().unwrap();

        for exercise in store.exercises() {
            assert!(!exercise.is_custom);
            assert!(exercise.created_by.is_none());
            assert!(!exercise.muscle_groups.is_empty());
        }
    }
}
