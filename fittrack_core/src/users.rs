//! User registration, lookup, profile updates, and authentication.
//!
//! All operations return `UserProfile` views so the stored password
//! hash never leaves the store. Hash computation happens at the
//! transport boundary; the core compares opaque strings.

use crate::store::Store;
use crate::types::{NewUser, User, UserPatch, UserProfile};
use crate::{Error, Result};
use chrono::Utc;
use uuid::Uuid;

// Profile defaults applied when registration omits the optional fields
const DEFAULT_HEIGHT_FEET: u32 = 5;
const DEFAULT_HEIGHT_INCHES: u32 = 10;
const DEFAULT_CURRENT_WEIGHT: f64 = 75.0;
const DEFAULT_GOAL_WEIGHT: f64 = 70.0;

impl Store {
    /// Register a new user.
    ///
    /// Rejects empty required fields with `Validation` and duplicate
    /// username/email with `Conflict`. The first registered user is
    /// unaffected by a failed duplicate attempt.
    pub fn create_user(&mut self, new: NewUser) -> Result<UserProfile> {
        if new.username.trim().is_empty() {
            return Err(Error::Validation("username must not be empty".into()));
        }
        if new.email.trim().is_empty() || !new.email.contains('@') {
            return Err(Error::Validation(format!(
                "email is not a valid address: {:?}",
                new.email
            )));
        }
        if new.name.trim().is_empty() {
            return Err(Error::Validation("name must not be empty".into()));
        }
        if new.password_hash.is_empty() {
            return Err(Error::Validation("password hash must not be empty".into()));
        }

        if self.data.users.iter().any(|u| u.email == new.email) {
            return Err(Error::Conflict(format!(
                "a user with email {} already exists",
                new.email
            )));
        }
        if self.data.users.iter().any(|u| u.username == new.username) {
            return Err(Error::Conflict(format!(
                "a user with username {} already exists",
                new.username
            )));
        }

        let user = User {
            id: Self::new_id(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            height_feet: new.height_feet.unwrap_or(DEFAULT_HEIGHT_FEET),
            height_inches: new.height_inches.unwrap_or(DEFAULT_HEIGHT_INCHES),
            current_weight: new.current_weight.unwrap_or(DEFAULT_CURRENT_WEIGHT),
            goal_weight: new.goal_weight.unwrap_or(DEFAULT_GOAL_WEIGHT),
            created_at: Utc::now(),
        };
        let profile = UserProfile::from(&user);

        self.data.users.push(user);
        self.save()?;

        tracing::info!("Registered user {} ({})", profile.username, profile.id);
        Ok(profile)
    }

    /// Fetch a user profile by id.
    pub fn user(&self, id: Uuid) -> Result<UserProfile> {
        self.find_user(id).map(UserProfile::from)
    }

    /// Apply a partial profile update. Identity fields are not part of
    /// `UserPatch` and therefore cannot be changed.
    pub fn update_user(&mut self, id: Uuid, patch: UserPatch) -> Result<UserProfile> {
        // Validate the whole patch before touching the record, so a
        // rejected update leaves nothing half-applied
        if let Some(ref name) = patch.name {
            if name.trim().is_empty() {
                return Err(Error::Validation("name must not be empty".into()));
            }
        }
        if matches!(patch.current_weight, Some(w) if w <= 0.0) {
            return Err(Error::Validation("current weight must be positive".into()));
        }
        if matches!(patch.goal_weight, Some(w) if w <= 0.0) {
            return Err(Error::Validation("goal weight must be positive".into()));
        }

        let user = self
            .data
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::not_found("user", id))?;

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(feet) = patch.height_feet {
            user.height_feet = feet;
        }
        if let Some(inches) = patch.height_inches {
            user.height_inches = inches;
        }
        if let Some(weight) = patch.current_weight {
            user.current_weight = weight;
        }
        if let Some(weight) = patch.goal_weight {
            user.goal_weight = weight;
        }

        let profile = UserProfile::from(&*user);
        self.save()?;

        tracing::debug!("Updated profile for user {}", id);
        Ok(profile)
    }

    /// Authenticate by email and password hash.
    ///
    /// Unknown email and mismatched hash both map to `Unauthorized`, so
    /// callers cannot distinguish which one failed.
    pub fn authenticate(&self, email: &str, password_hash: &str) -> Result<UserProfile> {
        let user = self
            .data
            .users
            .iter()
            .find(|u| u.email == email)
            .ok_or(Error::Unauthorized)?;

        if user.password_hash != password_hash {
            tracing::warn!("Failed login attempt for {}", email);
            return Err(Error::Unauthorized);
        }

        Ok(UserProfile::from(user))
    }

    pub(crate) fn find_user(&self, id: Uuid) -> Result<&User> {
        self.data
            .users
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::not_found("user", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: "hashed-secret".into(),
            name: "Test User".into(),
            height_feet: None,
            height_inches: None,
            current_weight: None,
            goal_weight: None,
        }
    }

    fn open_store() -> (tempfile::TempDir, Store) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_create_and_get_roundtrip() {
        let (_dir, mut store) = open_store();

        let created = store.create_user(new_user("ada", "ada@example.com")).unwrap();
        let fetched = store.user(created.id).unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.height_feet, 5);
        assert_eq!(fetched.current_weight, 75.0);
    }

    #[test]
    fn test_duplicate_email_rejected_first_user_unaffected() {
        let (_dir, mut store) = open_store();

        let first = store.create_user(new_user("ada", "ada@example.com")).unwrap();
        let result = store.create_user(new_user("grace", "ada@example.com"));

        assert!(matches!(result, Err(Error::Conflict(_))));
        assert_eq!(store.user(first.id).unwrap(), first);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (_dir, mut store) = open_store();

        store.create_user(new_user("ada", "ada@example.com")).unwrap();
        let result = store.create_user(new_user("ada", "other@example.com"));

        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let (_dir, mut store) = open_store();

        let result = store.create_user(new_user("ada", "not-an-email"));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_update_profile_fields() {
        let (_dir, mut store) = open_store();

        let created = store.create_user(new_user("ada", "ada@example.com")).unwrap();
        let updated = store
            .update_user(
                created.id,
                UserPatch {
                    name: Some("Ada Lovelace".into()),
                    current_weight: Some(72.5),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.current_weight, 72.5);
        // Untouched fields survive
        assert_eq!(updated.username, "ada");
        assert_eq!(updated.goal_weight, 70.0);
    }

    #[test]
    fn test_update_missing_user_is_not_found() {
        let (_dir, mut store) = open_store();

        let result = store.update_user(Uuid::new_v4(), UserPatch::default());
        assert!(matches!(result, Err(Error::NotFound { entity: "user", .. })));
    }

    #[test]
    fn test_authenticate() {
        let (_dir, mut store) = open_store();
        store.create_user(new_user("ada", "ada@example.com")).unwrap();

        let ok = store.authenticate("ada@example.com", "hashed-secret");
        assert!(ok.is_ok());

        let bad_hash = store.authenticate("ada@example.com", "wrong");
        assert!(matches!(bad_hash, Err(Error::Unauthorized)));

        let bad_email = store.authenticate("nobody@example.com", "hashed-secret");
        assert!(matches!(bad_email, Err(Error::Unauthorized)));
    }
}
