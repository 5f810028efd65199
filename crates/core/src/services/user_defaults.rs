//! Client defaults service.
//!
//! The mobile client keeps a bag of settings per user. The server does not
//! interpret the keys; it only requires a JSON object.

use chrono::Utc;
use sea_orm::Set;
use sel4c_common::{AppError, AppResult};
use sel4c_db::{entities::user_defaults, repositories::UserDefaultsRepository};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Client defaults service for business logic.
#[derive(Clone)]
pub struct UserDefaultsService {
    defaults_repo: UserDefaultsRepository,
}

/// Settings payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDefaultsInput {
    pub defaults: Value,
}

impl UserDefaultsInput {
    fn into_object(self) -> AppResult<Map<String, Value>> {
        match self.defaults {
            Value::Object(map) => Ok(map),
            _ => Err(AppError::Validation(
                "defaults must be a JSON object.".to_string(),
            )),
        }
    }
}

/// Apply `patch` to `stored` key by key. A `null` value removes the key.
fn merge(stored: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        if value.is_null() {
            stored.remove(&key);
        } else {
            stored.insert(key, value);
        }
    }
}

impl UserDefaultsService {
    /// Create a new client defaults service.
    #[must_use]
    pub const fn new(defaults_repo: UserDefaultsRepository) -> Self {
        Self { defaults_repo }
    }

    /// Store the caller's defaults. A user has at most one record.
    pub async fn create(
        &self,
        user_id: &str,
        input: UserDefaultsInput,
    ) -> AppResult<user_defaults::Model> {
        let defaults = input.into_object()?;

        if self.defaults_repo.find_by_user_id(user_id).await?.is_some() {
            return Err(AppError::Conflict(
                "user defaults with this user already exists.".to_string(),
            ));
        }

        let model = user_defaults::ActiveModel {
            user_id: Set(user_id.to_string()),
            defaults: Set(Value::Object(defaults)),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.defaults_repo.create(model).await?;
        tracing::debug!(user_id = %user_id, "Stored client defaults");
        Ok(created)
    }

    /// Get the caller's defaults.
    pub async fn get_own(&self, user_id: &str) -> AppResult<user_defaults::Model> {
        self.defaults_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Defaults for user {user_id}")))
    }

    /// Replace the caller's defaults (`partial == false`) or merge into them.
    pub async fn update(
        &self,
        user_id: &str,
        input: UserDefaultsInput,
        partial: bool,
    ) -> AppResult<user_defaults::Model> {
        let patch = input.into_object()?;
        let existing = self.get_own(user_id).await?;

        let defaults = if partial {
            let mut stored = match existing.defaults.clone() {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            merge(&mut stored, patch);
            stored
        } else {
            patch
        };

        let mut active: user_defaults::ActiveModel = existing.into();
        active.defaults = Set(Value::Object(defaults));
        active.updated_at = Set(Some(Utc::now().into()));

        self.defaults_repo.update(active).await
    }
}
