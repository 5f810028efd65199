//! Activity catalog service.
//!
//! Activities form a tree of modules and sub-activities. Every parent
//! assignment is checked against the existing ancestry so the tree never
//! loops back on itself.

use chrono::Utc;
use sea_orm::Set;
use sel4c_common::{AppError, AppResult, IdGenerator};
use sel4c_db::{entities::activity, repositories::ActivityRepository};
use serde::{Deserialize, Deserializer};
use validator::Validate;

/// Activity service for business logic.
#[derive(Clone)]
pub struct ActivityService {
    activity_repo: ActivityRepository,
    id_gen: IdGenerator,
}

/// Full activity payload, used for creation and replacement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivityInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Partial activity update.
///
/// `parent_id` distinguishes "absent" (keep) from `null` (detach).
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateActivityInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub parent_id: Option<Option<String>>,
}

impl From<ActivityInput> for UpdateActivityInput {
    fn from(input: ActivityInput) -> Self {
        Self {
            title: Some(input.title),
            description: Some(input.description),
            parent_id: Some(input.parent_id),
        }
    }
}

/// Wraps any present value, including `null`, in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ActivityService {
    /// Create a new activity service.
    #[must_use]
    pub const fn new(activity_repo: ActivityRepository) -> Self {
        Self {
            activity_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// All activities, ordered by title.
    pub async fn list(&self) -> AppResult<Vec<activity::Model>> {
        self.activity_repo.find_all().await
    }

    /// Get an activity by ID.
    pub async fn get(&self, id: &str) -> AppResult<activity::Model> {
        self.activity_repo.get_by_id(id).await
    }

    /// Direct children of an activity, ordered by title.
    pub async fn sub_activities(&self, parent_id: &str) -> AppResult<Vec<activity::Model>> {
        self.activity_repo.get_by_id(parent_id).await?;
        self.activity_repo.find_children(parent_id).await
    }

    /// Create an activity.
    pub async fn create(&self, input: ActivityInput) -> AppResult<activity::Model> {
        input.validate()?;

        self.ensure_title_free(&input.title, None).await?;
        if let Some(parent_id) = &input.parent_id {
            self.activity_repo.get_by_id(parent_id).await?;
        }

        let model = activity::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            parent_id: Set(input.parent_id),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let activity = self.activity_repo.create(model).await?;
        tracing::info!(activity_id = %activity.id, "Created activity");
        Ok(activity)
    }

    /// Update an activity.
    pub async fn update(&self, id: &str, input: UpdateActivityInput) -> AppResult<activity::Model> {
        input.validate()?;

        let existing = self.activity_repo.get_by_id(id).await?;
        let mut active: activity::ActiveModel = existing.clone().into();

        if let Some(title) = input.title {
            if title != existing.title {
                self.ensure_title_free(&title, Some(id)).await?;
            }
            active.title = Set(title);
        }

        if let Some(description) = input.description {
            active.description = Set(description);
        }

        if let Some(parent_id) = input.parent_id {
            if let Some(parent) = &parent_id {
                self.activity_repo.get_by_id(parent).await?;
                if self.activity_repo.would_create_cycle(id, parent).await? {
                    return Err(AppError::BadRequest(
                        "An activity cannot be its own ancestor.".to_string(),
                    ));
                }
            }
            active.parent_id = Set(parent_id);
        }

        active.updated_at = Set(Some(Utc::now().into()));
        self.activity_repo.update(active).await
    }

    /// Delete an activity. Its sub-activities become top-level.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.activity_repo.delete(id).await? {
            return Err(AppError::ActivityNotFound(id.to_string()));
        }
        tracing::info!(activity_id = %id, "Deleted activity");
        Ok(())
    }

    async fn ensure_title_free(&self, title: &str, except: Option<&str>) -> AppResult<()> {
        if let Some(other) = self.activity_repo.find_by_title(title).await? {
            if Some(other.id.as_str()) != except {
                return Err(AppError::Conflict(
                    "activity with this title already exists.".to_string(),
                ));
            }
        }
        Ok(())
    }
}
