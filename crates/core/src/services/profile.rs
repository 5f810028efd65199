//! Profile (user data) service.

use chrono::Utc;
use sea_orm::Set;
use sel4c_common::{AppError, AppResult};
use sel4c_db::{Scope, entities::user_data, repositories::UserDataRepository};
use serde::Deserialize;
use validator::Validate;

/// Profile service for business logic.
#[derive(Clone)]
pub struct ProfileService {
    profile_repo: UserDataRepository,
}

/// Full profile payload, used for creation and replacement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileInput {
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,

    #[validate(length(min = 1, max = 255))]
    pub academic_degree: String,

    #[validate(length(min = 1, max = 255))]
    pub institution: String,

    #[validate(length(min = 1, max = 64))]
    pub gender: String,

    #[validate(range(min = 0, max = 150))]
    pub age: i32,

    #[validate(length(min = 1, max = 128))]
    pub country: String,

    #[validate(length(min = 1, max = 255))]
    pub discipline: String,
}

/// Partial profile update.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub academic_degree: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub institution: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub gender: Option<String>,

    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,

    #[validate(length(min = 1, max = 128))]
    pub country: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub discipline: Option<String>,
}

impl From<ProfileInput> for UpdateProfileInput {
    fn from(input: ProfileInput) -> Self {
        Self {
            full_name: Some(input.full_name),
            academic_degree: Some(input.academic_degree),
            institution: Some(input.institution),
            gender: Some(input.gender),
            age: Some(input.age),
            country: Some(input.country),
            discipline: Some(input.discipline),
        }
    }
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(profile_repo: UserDataRepository) -> Self {
        Self { profile_repo }
    }

    /// Create the caller's profile. A user has at most one.
    pub async fn create(&self, user_id: &str, input: ProfileInput) -> AppResult<user_data::Model> {
        input.validate()?;

        if self.profile_repo.find_by_user_id(user_id).await?.is_some() {
            return Err(AppError::Conflict(
                "user data with this user already exists.".to_string(),
            ));
        }

        let model = user_data::ActiveModel {
            user_id: Set(user_id.to_string()),
            full_name: Set(input.full_name),
            academic_degree: Set(input.academic_degree),
            institution: Set(input.institution),
            gender: Set(input.gender),
            age: Set(input.age),
            country: Set(input.country),
            discipline: Set(input.discipline),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.profile_repo.create(model).await
    }

    /// Get the caller's profile.
    pub async fn get_own(&self, user_id: &str) -> AppResult<user_data::Model> {
        self.profile_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id}")))
    }

    /// Update the caller's profile.
    pub async fn update(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user_data::Model> {
        input.validate()?;

        let mut active: user_data::ActiveModel = self.get_own(user_id).await?.into();

        if let Some(v) = input.full_name {
            active.full_name = Set(v);
        }
        if let Some(v) = input.academic_degree {
            active.academic_degree = Set(v);
        }
        if let Some(v) = input.institution {
            active.institution = Set(v);
        }
        if let Some(v) = input.gender {
            active.gender = Set(v);
        }
        if let Some(v) = input.age {
            active.age = Set(v);
        }
        if let Some(v) = input.country {
            active.country = Set(v);
        }
        if let Some(v) = input.discipline {
            active.discipline = Set(v);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.profile_repo.update(active).await
    }

    /// Profiles visible in `scope`.
    pub async fn list(&self, scope: &Scope) -> AppResult<Vec<user_data::Model>> {
        self.profile_repo.find_in_scope(scope).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn profile(user_id: &str) -> user_data::Model {
        user_data::Model {
            user_id: user_id.to_string(),
            full_name: "Ana Torres".to_string(),
            academic_degree: "BSc".to_string(),
            institution: "Tec".to_string(),
            gender: "F".to_string(),
            age: 22,
            country: "MX".to_string(),
            discipline: "Biology".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn input() -> ProfileInput {
        ProfileInput {
            full_name: "Ana Torres".to_string(),
            academic_degree: "BSc".to_string(),
            institution: "Tec".to_string(),
            gender: "F".to_string(),
            age: 22,
            country: "MX".to_string(),
            discipline: "Biology".to_string(),
        }
    }

    fn service(db: DatabaseConnection) -> ProfileService {
        ProfileService::new(UserDataRepository::new(Arc::new(db)))
    }

    #[tokio::test]
    async fn test_create_second_profile_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[profile("u1")]])
            .into_connection();

        let result = service(db).create("u1", input()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_profile() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user_data::Model>::new()])
            .append_query_results([[profile("u1")]])
            .into_connection();

        let created = service(db).create("u1", input()).await.unwrap();
        assert_eq!(created.user_id, "u1");
    }

    #[tokio::test]
    async fn test_get_own_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user_data::Model>::new()])
            .into_connection();

        let result = service(db).get_own("u1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_negative_age() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db)
            .update(
                "u1",
                UpdateProfileInput {
                    age: Some(-1),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let mut updated = profile("u1");
        updated.country = "CL".to_string();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[profile("u1")]])
            .append_query_results([[updated]])
            .into_connection();

        let result = service(db)
            .update(
                "u1",
                UpdateProfileInput {
                    country: Some("CL".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(result.country, "CL");
        assert_eq!(result.full_name, "Ana Torres");
    }
}
