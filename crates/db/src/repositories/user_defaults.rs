//! Client defaults repository.

use std::sync::Arc;

use crate::entities::{UserDefaults, user_defaults};
use crate::map_db_err;
use sel4c_common::AppResult;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// Client defaults repository for database operations.
#[derive(Clone)]
pub struct UserDefaultsRepository {
    db: Arc<DatabaseConnection>,
}

impl UserDefaultsRepository {
    /// Create a new client defaults repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the defaults belonging to a user.
    pub async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> AppResult<Option<user_defaults::Model>> {
        UserDefaults::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    pub async fn create(
        &self,
        model: user_defaults::ActiveModel,
    ) -> AppResult<user_defaults::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    pub async fn update(
        &self,
        model: user_defaults::ActiveModel,
    ) -> AppResult<user_defaults::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    #[tokio::test]
    async fn test_find_by_user_id() {
        let stored = user_defaults::Model {
            user_id: "user1".to_string(),
            defaults: json!({ "language": "es" }),
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );

        let repo = UserDefaultsRepository::new(db);
        let found = repo.find_by_user_id("user1").await.unwrap().unwrap();
        assert_eq!(found.defaults["language"], "es");
    }

    #[tokio::test]
    async fn test_find_missing_defaults() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user_defaults::Model>::new()])
                .into_connection(),
        );

        let repo = UserDefaultsRepository::new(db);
        assert!(repo.find_by_user_id("user1").await.unwrap().is_none());
    }
}
