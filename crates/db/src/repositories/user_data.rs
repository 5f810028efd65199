//! User profile data repository.

use std::sync::Arc;

use crate::Scope;
use crate::entities::{UserData, user_data};
use crate::map_db_err;
use sel4c_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Profile repository for database operations.
#[derive(Clone)]
pub struct UserDataRepository {
    db: Arc<DatabaseConnection>,
}

impl UserDataRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the profile belonging to a user.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<user_data::Model>> {
        UserData::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Profiles visible in `scope`, ordered by owner.
    pub async fn find_in_scope(&self, scope: &Scope) -> AppResult<Vec<user_data::Model>> {
        let mut query = UserData::find();
        if let Some(owner) = scope.owner() {
            query = query.filter(user_data::Column::UserId.eq(owner));
        }

        query
            .order_by_asc(user_data::Column::UserId)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Every profile, ordered by owner.
    pub async fn find_all(&self) -> AppResult<Vec<user_data::Model>> {
        self.find_in_scope(&Scope::All).await
    }

    /// Create a profile.
    pub async fn create(&self, model: user_data::ActiveModel) -> AppResult<user_data::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a profile.
    pub async fn update(&self, model: user_data::ActiveModel) -> AppResult<user_data::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_profile(user_id: &str) -> user_data::Model {
        user_data::Model {
            user_id: user_id.to_string(),
            full_name: "Ana Torres".to_string(),
            academic_degree: "Licenciatura".to_string(),
            institution: "Tec".to_string(),
            gender: "F".to_string(),
            age: 21,
            country: "MX".to_string(),
            discipline: "Engineering".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_user_id() {
        let profile = create_test_profile("user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );

        let repo = UserDataRepository::new(db);
        let result = repo.find_by_user_id("user1").await.unwrap();

        assert_eq!(result.unwrap().full_name, "Ana Torres");
    }

    #[tokio::test]
    async fn test_find_in_scope_filters_by_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_profile("user1")]])
                .into_connection(),
        );

        let repo = UserDataRepository::new(Arc::clone(&db));
        let result = repo
            .find_in_scope(&Scope::Owner("user1".to_string()))
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        drop(repo);

        let conn = Arc::try_unwrap(db).unwrap();
        let log = conn.into_transaction_log();
        let sql = format!("{log:?}");
        assert!(sql.contains("WHERE"));
    }

    #[tokio::test]
    async fn test_find_all() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_profile("a"), create_test_profile("b")]])
                .into_connection(),
        );

        let repo = UserDataRepository::new(db);
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }
}
