//! Activity response repository.

use std::sync::Arc;

use crate::Scope;
use crate::entities::{ActivityResponse, activity_response};
use crate::map_db_err;
use sel4c_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Activity response repository for database operations.
#[derive(Clone)]
pub struct ActivityResponseRepository {
    db: Arc<DatabaseConnection>,
}

impl ActivityResponseRepository {
    /// Create a new activity response repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a response by ID, restricted to `scope`.
    pub async fn find_in_scope(
        &self,
        id: &str,
        scope: &Scope,
    ) -> AppResult<Option<activity_response::Model>> {
        let mut query = ActivityResponse::find().filter(activity_response::Column::Id.eq(id));
        if let Some(owner) = scope.owner() {
            query = query.filter(activity_response::Column::UserId.eq(owner));
        }

        query.one(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Find the response a user gave to an activity.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        activity_id: &str,
    ) -> AppResult<Option<activity_response::Model>> {
        ActivityResponse::find()
            .filter(activity_response::Column::UserId.eq(user_id))
            .filter(activity_response::Column::ActivityId.eq(activity_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Responses visible in `scope`.
    ///
    /// The full set is ordered by owner; a single owner's responses are
    /// ordered by activity.
    pub async fn list_in_scope(&self, scope: &Scope) -> AppResult<Vec<activity_response::Model>> {
        let query = match scope.owner() {
            None => ActivityResponse::find()
                .order_by_asc(activity_response::Column::UserId)
                .order_by_asc(activity_response::Column::ActivityId),
            Some(owner) => ActivityResponse::find()
                .filter(activity_response::Column::UserId.eq(owner))
                .order_by_asc(activity_response::Column::ActivityId),
        };

        query.all(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Every response of a user to the given activities.
    pub async fn find_by_user_and_activities(
        &self,
        user_id: &str,
        activity_ids: &[String],
    ) -> AppResult<Vec<activity_response::Model>> {
        if activity_ids.is_empty() {
            return Ok(vec![]);
        }

        ActivityResponse::find()
            .filter(activity_response::Column::UserId.eq(user_id))
            .filter(activity_response::Column::ActivityId.is_in(activity_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a response.
    pub async fn create(
        &self,
        model: activity_response::ActiveModel,
    ) -> AppResult<activity_response::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a response.
    pub async fn update(
        &self,
        model: activity_response::ActiveModel,
    ) -> AppResult<activity_response::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a response by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        ActivityResponse::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::activity_response::ResponseType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_response(id: &str, user_id: &str, activity_id: &str) -> activity_response::Model {
        activity_response::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            activity_id: activity_id.to_string(),
            response_type: ResponseType::Text,
            string_response: Some("My answer".to_string()),
            image_response: None,
            video_response: None,
            audio_response: None,
            time_minutes: 12,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_in_scope_hidden_from_other_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<activity_response::Model>::new()])
                .into_connection(),
        );

        let repo = ActivityResponseRepository::new(db);
        let result = repo
            .find_in_scope("r1", &Scope::Owner("intruder".to_string()))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_by_pair() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_response("r1", "u1", "a1")]])
                .into_connection(),
        );

        let repo = ActivityResponseRepository::new(db);
        let found = repo.find_by_pair("u1", "a1").await.unwrap().unwrap();

        assert_eq!(found.response_type, ResponseType::Text);
        assert_eq!(found.string_response.as_deref(), Some("My answer"));
    }

    #[tokio::test]
    async fn test_list_in_scope_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_response("r1", "u1", "a1"),
                    create_test_response("r2", "u1", "a2"),
                ]])
                .into_connection(),
        );

        let repo = ActivityResponseRepository::new(db);
        let result = repo
            .list_in_scope(&Scope::Owner("u1".to_string()))
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.user_id == "u1"));
    }
}
