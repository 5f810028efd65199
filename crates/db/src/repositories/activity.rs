//! Activity repository.

use std::collections::HashSet;
use std::sync::Arc;

use crate::entities::{Activity, activity};
use crate::map_db_err;
use sel4c_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Activity repository for database operations.
#[derive(Clone)]
pub struct ActivityRepository {
    db: Arc<DatabaseConnection>,
}

impl ActivityRepository {
    /// Create a new activity repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an activity by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<activity::Model>> {
        Activity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find an activity by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<activity::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ActivityNotFound(id.to_string()))
    }

    /// Find an activity by its (unique) title.
    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<activity::Model>> {
        Activity::find()
            .filter(activity::Column::Title.eq(title))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// All activities, ordered by title.
    pub async fn find_all(&self) -> AppResult<Vec<activity::Model>> {
        Activity::find()
            .order_by_asc(activity::Column::Title)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Direct children of an activity, ordered by title.
    pub async fn find_children(&self, parent_id: &str) -> AppResult<Vec<activity::Model>> {
        Activity::find()
            .filter(activity::Column::ParentId.eq(parent_id))
            .order_by_asc(activity::Column::Title)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Whether making `parent_id` the parent of `activity_id` would close a loop.
    ///
    /// Walks up from the proposed parent; reaching `activity_id` (or revisiting
    /// a node) means the tree would no longer be a tree.
    pub async fn would_create_cycle(&self, activity_id: &str, parent_id: &str) -> AppResult<bool> {
        let mut seen = HashSet::new();
        let mut current = Some(parent_id.to_string());

        while let Some(id) = current {
            if id == activity_id || !seen.insert(id.clone()) {
                return Ok(true);
            }
            current = self.find_by_id(&id).await?.and_then(|a| a.parent_id);
        }

        Ok(false)
    }

    /// Create an activity.
    pub async fn create(&self, model: activity::ActiveModel) -> AppResult<activity::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update an activity.
    pub async fn update(&self, model: activity::ActiveModel) -> AppResult<activity::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete an activity. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Activity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_activity(id: &str, title: &str, parent_id: Option<&str>) -> activity::Model {
        activity::Model {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{title} description"),
            parent_id: parent_id.map(str::to_string),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<activity::Model>::new()])
                .into_connection(),
        );

        let repo = ActivityRepository::new(db);
        match repo.get_by_id("missing").await {
            Err(AppError::ActivityNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected ActivityNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_children() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_activity("c1", "A", Some("p")),
                    create_test_activity("c2", "B", Some("p")),
                ]])
                .into_connection(),
        );

        let repo = ActivityRepository::new(db);
        let children = repo.find_children("p").await.unwrap();

        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.parent_id.as_deref() == Some("p")));
    }

    #[tokio::test]
    async fn test_self_parent_is_cycle() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ActivityRepository::new(db);
        assert!(repo.would_create_cycle("a", "a").await.unwrap());
    }

    #[tokio::test]
    async fn test_descendant_parent_is_cycle() {
        // a <- b <- c ; making c the parent of a loops back
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_activity("c", "C", Some("b"))]])
                .append_query_results([[create_test_activity("b", "B", Some("a"))]])
                .into_connection(),
        );

        let repo = ActivityRepository::new(db);
        assert!(repo.would_create_cycle("a", "c").await.unwrap());
    }

    #[tokio::test]
    async fn test_unrelated_parent_is_not_cycle() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_activity("m", "Module", None)]])
                .into_connection(),
        );

        let repo = ActivityRepository::new(db);
        assert!(!repo.would_create_cycle("a", "m").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = ActivityRepository::new(db);
        assert!(repo.delete("a").await.unwrap());
        assert!(!repo.delete("a").await.unwrap());
    }
}
