//! Forms question repository.

use std::sync::Arc;

use crate::entities::{FormsQuestion, forms_question};
use crate::map_db_err;
use sel4c_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

/// Forms question repository for database operations.
#[derive(Clone)]
pub struct FormsQuestionRepository {
    db: Arc<DatabaseConnection>,
}

impl FormsQuestionRepository {
    /// Create a new forms question repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a question by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<forms_question::Model>> {
        FormsQuestion::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a question by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<forms_question::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Forms question {id}")))
    }

    /// All questions, ordered by ID.
    pub async fn find_all(&self) -> AppResult<Vec<forms_question::Model>> {
        FormsQuestion::find()
            .order_by_asc(forms_question::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a question.
    pub async fn create(
        &self,
        model: forms_question::ActiveModel,
    ) -> AppResult<forms_question::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a question.
    pub async fn update(
        &self,
        model: forms_question::ActiveModel,
    ) -> AppResult<forms_question::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a question. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = FormsQuestion::delete_by_id(id)
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
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_question(id: &str) -> forms_question::Model {
        forms_question::Model {
            id: id.to_string(),
            question: "How confident are you leading a team?".to_string(),
            description: "Rate from 0 to 100".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_all() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_question("q1"), create_test_question("q2")]])
                .into_connection(),
        );

        let repo = FormsQuestionRepository::new(db);
        let result = repo.find_all().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "q1");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<forms_question::Model>::new()])
                .into_connection(),
        );

        let repo = FormsQuestionRepository::new(db);
        assert!(matches!(
            repo.get_by_id("q9").await,
            Err(AppError::NotFound(_))
        ));
    }
}
