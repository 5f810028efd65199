//! Forms question response repository.

use std::sync::Arc;

use crate::Scope;
use crate::entities::{FormsQuestionResponse, forms_question_response};
use crate::map_db_err;
use sel4c_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Forms question response repository for database operations.
#[derive(Clone)]
pub struct FormsQuestionResponseRepository {
    db: Arc<DatabaseConnection>,
}

impl FormsQuestionResponseRepository {
    /// Create a new forms question response repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a response by ID, restricted to `scope`.
    pub async fn find_in_scope(
        &self,
        id: &str,
        scope: &Scope,
    ) -> AppResult<Option<forms_question_response::Model>> {
        let mut query =
            FormsQuestionResponse::find().filter(forms_question_response::Column::Id.eq(id));
        if let Some(owner) = scope.owner() {
            query = query.filter(forms_question_response::Column::UserId.eq(owner));
        }

        query.one(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Find the response a user gave to a question.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> AppResult<Option<forms_question_response::Model>> {
        FormsQuestionResponse::find()
            .filter(forms_question_response::Column::UserId.eq(user_id))
            .filter(forms_question_response::Column::QuestionId.eq(question_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Responses visible in `scope`: all by owner, or one owner's by question.
    pub async fn list_in_scope(
        &self,
        scope: &Scope,
    ) -> AppResult<Vec<forms_question_response::Model>> {
        let query = match scope.owner() {
            None => FormsQuestionResponse::find()
                .order_by_asc(forms_question_response::Column::UserId)
                .order_by_asc(forms_question_response::Column::QuestionId),
            Some(owner) => FormsQuestionResponse::find()
                .filter(forms_question_response::Column::UserId.eq(owner))
                .order_by_asc(forms_question_response::Column::QuestionId),
        };

        query.all(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Create a response.
    pub async fn create(
        &self,
        model: forms_question_response::ActiveModel,
    ) -> AppResult<forms_question_response::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a response.
    pub async fn update(
        &self,
        model: forms_question_response::ActiveModel,
    ) -> AppResult<forms_question_response::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a response by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        FormsQuestionResponse::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}
