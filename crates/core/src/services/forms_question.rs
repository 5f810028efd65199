//! Forms question catalog service.

use chrono::Utc;
use sea_orm::Set;
use sel4c_common::{AppError, AppResult, IdGenerator};
use sel4c_db::{entities::forms_question, repositories::FormsQuestionRepository};
use serde::Deserialize;
use validator::Validate;

/// Forms question service for business logic.
#[derive(Clone)]
pub struct FormsQuestionService {
    question_repo: FormsQuestionRepository,
    id_gen: IdGenerator,
}

/// Full question payload, used for creation and replacement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FormsQuestionInput {
    #[validate(length(min = 1, max = 255))]
    pub question: String,

    #[serde(default)]
    pub description: String,
}

/// Partial question update.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateFormsQuestionInput {
    #[validate(length(min = 1, max = 255))]
    pub question: Option<String>,

    pub description: Option<String>,
}

impl From<FormsQuestionInput> for UpdateFormsQuestionInput {
    fn from(input: FormsQuestionInput) -> Self {
        Self {
            question: Some(input.question),
            description: Some(input.description),
        }
    }
}

impl FormsQuestionService {
    /// Create a new forms question service.
    #[must_use]
    pub const fn new(question_repo: FormsQuestionRepository) -> Self {
        Self {
            question_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// All questions, ordered by ID.
    pub async fn list(&self) -> AppResult<Vec<forms_question::Model>> {
        self.question_repo.find_all().await
    }

    /// Get a question by ID.
    pub async fn get(&self, id: &str) -> AppResult<forms_question::Model> {
        self.question_repo.get_by_id(id).await
    }

    /// Create a question.
    pub async fn create(&self, input: FormsQuestionInput) -> AppResult<forms_question::Model> {
        input.validate()?;

        let model = forms_question::ActiveModel {
            id: Set(self.id_gen.generate()),
            question: Set(input.question),
            description: Set(input.description),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.question_repo.create(model).await
    }

    /// Update a question.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateFormsQuestionInput,
    ) -> AppResult<forms_question::Model> {
        input.validate()?;

        let mut active: forms_question::ActiveModel = self.question_repo.get_by_id(id).await?.into();
        if let Some(question) = input.question {
            active.question = Set(question);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.question_repo.update(active).await
    }

    /// Delete a question along with its responses.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.question_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Forms question {id}")));
        }
        Ok(())
    }
}
