//! Forms question response service.

use chrono::Utc;
use sea_orm::Set;
use sel4c_common::{AppError, AppResult, IdGenerator};
use sel4c_db::{
    Scope,
    entities::forms_question_response,
    repositories::{FormsQuestionRepository, FormsQuestionResponseRepository},
};
use serde::Deserialize;
use validator::Validate;

/// Question response service for business logic.
#[derive(Clone)]
pub struct QuestionResponseService {
    response_repo: FormsQuestionResponseRepository,
    question_repo: FormsQuestionRepository,
    id_gen: IdGenerator,
}

/// Input for answering a forms question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionResponseInput {
    pub question_id: String,

    #[validate(range(min = 0, max = 100))]
    pub score: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub time_minutes: i32,
}

/// Input for updating an answer. The question cannot be changed.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateQuestionResponseInput {
    #[validate(range(min = 0, max = 100))]
    pub score: Option<i32>,

    #[validate(range(min = 0))]
    pub time_minutes: Option<i32>,
}

impl QuestionResponseService {
    /// Create a new question response service.
    #[must_use]
    pub const fn new(
        response_repo: FormsQuestionResponseRepository,
        question_repo: FormsQuestionRepository,
    ) -> Self {
        Self {
            response_repo,
            question_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record the caller's answer to a question.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateQuestionResponseInput,
    ) -> AppResult<forms_question_response::Model> {
        input.validate()?;

        self.question_repo.get_by_id(&input.question_id).await?;

        if self
            .response_repo
            .find_by_pair(user_id, &input.question_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A response to this question already exists for this user.".to_string(),
            ));
        }

        let model = forms_question_response::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            question_id: Set(input.question_id),
            score: Set(input.score),
            time_minutes: Set(input.time_minutes),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.response_repo.create(model).await
    }

    /// Get an answer visible in `scope`.
    pub async fn get(&self, id: &str, scope: &Scope) -> AppResult<forms_question_response::Model> {
        self.response_repo
            .find_in_scope(id, scope)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question response {id}")))
    }

    /// Answers visible in `scope`.
    pub async fn list(&self, scope: &Scope) -> AppResult<Vec<forms_question_response::Model>> {
        self.response_repo.list_in_scope(scope).await
    }

    /// Every answer, ordered by owner.
    pub async fn list_all(&self) -> AppResult<Vec<forms_question_response::Model>> {
        self.response_repo.list_in_scope(&Scope::All).await
    }

    /// Update an answer visible in `scope`.
    pub async fn update(
        &self,
        id: &str,
        scope: &Scope,
        input: UpdateQuestionResponseInput,
    ) -> AppResult<forms_question_response::Model> {
        input.validate()?;

        let mut active: forms_question_response::ActiveModel = self.get(id, scope).await?.into();
        if let Some(score) = input.score {
            active.score = Set(score);
        }
        if let Some(minutes) = input.time_minutes {
            active.time_minutes = Set(minutes);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.response_repo.update(active).await
    }

    /// Delete an answer visible in `scope`.
    pub async fn delete(&self, id: &str, scope: &Scope) -> AppResult<()> {
        let existing = self.get(id, scope).await?;
        self.response_repo.delete(&existing.id).await
    }
}
