//! Module completion service.
//!
//! A module is a top-level activity. It can be marked complete once the user
//! has responded to each of its sub-activities.

use chrono::Utc;
use sea_orm::Set;
use sel4c_common::{AppError, AppResult, IdGenerator};
use sel4c_db::{
    Scope,
    entities::module_completion,
    repositories::{ActivityRepository, ActivityResponseRepository, ModuleCompletionRepository},
};

/// Module completion service for business logic.
#[derive(Clone)]
pub struct CompletionService {
    completion_repo: ModuleCompletionRepository,
    activity_repo: ActivityRepository,
    response_repo: ActivityResponseRepository,
    id_gen: IdGenerator,
}

impl CompletionService {
    /// Create a new module completion service.
    #[must_use]
    pub const fn new(
        completion_repo: ModuleCompletionRepository,
        activity_repo: ActivityRepository,
        response_repo: ActivityResponseRepository,
    ) -> Self {
        Self {
            completion_repo,
            activity_repo,
            response_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Mark a module complete for a user.
    pub async fn complete(
        &self,
        user_id: &str,
        activity_id: &str,
    ) -> AppResult<module_completion::Model> {
        let module = self.activity_repo.get_by_id(activity_id).await?;
        if module.parent_id.is_some() {
            return Err(AppError::BadRequest(
                "Only top-level activities can be completed as modules.".to_string(),
            ));
        }

        let child_ids: Vec<String> = self
            .activity_repo
            .find_children(activity_id)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();
        let answered = self
            .response_repo
            .find_by_user_and_activities(user_id, &child_ids)
            .await?
            .len();
        if answered < child_ids.len() {
            return Err(AppError::BadRequest(format!(
                "{} of {} sub-activities still need a response.",
                child_ids.len() - answered,
                child_ids.len()
            )));
        }

        if self
            .completion_repo
            .find_by_pair(user_id, activity_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Module already completed.".to_string()));
        }

        let model = module_completion::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            activity_id: Set(activity_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let completion = self.completion_repo.create(model).await?;
        tracing::info!(user_id = %user_id, activity_id = %activity_id, "Module completed");
        Ok(completion)
    }

    /// Completion marks visible in `scope`.
    pub async fn list(&self, scope: &Scope) -> AppResult<Vec<module_completion::Model>> {
        self.completion_repo.list_in_scope(scope).await
    }
}
