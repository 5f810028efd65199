//! Module completion repository.

use std::sync::Arc;

use crate::Scope;
use crate::entities::{ModuleCompletion, module_completion};
use crate::map_db_err;
use sel4c_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Module completion repository for database operations.
#[derive(Clone)]
pub struct ModuleCompletionRepository {
    db: Arc<DatabaseConnection>,
}

impl ModuleCompletionRepository {
    /// Create a new module completion repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's completion mark for a module.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        activity_id: &str,
    ) -> AppResult<Option<module_completion::Model>> {
        ModuleCompletion::find()
            .filter(module_completion::Column::UserId.eq(user_id))
            .filter(module_completion::Column::ActivityId.eq(activity_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Completion marks visible in `scope`.
    pub async fn list_in_scope(&self, scope: &Scope) -> AppResult<Vec<module_completion::Model>> {
        let query = match scope.owner() {
            None => ModuleCompletion::find()
                .order_by_asc(module_completion::Column::UserId)
                .order_by_asc(module_completion::Column::ActivityId),
            Some(owner) => ModuleCompletion::find()
                .filter(module_completion::Column::UserId.eq(owner))
                .order_by_asc(module_completion::Column::ActivityId),
        };

        query.all(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Record a completion.
    pub async fn create(
        &self,
        model: module_completion::ActiveModel,
    ) -> AppResult<module_completion::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }
}
