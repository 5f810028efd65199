//! Initial/final score repository.

use std::sync::Arc;

use crate::Scope;
use crate::entities::{UserScore, user_score, user_score::ScoreKind};
use crate::map_db_err;
use sel4c_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Score repository for database operations.
#[derive(Clone)]
pub struct UserScoreRepository {
    db: Arc<DatabaseConnection>,
}

impl UserScoreRepository {
    /// Create a new score repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's score record of the given kind.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        kind: ScoreKind,
    ) -> AppResult<Option<user_score::Model>> {
        UserScore::find()
            .filter(user_score::Column::UserId.eq(user_id))
            .filter(user_score::Column::Kind.eq(kind))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Score records of one kind visible in `scope`, ordered by owner.
    pub async fn find_in_scope(
        &self,
        scope: &Scope,
        kind: ScoreKind,
    ) -> AppResult<Vec<user_score::Model>> {
        let mut query = UserScore::find().filter(user_score::Column::Kind.eq(kind));
        if let Some(owner) = scope.owner() {
            query = query.filter(user_score::Column::UserId.eq(owner));
        }

        query
            .order_by_asc(user_score::Column::UserId)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Score records of both kinds for a set of users.
    pub async fn find_by_user_ids(&self, user_ids: &[String]) -> AppResult<Vec<user_score::Model>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        UserScore::find()
            .filter(user_score::Column::UserId.is_in(user_ids.to_vec()))
            .order_by_asc(user_score::Column::UserId)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a score record.
    pub async fn create(&self, model: user_score::ActiveModel) -> AppResult<user_score::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_score(id: &str, user_id: &str, kind: ScoreKind) -> user_score::Model {
        user_score::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            kind,
            self_control: 50,
            leadership: 60,
            social_awareness: 70,
            social_innovation: 80,
            systemic_thinking: 90,
            scientific_thinking: 100,
            critical_thinking: 0,
            innovative_thinking: 10,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let score = create_test_score("s1", "user1", ScoreKind::Initial);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[score]])
                .into_connection(),
        );

        let repo = UserScoreRepository::new(db);
        let found = repo
            .find_by_user("user1", ScoreKind::Initial)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.kind, ScoreKind::Initial);
        assert_eq!(found.leadership, 60);
    }

    #[tokio::test]
    async fn test_find_in_scope_all() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_score("s1", "a", ScoreKind::Final),
                    create_test_score("s2", "b", ScoreKind::Final),
                ]])
                .into_connection(),
        );

        let repo = UserScoreRepository::new(db);
        let result = repo
            .find_in_scope(&Scope::All, ScoreKind::Final)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_user_ids_empty() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = UserScoreRepository::new(db);
        assert!(repo.find_by_user_ids(&[]).await.unwrap().is_empty());
    }
}
