//! Initial/final self-assessment score service.

use chrono::Utc;
use sea_orm::Set;
use sel4c_common::{AppError, AppResult, IdGenerator};
use sel4c_db::{
    Scope,
    entities::{user_score, user_score::ScoreKind},
    repositories::UserScoreRepository,
};
use serde::Deserialize;
use validator::Validate;

/// Score service for business logic.
#[derive(Clone)]
pub struct ScoreService {
    score_repo: UserScoreRepository,
    id_gen: IdGenerator,
}

/// The eight competency scales. Omitted scales default to 0.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ScoreInput {
    #[validate(range(min = 0, max = 100))]
    pub self_control: i32,
    #[validate(range(min = 0, max = 100))]
    pub leadership: i32,
    #[validate(range(min = 0, max = 100))]
    pub social_awareness: i32,
    #[validate(range(min = 0, max = 100))]
    pub social_innovation: i32,
    #[validate(range(min = 0, max = 100))]
    pub systemic_thinking: i32,
    #[validate(range(min = 0, max = 100))]
    pub scientific_thinking: i32,
    #[validate(range(min = 0, max = 100))]
    pub critical_thinking: i32,
    #[validate(range(min = 0, max = 100))]
    pub innovative_thinking: i32,
}

impl ScoreService {
    /// Create a new score service.
    #[must_use]
    pub const fn new(score_repo: UserScoreRepository) -> Self {
        Self {
            score_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record the caller's score of `kind`. Each kind can be recorded once.
    pub async fn create(
        &self,
        user_id: &str,
        kind: ScoreKind,
        input: ScoreInput,
    ) -> AppResult<user_score::Model> {
        input.validate()?;

        if self.score_repo.find_by_user(user_id, kind).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "{} score already recorded for this user.",
                kind.as_str()
            )));
        }

        let model = user_score::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            kind: Set(kind),
            self_control: Set(input.self_control),
            leadership: Set(input.leadership),
            social_awareness: Set(input.social_awareness),
            social_innovation: Set(input.social_innovation),
            systemic_thinking: Set(input.systemic_thinking),
            scientific_thinking: Set(input.scientific_thinking),
            critical_thinking: Set(input.critical_thinking),
            innovative_thinking: Set(input.innovative_thinking),
            created_at: Set(Utc::now().into()),
        };

        let score = self.score_repo.create(model).await?;
        tracing::debug!(user_id = %user_id, kind = kind.as_str(), "Recorded score");
        Ok(score)
    }

    /// Score records of `kind` visible in `scope`.
    pub async fn list(&self, scope: &Scope, kind: ScoreKind) -> AppResult<Vec<user_score::Model>> {
        self.score_repo.find_in_scope(scope, kind).await
    }
}
