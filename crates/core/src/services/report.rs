//! Admin reporting.
//!
//! Joins accounts, profiles and both score records in application code.

use std::collections::HashMap;

use sel4c_common::AppResult;
use sel4c_db::{
    entities::{user, user_data, user_score, user_score::ScoreKind},
    repositories::{UserDataRepository, UserRepository, UserScoreRepository},
};
use serde::Serialize;

/// Report service for business logic.
#[derive(Clone)]
pub struct ReportService {
    user_repo: UserRepository,
    profile_repo: UserDataRepository,
    score_repo: UserScoreRepository,
}

/// One scale set as reported to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub id: String,
    pub self_control: i32,
    pub leadership: i32,
    pub social_awareness: i32,
    pub social_innovation: i32,
    pub systemic_thinking: i32,
    pub scientific_thinking: i32,
    pub critical_thinking: i32,
    pub innovative_thinking: i32,
}

impl From<user_score::Model> for ScoreSummary {
    fn from(score: user_score::Model) -> Self {
        Self {
            id: score.id,
            self_control: score.self_control,
            leadership: score.leadership,
            social_awareness: score.social_awareness,
            social_innovation: score.social_innovation,
            systemic_thinking: score.systemic_thinking,
            scientific_thinking: score.scientific_thinking,
            critical_thinking: score.critical_thinking,
            innovative_thinking: score.innovative_thinking,
        }
    }
}

/// A non-admin user with their profile and both self-assessments.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfoEntry {
    pub user: String,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub full_name: String,
    pub academic_degree: String,
    pub institution: String,
    pub gender: String,
    pub age: i32,
    pub country: String,
    pub discipline: String,
    pub initial_score: Option<ScoreSummary>,
    pub final_score: Option<ScoreSummary>,
}

/// Identity fields of an admin account.
#[derive(Debug, Clone, Serialize)]
pub struct AdminEntry {
    pub user: String,
    pub name: String,
    pub email: String,
    pub is_active: bool,
}

impl From<user::Model> for AdminEntry {
    fn from(user: user::Model) -> Self {
        Self {
            user: user.id,
            name: user.name,
            email: user.email,
            is_active: user.is_active,
        }
    }
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        profile_repo: UserDataRepository,
        score_repo: UserScoreRepository,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            score_repo,
        }
    }

    /// Every non-superuser that has a profile, ordered by user id.
    pub async fn user_info(&self) -> AppResult<Vec<UserInfoEntry>> {
        let profiles = self.profile_repo.find_all().await?;
        let ids: Vec<String> = profiles.iter().map(|p| p.user_id.clone()).collect();

        let users: HashMap<String, user::Model> = self
            .user_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .filter(|u| !u.is_superuser)
            .map(|u| (u.id.clone(), u))
            .collect();

        let mut scores: HashMap<(String, ScoreKind), user_score::Model> = self
            .score_repo
            .find_by_user_ids(&ids)
            .await?
            .into_iter()
            .map(|s| ((s.user_id.clone(), s.kind), s))
            .collect();

        let entries: Vec<UserInfoEntry> = profiles
            .into_iter()
            .filter_map(|profile| {
                let user = users.get(&profile.user_id)?;
                let initial = scores.remove(&(profile.user_id.clone(), ScoreKind::Initial));
                let last = scores.remove(&(profile.user_id.clone(), ScoreKind::Final));
                Some(combine(user, profile, initial, last))
            })
            .collect();

        tracing::debug!(count = entries.len(), "Built user info report");
        Ok(entries)
    }

    /// Every superuser, ordered by user id.
    pub async fn admins(&self) -> AppResult<Vec<AdminEntry>> {
        Ok(self
            .user_repo
            .find_superusers()
            .await?
            .into_iter()
            .map(AdminEntry::from)
            .collect())
    }
}

fn combine(
    user: &user::Model,
    profile: user_data::Model,
    initial: Option<user_score::Model>,
    last: Option<user_score::Model>,
) -> UserInfoEntry {
    UserInfoEntry {
        user: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        is_active: user.is_active,
        full_name: profile.full_name,
        academic_degree: profile.academic_degree,
        institution: profile.institution,
        gender: profile.gender,
        age: profile.age,
        country: profile.country,
        discipline: profile.discipline,
        initial_score: initial.map(ScoreSummary::from),
        final_score: last.map(ScoreSummary::from),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn user(id: &str, is_superuser: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: id.to_uppercase(),
            password: String::new(),
            token: None,
            is_active: true,
            is_staff: is_superuser,
            is_superuser,
            last_login: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn profile(user_id: &str) -> user_data::Model {
        user_data::Model {
            user_id: user_id.to_string(),
            full_name: format!("{user_id} full"),
            academic_degree: "BSc".to_string(),
            institution: "Tec".to_string(),
            gender: "X".to_string(),
            age: 30,
            country: "MX".to_string(),
            discipline: "Math".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn score(user_id: &str, kind: ScoreKind) -> user_score::Model {
        user_score::Model {
            id: format!("{user_id}-{}", kind.as_str()),
            user_id: user_id.to_string(),
            kind,
            self_control: 1,
            leadership: 2,
            social_awareness: 3,
            social_innovation: 4,
            systemic_thinking: 5,
            scientific_thinking: 6,
            critical_thinking: 7,
            innovative_thinking: 8,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_user_info_joins_and_skips_admins() {
        let users_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user("a", false), user("b", false), user("z", true)]])
            .into_connection();
        let profiles_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[profile("a"), profile("b"), profile("z")]])
            .into_connection();
        let scores_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[score("a", ScoreKind::Initial), score("a", ScoreKind::Final)]])
            .into_connection();

        let service = ReportService::new(
            UserRepository::new(Arc::new(users_db)),
            UserDataRepository::new(Arc::new(profiles_db)),
            UserScoreRepository::new(Arc::new(scores_db)),
        );

        let report = service.user_info().await.unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].user, "a");
        assert_eq!(report[0].initial_score.as_ref().unwrap().id, "a-initial");
        assert_eq!(report[0].final_score.as_ref().unwrap().leadership, 2);
        assert_eq!(report[1].user, "b");
        assert!(report[1].initial_score.is_none());
        assert!(report[1].final_score.is_none());
    }

    #[test]
    fn test_absent_scores_serialize_as_null() {
        let entry = combine(&user("a", false), profile("a"), None, None);
        let json = serde_json::to_value(entry).unwrap();

        assert!(json["initial_score"].is_null());
        assert!(json["final_score"].is_null());
        assert_eq!(json["user"], "a");
        assert_eq!(json["full_name"], "a full");
    }
}
