//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::Set;
use sel4c_common::{AppError, AppResult, IdGenerator};
use sel4c_db::{entities::user, repositories::UserRepository};
use serde::Deserialize;
use validator::Validate;

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Unable to authenticate with provided credentials.";

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(length(min = 5, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Input for updating a user. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(email, length(max = 254))]
    pub email: Option<String>,

    #[validate(length(min = 5, max = 128))]
    pub password: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

impl From<CreateUserInput> for UpdateUserInput {
    fn from(input: CreateUserInput) -> Self {
        Self {
            email: Some(input.email),
            password: Some(input.password),
            name: Some(input.name),
        }
    }
}

/// Credentials exchanged for an access token.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

/// Account flags granted at creation time.
#[derive(Debug, Clone, Copy, Default)]
struct Role {
    is_staff: bool,
    is_superuser: bool,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a regular user.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        self.create_with_role(input, Role::default()).await
    }

    /// Register a staff superuser.
    pub async fn create_superuser(&self, input: CreateUserInput) -> AppResult<user::Model> {
        let role = Role {
            is_staff: true,
            is_superuser: true,
        };
        self.create_with_role(input, role).await
    }

    async fn create_with_role(&self, input: CreateUserInput, role: Role) -> AppResult<user::Model> {
        input.validate()?;

        let email = normalize_email(&input.email);
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "user with this email already exists.".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email),
            name: Set(input.name),
            password: Set(password_hash),
            token: Set(None),
            is_active: Set(true),
            is_staff: Set(role.is_staff),
            is_superuser: Set(role.is_superuser),
            last_login: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, superuser = role.is_superuser, "Created user");
        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Authenticate a user by token.
    ///
    /// Tokens belonging to deactivated accounts are rejected.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Verify credentials and issue a fresh token, replacing any previous one.
    pub async fn issue_token(&self, request: TokenRequest) -> AppResult<(user::Model, String)> {
        let invalid = || AppError::BadRequest(INVALID_CREDENTIALS.to_string());

        let user = self
            .user_repo
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or_else(invalid)?;

        if !user.is_active || !verify_password(&request.password, &user.password)? {
            return Err(invalid());
        }

        let token = self.id_gen.generate_token();
        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(token.clone()));
        active.last_login = Set(Some(Utc::now().into()));

        let user = self.user_repo.update(active).await?;
        tracing::debug!(user_id = %user.id, "Issued access token");
        Ok((user, token))
    }

    /// Update a user's own account.
    pub async fn update(&self, user_id: &str, input: UpdateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.clone().into();

        if let Some(email) = input.email {
            let email = normalize_email(&email);
            if email != user.email {
                if self.user_repo.find_by_email(&email).await?.is_some() {
                    return Err(AppError::Conflict(
                        "user with this email already exists.".to_string(),
                    ));
                }
                active.email = Set(email);
            }
        }

        if let Some(name) = input.name {
            active.name = Set(name);
        }

        if let Some(password) = input.password {
            active.password = Set(hash_password(&password)?);
        }

        active.updated_at = Set(Some(Utc::now().into()));
        self.user_repo.update(active).await
    }

    /// Deactivate an account and revoke its token.
    pub async fn deactivate(&self, user_id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.is_active = Set(false);
        active.token = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));

        let user = self.user_repo.update(active).await?;
        tracing::info!(user_id = %user.id, "Deactivated user");
        Ok(user)
    }
}

/// Emails are stored and looked up fully lower-cased.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, email: &str, password: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: email.to_string(),
            name: "Test User".to_string(),
            password: hash_password(password).unwrap(),
            token: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: DatabaseConnection) -> UserService {
        UserService::new(UserRepository::new(Arc::new(db)))
    }

    fn input(email: &str, password: &str) -> CreateUserInput {
        CreateUserInput {
            email: email.to_string(),
            password: password.to_string(),
            name: "Test User".to_string(),
        }
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("test_password_123", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("test", "invalid_hash").is_err());
    }

    #[test]
    fn test_normalize_email_lowercases_everything() {
        assert_eq!(normalize_email("  Ana.Torres@EXAMPLE.com "), "ana.torres@example.com");
    }

    #[test]
    fn test_create_input_rejects_empty_email() {
        assert!(input("", "secret").validate().is_err());
    }

    #[test]
    fn test_create_input_rejects_short_password() {
        assert!(input("ana@example.com", "pw").validate().is_err());
        assert!(input("ana@example.com", "pw123").validate().is_ok());
    }

    #[tokio::test]
    async fn test_create_stores_hashed_lowercase_email() {
        let stored = create_test_user("u1", "ana@example.com", "secret");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([[stored]])
            .into_connection();

        let user = service(db)
            .create(input("Ana@Example.com", "secret"))
            .await
            .unwrap();

        assert_eq!(user.email, "ana@example.com");
        assert!(verify_password("secret", &user.password).unwrap());
        assert!(!user.is_staff && !user.is_superuser);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        let existing = create_test_user("u1", "ana@example.com", "secret");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();

        let result = service(db).create(input("ana@example.com", "secret")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_invalid_input_skips_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(db).create(input("ana@example.com", "abc")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_issue_token_rotates() {
        let user = create_test_user("u1", "ana@example.com", "secret");
        let mut updated = user.clone();
        updated.token = Some("a".repeat(40));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .append_query_results([[updated]])
            .into_connection();

        let (_, token) = service(db)
            .issue_token(TokenRequest {
                email: "ANA@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(token.len(), 40);
    }

    #[tokio::test]
    async fn test_issue_token_wrong_password() {
        let user = create_test_user("u1", "ana@example.com", "secret");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();

        let result = service(db)
            .issue_token(TokenRequest {
                email: "ana@example.com".to_string(),
                password: "nope!".to_string(),
            })
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, INVALID_CREDENTIALS),
            _ => panic!("Expected BadRequest error"),
        }
    }

    #[tokio::test]
    async fn test_issue_token_inactive_user() {
        let mut user = create_test_user("u1", "ana@example.com", "secret");
        user.is_active = false;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();

        let result = service(db)
            .issue_token(TokenRequest {
                email: "ana@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_rejects_inactive() {
        let mut user = create_test_user("u1", "ana@example.com", "secret");
        user.is_active = false;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();

        let result = service(db).authenticate_by_token("tok").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_unknown() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = service(db).authenticate_by_token("tok").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_deactivate_clears_token() {
        let mut user = create_test_user("u1", "ana@example.com", "secret");
        user.token = Some("t".repeat(40));
        let mut updated = user.clone();
        updated.is_active = false;
        updated.token = None;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .append_query_results([[updated]])
            .into_connection();

        let result = service(db).deactivate("u1").await.unwrap();
        assert!(!result.is_active);
        assert!(result.token.is_none());
    }
}
