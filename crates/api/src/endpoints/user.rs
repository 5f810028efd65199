//! Account endpoints: registration, tokens, and the caller's account.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use sel4c_common::AppResult;
use sel4c_core::{CreateUserInput, TokenRequest, UpdateUserInput};
use sel4c_db::entities::user;
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    permissions::require_superuser,
    response::{ApiResponse, no_content},
};

/// Public account fields.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
        }
    }
}

/// Issued access token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a regular user.
async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.create(input).await?;
    Ok(ApiResponse::created(user.into()))
}

/// Register a staff superuser. Superuser only.
async fn create_with_permissions(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    require_superuser(&caller)?;
    let user = state.user_service.create_superuser(input).await?;
    tracing::info!(created = %user.id, by = %caller.id, "Superuser account created");
    Ok(ApiResponse::created(user.into()))
}

/// Exchange credentials for a fresh token.
async fn token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let (_, token) = state.user_service.issue_token(req).await?;
    Ok(ApiResponse::ok(TokenResponse { token }))
}

/// The caller's account.
async fn me(AuthUser(user): AuthUser) -> AppResult<ApiResponse<UserResponse>> {
    Ok(ApiResponse::ok(user.into()))
}

/// Replace the caller's account fields.
async fn replace_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state.user_service.update(&user.id, input.into()).await?;
    Ok(ApiResponse::ok(updated.into()))
}

/// Update some of the caller's account fields.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state.user_service.update(&user.id, input).await?;
    Ok(ApiResponse::ok(updated.into()))
}

/// Deactivate an account. Superuser only.
async fn deactivate(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    require_superuser(&caller)?;
    state.user_service.deactivate(&id).await?;
    tracing::info!(user = %id, by = %caller.id, "Account deactivated");
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/create/with-permissions", post(create_with_permissions))
        .route("/token", post(token))
        .route("/me", get(me).put(replace_me).patch(update_me))
        .route("/{id}/deactivate", delete(deactivate))
}
