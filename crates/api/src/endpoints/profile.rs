//! Profile data endpoints and the admin reports built on them.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use sel4c_common::AppResult;
use sel4c_core::{AdminEntry, ProfileInput, UpdateProfileInput, UserInfoEntry};
use sel4c_db::entities::user_data;

use crate::{
    extractors::AuthUser, middleware::AppState, permissions::require_superuser,
    response::ApiResponse,
};

/// Create the caller's profile.
async fn add(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ProfileInput>,
) -> AppResult<ApiResponse<user_data::Model>> {
    let profile = state.profile_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(profile))
}

async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<user_data::Model>> {
    let profile = state.profile_service.get_own(&user.id).await?;
    Ok(ApiResponse::ok(profile))
}

async fn replace_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ProfileInput>,
) -> AppResult<ApiResponse<user_data::Model>> {
    let profile = state.profile_service.update(&user.id, input.into()).await?;
    Ok(ApiResponse::ok(profile))
}

async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<user_data::Model>> {
    let profile = state.profile_service.update(&user.id, input).await?;
    Ok(ApiResponse::ok(profile))
}

/// Profiles visible to the caller.
async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<user_data::Model>>> {
    let profiles = state.profile_service.list(&auth.scope()).await?;
    Ok(ApiResponse::ok(profiles))
}

/// Combined identity, profile, and score report. Superuser only.
async fn all(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<UserInfoEntry>>> {
    require_superuser(&user)?;
    let entries = state.report_service.user_info().await?;
    Ok(ApiResponse::ok(entries))
}

/// Every superuser. Superuser only.
async fn admins(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AdminEntry>>> {
    require_superuser(&user)?;
    let entries = state.report_service.admins().await?;
    Ok(ApiResponse::ok(entries))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/info", get(list))
        .route("/info/add", post(add))
        .route("/info/me", get(me).put(replace_me).patch(update_me))
        .route("/info/all", get(all))
        .route("/admins/all", get(admins))
}
