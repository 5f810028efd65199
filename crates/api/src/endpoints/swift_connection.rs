//! Client connection endpoints: per-user defaults for the mobile app.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use sel4c_common::AppResult;
use sel4c_core::UserDefaultsInput;
use sel4c_db::entities::user_defaults;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Store the caller's defaults.
async fn add(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UserDefaultsInput>,
) -> AppResult<ApiResponse<user_defaults::Model>> {
    let defaults = state.user_defaults_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(defaults))
}

async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<user_defaults::Model>> {
    let defaults = state.user_defaults_service.get_own(&user.id).await?;
    Ok(ApiResponse::ok(defaults))
}

async fn replace_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UserDefaultsInput>,
) -> AppResult<ApiResponse<user_defaults::Model>> {
    let defaults = state
        .user_defaults_service
        .update(&user.id, input, false)
        .await?;
    Ok(ApiResponse::ok(defaults))
}

/// Merge keys into the caller's defaults; `null` removes a key.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UserDefaultsInput>,
) -> AppResult<ApiResponse<user_defaults::Model>> {
    let defaults = state
        .user_defaults_service
        .update(&user.id, input, true)
        .await?;
    Ok(ApiResponse::ok(defaults))
}

pub fn router() -> Router<AppState> {
    let own = get(me).put(replace_me).patch(update_me);
    Router::new()
        .route("/user-default/add", post(add))
        .route("/user-default/", own.clone())
        .route("/user-default", own)
}
