//! Initial and final score endpoints.

use axum::{Json, Router, extract::State, routing::get};
use sel4c_common::AppResult;
use sel4c_core::ScoreInput;
use sel4c_db::entities::user_score::{self, ScoreKind};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn list(
    auth: &AuthUser,
    state: &AppState,
    kind: ScoreKind,
) -> AppResult<ApiResponse<Vec<user_score::Model>>> {
    let scores = state.score_service.list(&auth.scope(), kind).await?;
    Ok(ApiResponse::ok(scores))
}

async fn create(
    auth: &AuthUser,
    state: &AppState,
    kind: ScoreKind,
    input: ScoreInput,
) -> AppResult<ApiResponse<user_score::Model>> {
    let score = state.score_service.create(&auth.0.id, kind, input).await?;
    Ok(ApiResponse::created(score))
}

async fn list_initial(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<user_score::Model>>> {
    list(&auth, &state, ScoreKind::Initial).await
}

async fn create_initial(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ScoreInput>,
) -> AppResult<ApiResponse<user_score::Model>> {
    create(&auth, &state, ScoreKind::Initial, input).await
}

async fn list_final(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<user_score::Model>>> {
    list(&auth, &state, ScoreKind::Final).await
}

async fn create_final(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ScoreInput>,
) -> AppResult<ApiResponse<user_score::Model>> {
    create(&auth, &state, ScoreKind::Final, input).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scores/initial", get(list_initial).post(create_initial))
        .route("/scores/final", get(list_final).post(create_final))
}
