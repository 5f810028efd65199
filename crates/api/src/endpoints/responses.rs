//! Activity and forms question response endpoints.
//!
//! Every route requires authentication. Single-record routes apply the
//! caller's scope, so another user's record reads as missing.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use sel4c_common::{AppError, AppResult};
use sel4c_core::{
    CreateActivityResponseInput, CreateQuestionResponseInput, MediaKind,
    UpdateActivityResponseInput, UpdateQuestionResponseInput,
};
use sel4c_db::entities::{activity_response, forms_question_response, module_completion};
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    permissions::require_staff,
    response::{ApiResponse, no_content},
};

/// Largest accepted media upload.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

// === Activity responses ===

async fn list_activity_responses(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<activity_response::Model>>> {
    let responses = state.activity_response_service.list(&auth.scope()).await?;
    Ok(ApiResponse::ok(responses))
}

async fn create_activity_response(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateActivityResponseInput>,
) -> AppResult<ApiResponse<activity_response::Model>> {
    let response = state
        .activity_response_service
        .create(&user.id, input)
        .await?;
    Ok(ApiResponse::created(response))
}

async fn get_activity_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<activity_response::Model>> {
    let response = state
        .activity_response_service
        .get(&id, &auth.scope())
        .await?;
    Ok(ApiResponse::ok(response))
}

async fn replace_activity_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateActivityResponseInput>,
) -> AppResult<ApiResponse<activity_response::Model>> {
    let response = state
        .activity_response_service
        .update(&id, &auth.scope(), input, false)
        .await?;
    Ok(ApiResponse::ok(response))
}

async fn update_activity_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateActivityResponseInput>,
) -> AppResult<ApiResponse<activity_response::Model>> {
    let response = state
        .activity_response_service
        .update(&id, &auth.scope(), input, true)
        .await?;
    Ok(ApiResponse::ok(response))
}

async fn delete_activity_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .activity_response_service
        .delete(&id, &auth.scope())
        .await?;
    Ok(no_content())
}

/// Every activity response. Staff only.
async fn all_activity_responses(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<activity_response::Model>>> {
    require_staff(&user)?;
    let responses = state.activity_response_service.list_all().await?;
    Ok(ApiResponse::ok(responses))
}

// === Question responses ===

async fn list_question_responses(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<forms_question_response::Model>>> {
    let responses = state.question_response_service.list(&auth.scope()).await?;
    Ok(ApiResponse::ok(responses))
}

async fn create_question_response(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateQuestionResponseInput>,
) -> AppResult<ApiResponse<forms_question_response::Model>> {
    let response = state
        .question_response_service
        .create(&user.id, input)
        .await?;
    Ok(ApiResponse::created(response))
}

async fn get_question_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<forms_question_response::Model>> {
    let response = state
        .question_response_service
        .get(&id, &auth.scope())
        .await?;
    Ok(ApiResponse::ok(response))
}

async fn update_question_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateQuestionResponseInput>,
) -> AppResult<ApiResponse<forms_question_response::Model>> {
    let response = state
        .question_response_service
        .update(&id, &auth.scope(), input)
        .await?;
    Ok(ApiResponse::ok(response))
}

async fn delete_question_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .question_response_service
        .delete(&id, &auth.scope())
        .await?;
    Ok(no_content())
}

/// Every question response. Staff only.
async fn all_question_responses(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<forms_question_response::Model>>> {
    require_staff(&user)?;
    let responses = state.question_response_service.list_all().await?;
    Ok(ApiResponse::ok(responses))
}

// === Media ===

/// Stored media file.
#[derive(Debug, Serialize)]
pub struct MediaUploadResponse {
    /// Value to send as the matching payload field of an activity response.
    pub key: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
    pub md5: String,
}

/// Upload a media file via multipart form (field `file`).
async fn upload_media(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<MediaUploadResponse>> {
    let kind = MediaKind::parse(&kind)?;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file = Some((file_name, content_type, data.to_vec()));
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let uploaded = state
        .media_service
        .upload(kind, &file_name, &content_type, &data)
        .await?;
    tracing::info!(user = %user.id, key = %uploaded.key, size = uploaded.size, "Media uploaded");

    Ok(ApiResponse::created(MediaUploadResponse {
        key: uploaded.key,
        url: uploaded.url,
        size: uploaded.size,
        content_type: uploaded.content_type,
        md5: uploaded.md5,
    }))
}

// === Module completion ===

async fn complete_module(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
) -> AppResult<ApiResponse<module_completion::Model>> {
    let completion = state
        .completion_service
        .complete(&user.id, &activity_id)
        .await?;
    Ok(ApiResponse::created(completion))
}

async fn list_completions(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<module_completion::Model>>> {
    let completions = state.completion_service.list(&auth.scope()).await?;
    Ok(ApiResponse::ok(completions))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/activity",
            get(list_activity_responses).post(create_activity_response),
        )
        .route(
            "/activity/{id}",
            get(get_activity_response)
                .put(replace_activity_response)
                .patch(update_activity_response)
                .delete(delete_activity_response),
        )
        .route("/activities-responses", get(all_activity_responses))
        .route(
            "/question",
            get(list_question_responses).post(create_question_response),
        )
        .route(
            "/question/{id}",
            get(get_question_response)
                .put(update_question_response)
                .patch(update_question_response)
                .delete(delete_question_response),
        )
        .route("/questions-responses", get(all_question_responses))
        .route(
            "/media/{kind}",
            post(upload_media).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/completed-module/{activity_id}", post(complete_module))
        .route("/complete-modules", get(list_completions))
}
