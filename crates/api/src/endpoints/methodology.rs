//! Activity and forms question catalog endpoints.
//!
//! Reads are public; writes go through
//! [`superuser_or_read_only`](crate::permissions::superuser_or_read_only).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
};
use sel4c_common::AppResult;
use sel4c_core::{
    ActivityInput, FormsQuestionInput, UpdateActivityInput, UpdateFormsQuestionInput,
};
use sel4c_db::entities::{activity, forms_question};

use crate::{
    middleware::AppState,
    permissions::superuser_or_read_only,
    response::{ApiResponse, no_content},
};

// === Activities ===

/// All activities ordered by title.
async fn list_activities(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<activity::Model>>> {
    let activities = state.activity_service.list().await?;
    Ok(ApiResponse::ok(activities))
}

async fn create_activity(
    State(state): State<AppState>,
    Json(input): Json<ActivityInput>,
) -> AppResult<ApiResponse<activity::Model>> {
    let activity = state.activity_service.create(input).await?;
    tracing::info!(activity = %activity.id, "Activity created");
    Ok(ApiResponse::created(activity))
}

async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<activity::Model>> {
    let activity = state.activity_service.get(&id).await?;
    Ok(ApiResponse::ok(activity))
}

async fn replace_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ActivityInput>,
) -> AppResult<ApiResponse<activity::Model>> {
    let activity = state.activity_service.update(&id, input.into()).await?;
    Ok(ApiResponse::ok(activity))
}

async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateActivityInput>,
) -> AppResult<ApiResponse<activity::Model>> {
    let activity = state.activity_service.update(&id, input).await?;
    Ok(ApiResponse::ok(activity))
}

async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.activity_service.delete(&id).await?;
    tracing::info!(activity = %id, "Activity deleted");
    Ok(no_content())
}

/// Direct children of an activity ordered by title.
async fn sub_activities(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<activity::Model>>> {
    let children = state.activity_service.sub_activities(&id).await?;
    Ok(ApiResponse::ok(children))
}

// === Forms questions ===

async fn list_questions(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<forms_question::Model>>> {
    let questions = state.forms_question_service.list().await?;
    Ok(ApiResponse::ok(questions))
}

async fn create_question(
    State(state): State<AppState>,
    Json(input): Json<FormsQuestionInput>,
) -> AppResult<ApiResponse<forms_question::Model>> {
    let question = state.forms_question_service.create(input).await?;
    Ok(ApiResponse::created(question))
}

async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<forms_question::Model>> {
    let question = state.forms_question_service.get(&id).await?;
    Ok(ApiResponse::ok(question))
}

async fn replace_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<FormsQuestionInput>,
) -> AppResult<ApiResponse<forms_question::Model>> {
    let question = state
        .forms_question_service
        .update(&id, input.into())
        .await?;
    Ok(ApiResponse::ok(question))
}

async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateFormsQuestionInput>,
) -> AppResult<ApiResponse<forms_question::Model>> {
    let question = state.forms_question_service.update(&id, input).await?;
    Ok(ApiResponse::ok(question))
}

async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.forms_question_service.delete(&id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/activities", get(list_activities).post(create_activity))
        .route(
            "/activities/{id}",
            get(get_activity)
                .put(replace_activity)
                .patch(update_activity)
                .delete(delete_activity),
        )
        .route("/activities/{id}/sub-activities", get(sub_activities))
        .route("/formsquestions", get(list_questions).post(create_question))
        .route(
            "/formsquestions/{id}",
            get(get_question)
                .put(replace_question)
                .patch(update_question)
                .delete(delete_question),
        )
        .route_layer(middleware::from_fn(superuser_or_read_only))
}
