//! Activity response service.
//!
//! An activity response carries exactly one payload, chosen by its
//! `response_type`: text in `string_response`, or the storage key of an
//! uploaded image, video or audio file. Payload fields that do not match the
//! declared type are dropped before anything is written. A media payload must
//! name an existing upload of the same kind, and the stored file is released
//! when the response lets go of it.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use sel4c_common::{AppError, AppResult, IdGenerator, StorageBackend};
use sel4c_db::{
    Scope,
    entities::{activity_response, activity_response::ResponseType},
    repositories::{ActivityRepository, ActivityResponseRepository},
};
use serde::Deserialize;
use validator::Validate;

/// Activity response service for business logic.
#[derive(Clone)]
pub struct ActivityResponseService {
    response_repo: ActivityResponseRepository,
    activity_repo: ActivityRepository,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

/// The four mutually exclusive payload fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResponsePayload {
    #[serde(default)]
    pub string_response: Option<String>,
    #[serde(default)]
    pub image_response: Option<String>,
    #[serde(default)]
    pub video_response: Option<String>,
    #[serde(default)]
    pub audio_response: Option<String>,
}

impl ResponsePayload {
    fn slot(&self, kind: ResponseType) -> &Option<String> {
        match kind {
            ResponseType::Text => &self.string_response,
            ResponseType::Image => &self.image_response,
            ResponseType::Video => &self.video_response,
            ResponseType::Audio => &self.audio_response,
        }
    }

    fn slot_mut(&mut self, kind: ResponseType) -> &mut Option<String> {
        match kind {
            ResponseType::Text => &mut self.string_response,
            ResponseType::Image => &mut self.image_response,
            ResponseType::Video => &mut self.video_response,
            ResponseType::Audio => &mut self.audio_response,
        }
    }

    /// Keep only the field matching `kind`, which must be present and non-empty.
    ///
    /// Media fields must also look like a storage key of their own kind
    /// (`image/<name>` for images and so on).
    pub fn resolve(mut self, kind: ResponseType) -> AppResult<Self> {
        let value = self
            .slot_mut(kind)
            .take()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Validation(missing_payload_message(kind).to_string()))?;

        if kind != ResponseType::Text && !is_media_key(kind, &value) {
            return Err(AppError::Validation(invalid_media_message(kind)));
        }

        let mut resolved = Self::default();
        *resolved.slot_mut(kind) = Some(value);
        Ok(resolved)
    }

    /// Storage key held by a media payload.
    fn media_key(&self, kind: ResponseType) -> Option<&str> {
        match kind {
            ResponseType::Text => None,
            _ => self.slot(kind).as_deref(),
        }
    }

    fn from_model(model: &activity_response::Model) -> Self {
        Self {
            string_response: model.string_response.clone(),
            image_response: model.image_response.clone(),
            video_response: model.video_response.clone(),
            audio_response: model.audio_response.clone(),
        }
    }
}

/// Error message for a response whose payload field is missing.
#[must_use]
pub const fn missing_payload_message(kind: ResponseType) -> &'static str {
    match kind {
        ResponseType::Text => "a string response is required for text response.",
        ResponseType::Image => "an image response is required for image response.",
        ResponseType::Video => "a video response is required for video response.",
        ResponseType::Audio => "an audio response is required for audio response.",
    }
}

/// Whether `value` is a key under the storage prefix of `kind`.
fn is_media_key(kind: ResponseType, value: &str) -> bool {
    value
        .strip_prefix(kind.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|name| {
            !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
        })
}

fn invalid_media_message(kind: ResponseType) -> String {
    let field = match kind {
        ResponseType::Text => "string_response",
        ResponseType::Image => "image_response",
        ResponseType::Video => "video_response",
        ResponseType::Audio => "audio_response",
    };
    format!("{field} must reference an uploaded {} file.", kind.as_str())
}

/// Parse a client-supplied response type.
pub fn parse_response_type(value: &str) -> AppResult<ResponseType> {
    ResponseType::parse(value)
        .ok_or_else(|| AppError::Validation("Invalid response_type".to_string()))
}

/// Input for creating an activity response.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivityResponseInput {
    pub activity_id: String,

    pub response_type: String,

    #[serde(flatten)]
    pub payload: ResponsePayload,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub time_minutes: i32,
}

/// Input for updating an activity response.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateActivityResponseInput {
    /// Must match the stored type when given.
    pub response_type: Option<String>,

    #[serde(flatten)]
    pub payload: ResponsePayload,

    #[validate(range(min = 0))]
    pub time_minutes: Option<i32>,
}

impl ActivityResponseService {
    /// Create a new activity response service.
    #[must_use]
    pub fn new(
        response_repo: ActivityResponseRepository,
        activity_repo: ActivityRepository,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            response_repo,
            activity_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Reject a media payload whose file was never uploaded.
    async fn ensure_stored(&self, payload: &ResponsePayload, kind: ResponseType) -> AppResult<()> {
        if let Some(key) = payload.media_key(kind) {
            if !self.storage.exists(key).await? {
                return Err(AppError::Validation(invalid_media_message(kind)));
            }
        }
        Ok(())
    }

    /// Remove a file no response refers to any more.
    ///
    /// The row change is already committed, so a storage failure is only logged.
    async fn release(&self, key: &str) {
        match self.storage.delete(key).await {
            Ok(()) => tracing::debug!(key = %key, "Released response media"),
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to release response media"),
        }
    }

    /// Record the caller's response to an activity.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateActivityResponseInput,
    ) -> AppResult<activity_response::Model> {
        input.validate()?;

        let kind = parse_response_type(&input.response_type)?;
        let payload = input.payload.resolve(kind)?;
        self.ensure_stored(&payload, kind).await?;

        self.activity_repo.get_by_id(&input.activity_id).await?;

        if self
            .response_repo
            .find_by_pair(user_id, &input.activity_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A response to this activity already exists for this user.".to_string(),
            ));
        }

        let model = activity_response::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            activity_id: Set(input.activity_id),
            response_type: Set(kind),
            string_response: Set(payload.string_response),
            image_response: Set(payload.image_response),
            video_response: Set(payload.video_response),
            audio_response: Set(payload.audio_response),
            time_minutes: Set(input.time_minutes),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let response = self.response_repo.create(model).await?;
        tracing::debug!(
            response_id = %response.id,
            activity_id = %response.activity_id,
            response_type = kind.as_str(),
            "Recorded activity response"
        );
        Ok(response)
    }

    /// Get a response visible in `scope`.
    pub async fn get(&self, id: &str, scope: &Scope) -> AppResult<activity_response::Model> {
        self.response_repo
            .find_in_scope(id, scope)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activity response {id}")))
    }

    /// Responses visible in `scope`.
    pub async fn list(&self, scope: &Scope) -> AppResult<Vec<activity_response::Model>> {
        self.response_repo.list_in_scope(scope).await
    }

    /// Every response, ordered by owner.
    pub async fn list_all(&self) -> AppResult<Vec<activity_response::Model>> {
        self.response_repo.list_in_scope(&Scope::All).await
    }

    /// Update a response.
    ///
    /// The type is fixed at creation. With `partial`, a missing payload field
    /// keeps its stored value; otherwise it must be supplied again.
    pub async fn update(
        &self,
        id: &str,
        scope: &Scope,
        input: UpdateActivityResponseInput,
        partial: bool,
    ) -> AppResult<activity_response::Model> {
        input.validate()?;

        let existing = self.get(id, scope).await?;
        let kind = existing.response_type;

        if let Some(requested) = &input.response_type {
            if parse_response_type(requested)? != kind {
                return Err(AppError::Validation(
                    "response_type cannot be changed".to_string(),
                ));
            }
        }

        let previous = ResponsePayload::from_model(&existing);
        let mut payload = input.payload;
        if partial && payload.slot(kind).is_none() {
            *payload.slot_mut(kind) = previous.slot(kind).clone();
        }
        let payload = payload.resolve(kind)?;

        let replaced = if payload.media_key(kind) == previous.media_key(kind) {
            None
        } else {
            self.ensure_stored(&payload, kind).await?;
            previous.media_key(kind).map(ToString::to_string)
        };

        let mut active: activity_response::ActiveModel = existing.into();
        active.string_response = Set(payload.string_response);
        active.image_response = Set(payload.image_response);
        active.video_response = Set(payload.video_response);
        active.audio_response = Set(payload.audio_response);
        if let Some(minutes) = input.time_minutes {
            active.time_minutes = Set(minutes);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.response_repo.update(active).await?;
        if let Some(old) = replaced {
            self.release(&old).await;
        }
        Ok(updated)
    }

    /// Delete a response visible in `scope`, along with its media file.
    pub async fn delete(&self, id: &str, scope: &Scope) -> AppResult<()> {
        let existing = self.get(id, scope).await?;
        self.response_repo.delete(&existing.id).await?;

        if let Some(key) = ResponsePayload::from_model(&existing).media_key(existing.response_type) {
            self.release(key).await;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::MemoryStorage;
    use sel4c_db::entities::activity;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

    fn service(
        responses: DatabaseConnection,
        activities: DatabaseConnection,
    ) -> ActivityResponseService {
        service_with_storage(responses, activities, Arc::new(MemoryStorage::default()))
    }

    fn service_with_storage(
        responses: DatabaseConnection,
        activities: DatabaseConnection,
        storage: Arc<MemoryStorage>,
    ) -> ActivityResponseService {
        ActivityResponseService::new(
            ActivityResponseRepository::new(Arc::new(responses)),
            ActivityRepository::new(Arc::new(activities)),
            storage,
        )
    }

    fn module() -> activity::Model {
        activity::Model {
            id: "a1".to_string(),
            title: "A".to_string(),
            description: String::new(),
            parent_id: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn empty() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres).into_connection()
    }

    fn stored(kind: ResponseType, payload: &str) -> activity_response::Model {
        let mut model = activity_response::Model {
            id: "r1".to_string(),
            user_id: "u1".to_string(),
            activity_id: "a1".to_string(),
            response_type: kind,
            string_response: None,
            image_response: None,
            video_response: None,
            audio_response: None,
            time_minutes: 4,
            created_at: Utc::now().into(),
            updated_at: None,
        };
        match kind {
            ResponseType::Text => model.string_response = Some(payload.to_string()),
            ResponseType::Image => model.image_response = Some(payload.to_string()),
            ResponseType::Video => model.video_response = Some(payload.to_string()),
            ResponseType::Audio => model.audio_response = Some(payload.to_string()),
        }
        model
    }

    fn create_input(body: &str) -> CreateActivityResponseInput {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_resolve_keeps_only_matching_field() {
        let payload = ResponsePayload {
            string_response: Some("text".to_string()),
            image_response: Some("image/x.png".to_string()),
            video_response: Some("video/y.mp4".to_string()),
            audio_response: None,
        };

        let resolved = payload.resolve(ResponseType::Image).unwrap();
        assert_eq!(resolved.image_response.as_deref(), Some("image/x.png"));
        assert!(resolved.string_response.is_none());
        assert!(resolved.video_response.is_none());
        assert!(resolved.audio_response.is_none());
    }

    #[test]
    fn test_resolve_missing_field_messages() {
        let cases = [
            (ResponseType::Text, "a string response is required for text response."),
            (ResponseType::Image, "an image response is required for image response."),
            (ResponseType::Video, "a video response is required for video response."),
            (ResponseType::Audio, "an audio response is required for audio response."),
        ];

        for (kind, message) in cases {
            match ResponsePayload::default().resolve(kind) {
                Err(AppError::Validation(msg)) => assert_eq!(msg, message),
                other => panic!("unexpected result for {kind:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_resolve_rejects_blank_text() {
        let payload = ResponsePayload {
            string_response: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(payload.resolve(ResponseType::Text).is_err());
    }

    #[test]
    fn test_unknown_response_type() {
        match parse_response_type("pdf") {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Invalid response_type"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_create_text_without_string_response() {
        let input = create_input(r#"{"activity_id": "a1", "response_type": "text"}"#);

        match service(empty(), empty()).create("u1", input).await {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "a string response is required for text response.");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_create_negative_minutes_rejected() {
        let input = create_input(
            r#"{"activity_id": "a1", "response_type": "text", "string_response": "x", "time_minutes": -3}"#,
        );

        let result = service(empty(), empty()).create("u1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_for_missing_activity() {
        let activities = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<activity::Model>::new()])
            .into_connection();
        let input = create_input(
            r#"{"activity_id": "a1", "response_type": "text", "string_response": "x"}"#,
        );

        let result = service(empty(), activities).create("u1", input).await;
        assert!(matches!(result, Err(AppError::ActivityNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let activities = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[module()]])
            .into_connection();
        let responses = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored(ResponseType::Text, "old")]])
            .into_connection();
        let input = create_input(
            r#"{"activity_id": "a1", "response_type": "text", "string_response": "new"}"#,
        );

        let result = service(responses, activities).create("u1", input).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_cannot_change_type() {
        let responses = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored(ResponseType::Text, "old")]])
            .into_connection();

        let input = UpdateActivityResponseInput {
            response_type: Some("image".to_string()),
            payload: ResponsePayload {
                image_response: Some("image/a.png".to_string()),
                ..Default::default()
            },
            time_minutes: None,
        };

        match service(responses, empty())
            .update("r1", &Scope::Owner("u1".to_string()), input, true)
            .await
        {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "response_type cannot be changed"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_partial_update_keeps_stored_payload() {
        let mut updated = stored(ResponseType::Audio, "audio/a.m4a");
        updated.time_minutes = 9;

        let responses = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored(ResponseType::Audio, "audio/a.m4a")]])
            .append_query_results([[updated]])
            .into_connection();

        let input = UpdateActivityResponseInput {
            time_minutes: Some(9),
            ..Default::default()
        };

        let result = service(responses, empty())
            .update("r1", &Scope::Owner("u1".to_string()), input, true)
            .await
            .unwrap();

        assert_eq!(result.time_minutes, 9);
        assert_eq!(result.audio_response.as_deref(), Some("audio/a.m4a"));
    }

    #[tokio::test]
    async fn test_full_update_requires_payload() {
        let responses = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored(ResponseType::Video, "video/v.mp4")]])
            .into_connection();

        let result = service(responses, empty())
            .update(
                "r1",
                &Scope::Owner("u1".to_string()),
                UpdateActivityResponseInput::default(),
                false,
            )
            .await;

        match result {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "a video response is required for video response.");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_get_outside_scope_is_not_found() {
        let responses = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<activity_response::Model>::new()])
            .into_connection();

        let result = service(responses, empty())
            .get("r1", &Scope::Owner("u2".to_string()))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_resolve_rejects_foreign_media_keys() {
        for value in [
            "hello world",
            "audio/abc.m4a",
            "../../etc/passwd",
            "image/../secret",
            "image/",
            "image/a/b.png",
        ] {
            let payload = ResponsePayload {
                image_response: Some(value.to_string()),
                ..Default::default()
            };
            match payload.resolve(ResponseType::Image) {
                Err(AppError::Validation(msg)) => {
                    assert_eq!(msg, "image_response must reference an uploaded image file.");
                }
                other => panic!("{value} was accepted: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_create_media_without_upload_rejected() {
        let input = create_input(
            r#"{"activity_id": "a1", "response_type": "video", "video_response": "video/missing.mp4"}"#,
        );

        match service(empty(), empty()).create("u1", input).await {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "video_response must reference an uploaded video file.");
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_media_with_upload() {
        let storage = Arc::new(MemoryStorage::with_keys(&["image/abc.png"]));
        let activities = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[module()]])
            .into_connection();
        let responses = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<activity_response::Model>::new()])
            .append_query_results([[stored(ResponseType::Image, "image/abc.png")]])
            .into_connection();
        let input = create_input(
            r#"{"activity_id": "a1", "response_type": "image", "image_response": "image/abc.png", "string_response": "ignored"}"#,
        );

        let created = service_with_storage(responses, activities, storage)
            .create("u1", input)
            .await
            .unwrap();

        assert_eq!(created.image_response.as_deref(), Some("image/abc.png"));
        assert!(created.string_response.is_none());
    }

    #[tokio::test]
    async fn test_replacing_media_releases_old_file() {
        let storage = Arc::new(MemoryStorage::with_keys(&["image/old.png", "image/new.png"]));
        let responses = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored(ResponseType::Image, "image/old.png")]])
            .append_query_results([[stored(ResponseType::Image, "image/new.png")]])
            .into_connection();

        let input = UpdateActivityResponseInput {
            payload: ResponsePayload {
                image_response: Some("image/new.png".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let updated = service_with_storage(responses, empty(), storage.clone())
            .update("r1", &Scope::Owner("u1".to_string()), input, false)
            .await
            .unwrap();

        assert_eq!(updated.image_response.as_deref(), Some("image/new.png"));
        assert!(!storage.contains("image/old.png"));
        assert!(storage.contains("image/new.png"));
    }

    #[tokio::test]
    async fn test_replacing_media_with_missing_upload_keeps_old_file() {
        let storage = Arc::new(MemoryStorage::with_keys(&["image/old.png"]));
        let responses = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored(ResponseType::Image, "image/old.png")]])
            .into_connection();

        let input = UpdateActivityResponseInput {
            payload: ResponsePayload {
                image_response: Some("image/never-uploaded.png".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let result = service_with_storage(responses, empty(), storage.clone())
            .update("r1", &Scope::Owner("u1".to_string()), input, true)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(storage.contains("image/old.png"));
    }

    #[tokio::test]
    async fn test_delete_releases_media_file() {
        let storage = Arc::new(MemoryStorage::with_keys(&["audio/a.m4a"]));
        let responses = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored(ResponseType::Audio, "audio/a.m4a")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        service_with_storage(responses, empty(), storage.clone())
            .delete("r1", &Scope::Owner("u1".to_string()))
            .await
            .unwrap();

        assert!(!storage.contains("audio/a.m4a"));
    }
}
