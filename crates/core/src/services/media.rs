//! Media upload service for image, video and audio responses.

use std::sync::Arc;

use sel4c_common::{AppError, AppResult, StorageBackend, UploadedFile, generate_storage_key};
use serde::{Deserialize, Serialize};

/// Kind of uploaded media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Parse a kind from its path segment.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            other => Err(AppError::BadRequest(format!("Unknown media kind: {other}"))),
        }
    }

    /// Path segment and storage prefix for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }

    /// Whether `content_type` is a MIME type of this kind (`image/*` and so on).
    #[must_use]
    pub fn accepts(&self, content_type: &str) -> bool {
        content_type
            .split_once('/')
            .is_some_and(|(top, sub)| top.eq_ignore_ascii_case(self.as_str()) && !sub.is_empty())
    }
}

/// Media service for business logic.
#[derive(Clone)]
pub struct MediaService {
    storage: Arc<dyn StorageBackend>,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Store an uploaded file under a fresh key for `kind`.
    pub async fn upload(
        &self,
        kind: MediaKind,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> AppResult<UploadedFile> {
        if !kind.accepts(content_type) {
            return Err(AppError::BadRequest(format!(
                "Content type {content_type} is not a valid {} type",
                kind.as_str()
            )));
        }
        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        let key = generate_storage_key(kind.as_str(), file_name);
        let uploaded = self.storage.upload(&key, data, content_type).await?;

        tracing::info!(
            key = %uploaded.key,
            size = uploaded.size,
            kind = kind.as_str(),
            "Uploaded response media"
        );
        Ok(uploaded)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::MemoryStorage;

    #[test]
    fn test_kind_accepts_matching_family_only() {
        assert!(MediaKind::Image.accepts("image/png"));
        assert!(MediaKind::Audio.accepts("audio/mpeg"));
        assert!(!MediaKind::Video.accepts("image/png"));
        assert!(!MediaKind::Image.accepts("image/"));
        assert!(!MediaKind::Image.accepts("application/octet-stream"));
    }

    #[test]
    fn test_parse_unknown_kind() {
        assert!(MediaKind::parse("pdf").is_err());
        assert_eq!(MediaKind::parse("video").unwrap(), MediaKind::Video);
    }

    #[tokio::test]
    async fn test_upload_uses_generated_key() {
        let storage = Arc::new(MemoryStorage::default());
        let service = MediaService::new(storage.clone());

        let uploaded = service
            .upload(MediaKind::Image, "../../secret.PNG", "image/png", b"data")
            .await
            .unwrap();

        assert!(uploaded.key.starts_with("image/"));
        assert!(uploaded.key.ends_with(".png"));
        assert!(!uploaded.key.contains("secret"));
        assert!(storage.exists(&uploaded.key).await.unwrap());
    }

    #[tokio::test]
    async fn test_upload_rejects_mismatched_content_type() {
        let service = MediaService::new(Arc::new(MemoryStorage::default()));

        let result = service
            .upload(MediaKind::Audio, "clip.mp4", "video/mp4", b"data")
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
