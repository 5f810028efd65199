//! In-memory storage shared by service tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use sel4c_common::{AppResult, StorageBackend, UploadedFile};

#[derive(Default)]
pub struct MemoryStorage {
    keys: Mutex<Vec<String>>,
}

impl MemoryStorage {
    /// Storage already holding `keys`.
    pub fn with_keys(keys: &[&str]) -> Self {
        Self {
            keys: Mutex::new(keys.iter().map(ToString::to_string).collect()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.lock().unwrap().iter().any(|k| k == key)
    }
}

#[async_trait::async_trait]
impl StorageBackend for MemoryStorage {
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<UploadedFile> {
        self.keys.lock().unwrap().push(key.to_string());
        Ok(UploadedFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5: String::new(),
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.keys.lock().unwrap().retain(|k| k != key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("/media/{key}")
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.contains(key))
    }
}
