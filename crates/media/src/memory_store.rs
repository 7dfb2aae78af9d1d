//! In-process media store for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::PublishError;
use crate::store::{MediaStore, StoreUpload, StoredObject, UploadBody};

/// An object held by [`MemoryMediaStore`].
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Keeps every uploaded object in a map; URLs are `{base_url}/{key}`.
pub struct MemoryMediaStore {
    base_url: String,
    objects: Mutex<HashMap<String, StoredBlob>>,
    fail_with: Mutex<Option<u16>>,
}

impl MemoryMediaStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
            fail_with: Mutex::new(None),
        }
    }

    /// Make every following `put` fail with an API error of `status`.
    pub fn fail_with_status(&self, status: u16) {
        if let Ok(mut guard) = self.fail_with.lock() {
            *guard = Some(status);
        }
    }

    pub fn get(&self, key: &str) -> Option<StoredBlob> {
        self.objects.lock().ok()?.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, upload: StoreUpload) -> Result<StoredObject, PublishError> {
        let failure = self.fail_with.lock().ok().and_then(|guard| *guard);
        if let Some(status) = failure {
            return Err(PublishError::Api {
                status,
                body: "simulated failure".into(),
            });
        }

        let bytes = match upload.body {
            UploadBody::Bytes(bytes) => bytes,
            UploadBody::File { path, .. } => tokio::fs::read(&path).await?,
        };
        let blob = StoredBlob {
            content_type: upload.content_type,
            bytes,
        };
        self.objects
            .lock()
            .map_err(|_| PublishError::Storage("memory store poisoned".into()))?
            .insert(upload.key.clone(), blob);

        Ok(StoredObject {
            url: format!("{}/{}", self.base_url, upload.key),
            asset_id: upload.key,
            width: None,
            height: None,
            duration_seconds: None,
        })
    }
}
