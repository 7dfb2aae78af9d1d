//! The remote media store seam.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::PublishError;

/// Body of an object to store.
#[derive(Debug)]
pub enum UploadBody {
    /// Re-encoded image bytes held in memory.
    Bytes(Vec<u8>),
    /// A spooled file streamed from disk (videos).
    File { path: PathBuf, len: u64 },
}

impl UploadBody {
    pub fn len(&self) -> u64 {
        match self {
            Self::Bytes(bytes) => bytes.len() as u64,
            Self::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct StoreUpload {
    /// Object key without a leading slash, e.g. `showcase/hero/alpha/3f2a.jpg`.
    pub key: String,
    pub content_type: String,
    pub body: UploadBody,
}

/// What the store reports back for a stored object. Dimensions and duration
/// are only present when the store measured them.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub url: String,
    pub asset_id: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_seconds: Option<f64>,
}

/// A place published assets are uploaded to. Implementations do not retry.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn put(&self, upload: StoreUpload) -> Result<StoredObject, PublishError>;
}
