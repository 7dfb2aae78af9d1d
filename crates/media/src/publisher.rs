//! Asset publishing: transcode, derive the content-addressed key, upload,
//! and describe the result as a [`MediaAsset`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use showcase_core::hashing::sha256_hex;
use showcase_core::media::{MediaAsset, UploadCategory};

use crate::error::PublishError;
use crate::format::DeliveryFormat;
use crate::path::object_key;
use crate::store::{MediaStore, StoreUpload, UploadBody};
use crate::transcode::transcode_blocking;

/// Where the source bytes of an upload live.
#[derive(Debug)]
pub enum PublishSource {
    /// Buffered in memory (images).
    Bytes(Vec<u8>),
    /// Spooled to disk with a digest computed while spooling (videos).
    File {
        path: PathBuf,
        len: u64,
        sha256: String,
    },
}

#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub category: UploadCategory,
    pub source_mime: String,
    /// Optional delivery format hint (`jpg`, `png`, `webp`).
    pub target_format: Option<String>,
    /// Grouping hint for the object key (project id, team id, page slug).
    pub hint: String,
    pub alt_text: BTreeMap<String, String>,
}

pub struct Publisher {
    store: Arc<dyn MediaStore>,
    root: String,
}

impl Publisher {
    /// `root` is the first segment(s) of every object key.
    pub fn new(store: Arc<dyn MediaStore>, root: impl Into<String>) -> Self {
        Self {
            store,
            root: root.into(),
        }
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Publish one asset. Nothing is retried: a store failure is returned
    /// as is and the caller decides what to do.
    pub async fn publish(
        &self,
        source: PublishSource,
        request: PublishRequest,
    ) -> Result<MediaAsset, PublishError> {
        let format = DeliveryFormat::resolve(
            request.category,
            &request.source_mime,
            request.target_format.as_deref(),
        )?;
        let content_type = format.mime(&request.source_mime);
        let extension = format.extension(&request.source_mime);

        let (body, digest, dimensions) = match (source, format) {
            (PublishSource::File { path, len, sha256 }, DeliveryFormat::VideoPassthrough) => {
                (UploadBody::File { path, len }, sha256, None)
            }
            (PublishSource::Bytes(bytes), DeliveryFormat::VideoPassthrough) => {
                let digest = sha256_hex(&bytes);
                (UploadBody::Bytes(bytes), digest, None)
            }
            (source, format) => {
                let bytes = match source {
                    PublishSource::Bytes(bytes) => bytes,
                    PublishSource::File { path, .. } => tokio::fs::read(&path).await?,
                };
                let encoded = transcode_blocking(bytes, format).await?;
                let digest = sha256_hex(&encoded.bytes);
                (UploadBody::Bytes(encoded.bytes), digest, encoded.dimensions)
            }
        };

        let key = object_key(&self.root, request.category, &request.hint, &digest, extension);
        let byte_len = body.len();

        tracing::info!(
            store = self.store.name(),
            category = %request.category,
            key = %key,
            bytes = byte_len,
            "Publishing asset"
        );

        let stored = self
            .store
            .put(StoreUpload {
                key,
                content_type,
                body,
            })
            .await?;

        Ok(MediaAsset {
            url: stored.url,
            asset_id: stored.asset_id,
            kind: request.category.media_kind(),
            alt_text: request.alt_text,
            width: stored.width.or(dimensions.map(|(w, _)| w)),
            height: stored.height.or(dimensions.map(|(_, h)| h)),
            duration_seconds: stored.duration_seconds,
            format: Some(extension.to_string()),
            bytes: Some(byte_len),
        })
    }
}
