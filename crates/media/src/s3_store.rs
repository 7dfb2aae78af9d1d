//! S3-compatible bucket store.
//!
//! Objects are written under their content-addressed key and served from a
//! public base URL (CDN or bucket website), so the asset id is the key.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

use crate::error::PublishError;
use crate::store::{MediaStore, StoreUpload, StoredObject, UploadBody};

#[derive(Debug, Clone)]
pub struct S3MediaStoreConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for MinIO and other S3-compatible services.
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    /// Prefix of public object URLs, e.g. `https://cdn.example.com`.
    pub public_base_url: String,
}

pub struct S3MediaStore {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl S3MediaStore {
    /// Build a client from the default AWS credential chain.
    pub async fn new(config: &S3MediaStoreConfig) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = S3ConfigBuilder::from(&aws_config);
        if let Some(ref endpoint_url) = config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        tracing::info!(bucket = %config.bucket, region = %config.region, "S3 media store initialized");

        Self {
            client: S3Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        public_url(&self.public_base_url, key)
    }
}

fn public_url(base: &str, key: &str) -> String {
    format!("{base}/{}", key.trim_start_matches('/'))
}

#[async_trait]
impl MediaStore for S3MediaStore {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn put(&self, upload: StoreUpload) -> Result<StoredObject, PublishError> {
        let body = match upload.body {
            UploadBody::Bytes(bytes) => ByteStream::from(bytes),
            UploadBody::File { path, .. } => ByteStream::from_path(&path)
                .await
                .map_err(|e| PublishError::Storage(e.to_string()))?,
        };

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&upload.key)
            .body(body)
            .content_type(&upload.content_type)
            .send()
            .await
            .map_err(|e| PublishError::Storage(format!("put_object {}: {e}", upload.key)))?;

        tracing::debug!(bucket = %self.bucket, key = %upload.key, "Object stored");

        Ok(StoredObject {
            url: self.public_url(&upload.key),
            asset_id: upload.key,
            width: None,
            height: None,
            duration_seconds: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_joins_without_double_slash() {
        assert_eq!(
            public_url("https://cdn.test", "/showcase/hero/a/ff.jpg"),
            "https://cdn.test/showcase/hero/a/ff.jpg"
        );
    }

    #[tokio::test]
    async fn store_trims_base_url() {
        let store = S3MediaStore::new(&S3MediaStoreConfig {
            bucket: "media".into(),
            region: "us-east-1".into(),
            endpoint_url: Some("http://localhost:9000".into()),
            force_path_style: true,
            public_base_url: "https://cdn.test/".into(),
        })
        .await;
        assert_eq!(store.public_url("k.png"), "https://cdn.test/k.png");
        assert_eq!(store.name(), "s3");
    }
}
