//! Client for the signed-upload media API.
//!
//! Uploads are `POST {api_url}/upload` multipart requests carrying the file,
//! `api_key`, `timestamp`, `public_id` and an HMAC `signature` (see
//! [`crate::signing`]). The API answers with the delivery URL and its own
//! asset id, plus measured dimensions or duration when it has them.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::error::PublishError;
use crate::signing;
use crate::store::{MediaStore, StoreUpload, StoredObject, UploadBody};

/// Per-request timeout. Video uploads can be large, so this is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct HttpMediaStoreConfig {
    /// Base URL, e.g. `https://media.example.com/v1`.
    pub api_url: String,
    pub api_key: String,
    pub api_secret: String,
}

pub struct HttpMediaStore {
    client: reqwest::Client,
    config: HttpMediaStoreConfig,
}

/// Success payload of `POST /upload`.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
    asset_id: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    duration_seconds: Option<f64>,
}

impl HttpMediaStore {
    pub fn new(config: HttpMediaStoreConfig) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling).
    pub fn with_client(client: reqwest::Client, mut config: HttpMediaStoreConfig) -> Self {
        config.api_url = config.api_url.trim_end_matches('/').to_string();
        Self { client, config }
    }

    /// The signed text fields of an upload form.
    fn signed_params(&self, public_id: &str, timestamp: i64) -> Result<BTreeMap<&'static str, String>, PublishError> {
        let mut params = BTreeMap::from([
            ("api_key", self.config.api_key.clone()),
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.to_string()),
        ]);
        let signature = signing::sign(&params, &self.config.api_secret)?;
        params.insert("signature", signature);
        Ok(params)
    }

    async fn file_part(key: &str, content_type: &str, body: UploadBody) -> Result<Part, PublishError> {
        let file_name = key.rsplit('/').next().unwrap_or(key).to_string();
        let part = match body {
            UploadBody::Bytes(bytes) => Part::bytes(bytes),
            UploadBody::File { path, len } => {
                let file = tokio::fs::File::open(&path).await?;
                Part::stream_with_length(reqwest::Body::wrap_stream(ReaderStream::new(file)), len)
            }
        };
        Ok(part.file_name(file_name).mime_str(content_type)?)
    }
}

/// Decode and sanity-check a success body.
fn parse_upload_response(body: &str) -> Result<StoredObject, PublishError> {
    let parsed: UploadResponse =
        serde_json::from_str(body).map_err(|e| PublishError::InvalidResponse(e.to_string()))?;
    if parsed.url.trim().is_empty() || parsed.asset_id.trim().is_empty() {
        return Err(PublishError::InvalidResponse(
            "url and asset_id must be non-empty".into(),
        ));
    }
    Ok(StoredObject {
        url: parsed.url,
        asset_id: parsed.asset_id,
        width: parsed.width,
        height: parsed.height,
        duration_seconds: parsed.duration_seconds,
    })
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn put(&self, upload: StoreUpload) -> Result<StoredObject, PublishError> {
        // The API derives the extension from the file part; the public id is
        // the key without it.
        let public_id = upload
            .key
            .rsplit_once('.')
            .map_or(upload.key.as_str(), |(stem, _)| stem)
            .to_string();
        let params = self.signed_params(&public_id, chrono::Utc::now().timestamp())?;

        let mut form = Form::new();
        for (name, value) in params {
            form = form.text(name, value);
        }
        let bytes = upload.body.len();
        form = form.part(
            "file",
            Self::file_part(&upload.key, &upload.content_type, upload.body).await?,
        );

        tracing::debug!(key = %upload.key, bytes, "Uploading to media API");
        let response = self
            .client
            .post(format!("{}/upload", self.config.api_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PublishError::Api {
                status: status.as_u16(),
                body,
            });
        }
        parse_upload_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn store() -> HttpMediaStore {
        HttpMediaStore::with_client(
            reqwest::Client::new(),
            HttpMediaStoreConfig {
                api_url: "https://media.test/v1/".into(),
                api_key: "key-1".into(),
                api_secret: "s3cret".into(),
            },
        )
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(store().config.api_url, "https://media.test/v1");
    }

    #[test]
    fn signed_params_carry_signature_over_public_id_and_timestamp() {
        let params = store().signed_params("showcase/hero/a/ff", 1_700_000_000).unwrap();
        assert_eq!(params["api_key"], "key-1");
        assert_eq!(params["public_id"], "showcase/hero/a/ff");

        let expected = signing::sign(
            &BTreeMap::from([
                ("public_id", "showcase/hero/a/ff".to_string()),
                ("timestamp", "1700000000".to_string()),
            ]),
            "s3cret",
        )
        .unwrap();
        assert_eq!(params["signature"], expected);
    }

    #[test]
    fn parses_video_response() {
        let object = parse_upload_response(
            r#"{"url":"https://cdn.test/v.mp4","asset_id":"v1","duration_seconds":12.5}"#,
        )
        .unwrap();
        assert_eq!(object.duration_seconds, Some(12.5));
        assert_eq!(object.width, None);
    }

    #[test]
    fn rejects_incomplete_response() {
        assert_matches!(
            parse_upload_response(r#"{"url":"","asset_id":"x"}"#),
            Err(PublishError::InvalidResponse(_))
        );
        assert_matches!(
            parse_upload_response("<html>bad gateway</html>"),
            Err(PublishError::InvalidResponse(_))
        );
    }
}
