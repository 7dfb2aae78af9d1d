//! Shared fixtures for HTTP-level tests.
//!
//! The app runs against a file content store in a temp directory and an
//! in-memory media store, so no external services are needed.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, RgbImage};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use showcase_api::auth::csrf::{DoubleSubmitCsrf, CSRF_COOKIE, CSRF_HEADER};
use showcase_api::auth::jwt::{mint_token, JwtConfig};
use showcase_api::config::{RateLimitConfig, ServerConfig};
use showcase_api::rate_limit::InMemoryRateLimiter;
use showcase_api::router::build_app_router;
use showcase_api::state::AppState;
use showcase_core::featured::FeaturedGate;
use showcase_db::FileContentStore;
use showcase_media::{MemoryMediaStore, Publisher};
use showcase_pipeline::UploadOrchestrator;

pub const MEDIA_BASE: &str = "https://media.test";
pub const CSRF_TOKEN: &str = "test-csrf-token";
const BOUNDARY: &str = "showcase-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 16 * 1024 * 1024,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            issuer: None,
            leeway_secs: 0,
            mint_ttl_mins: 15,
        },
        rate_limit: RateLimitConfig::default(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub media: Arc<MemoryMediaStore>,
    _content_dir: TempDir,
    _spool_dir: TempDir,
}

impl TestApp {
    /// A fresh handle for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Bearer token for `actor`.
    pub fn token(&self, actor: &str) -> String {
        mint_token(actor, "editor", &self.config.jwt).unwrap()
    }
}

pub async fn build_test_app() -> TestApp {
    build_test_app_with(test_config()).await
}

/// Build the full application router with all middleware layers, exactly as
/// `main.rs` does, on top of throwaway stores.
pub async fn build_test_app_with(config: ServerConfig) -> TestApp {
    let content_dir = tempfile::tempdir().unwrap();
    let spool_dir = tempfile::tempdir().unwrap();

    let content = Arc::new(FileContentStore::open(content_dir.path()).await.unwrap());
    let media = Arc::new(MemoryMediaStore::new(MEDIA_BASE));
    let gate = FeaturedGate::new([format!("{MEDIA_BASE}/")]);
    let publisher = Arc::new(Publisher::new(media.clone(), "showcase"));
    let orchestrator = Arc::new(UploadOrchestrator::new(
        content.clone(),
        publisher,
        gate.clone(),
        spool_dir.path(),
    ));

    let state = AppState {
        content,
        orchestrator,
        gate: Arc::new(gate),
        config: Arc::new(config.clone()),
        csrf: Arc::new(DoubleSubmitCsrf),
        rate_limiter: Arc::new(InMemoryRateLimiter::new()),
    };

    TestApp {
        router: build_app_router(state, &config),
        config,
        media,
        _content_dir: content_dir,
        _spool_dir: spool_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Anonymous GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// Authenticated GET.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Authenticated mutation carrying a matching CSRF header and cookie.
pub async fn mutate(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> Response<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CSRF_HEADER, CSRF_TOKEN)
        .header(COOKIE, format!("{CSRF_COOKIE}={CSRF_TOKEN}"));
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, request).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, json: Value) -> Response<Body> {
    mutate(app, Method::POST, uri, token, Some(json)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, json: Value) -> Response<Body> {
    mutate(app, Method::PUT, uri, token, Some(json)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, token: &str, json: Value) -> Response<Body> {
    mutate(app, Method::PATCH, uri, token, Some(json)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    mutate(app, Method::DELETE, uri, token, None).await
}

/// Collect the body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Minimal valid create body.
pub fn project_json(id: &str, status: &str, order: i32) -> Value {
    serde_json::json!({
        "id": id,
        "status": status,
        "order": order,
        "category": "event",
        "city": "Lyon",
        "i18n": {
            "en": { "title": format!("Project {id}") },
            "fr": { "title": format!("Projet {id}") }
        }
    })
}

pub async fn create_project(test: &TestApp, id: &str, status: &str, order: i32) -> Value {
    let response = post_json_auth(
        test.app(),
        "/api/v1/projects",
        &test.token("ana"),
        project_json(id, status, order),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "seeding project {id}");
    body_json(response).await
}

/// One multipart part. Text fields have no content type.
pub struct Part {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub fn text(name: &str, value: &str) -> Part {
    Part {
        name: name.to_string(),
        content_type: None,
        bytes: value.as_bytes().to_vec(),
    }
}

pub fn file(mime: &str, bytes: Vec<u8>) -> Part {
    Part {
        name: "file".to_string(),
        content_type: Some(mime.to_string()),
        bytes,
    }
}

/// Text fields for an upload to `target`/`target_id`.
pub fn upload_fields(category: &str, target: &str, target_id: &str) -> Vec<Part> {
    vec![
        text("category", category),
        text("target", target),
        text("target_id", target_id),
        text("alt_en", "Alt text"),
    ]
}

/// Hand-built `multipart/form-data` body.
pub fn multipart_body(parts: Vec<Part>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let headers = match &part.content_type {
            Some(mime) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"upload\"\r\n\
                 Content-Type: {mime}\r\n\r\n",
                part.name
            ),
            None => format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                part.name
            ),
        };
        body.extend_from_slice(headers.as_bytes());
        body.extend_from_slice(&part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart form to the upload endpoint with auth and CSRF.
pub async fn upload(test: &TestApp, parts: Vec<Part>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/media/uploads")
        .header(AUTHORIZATION, format!("Bearer {}", test.token("ana")))
        .header(CSRF_HEADER, CSRF_TOKEN)
        .header(COOKIE, format!("{CSRF_COOKIE}={CSRF_TOKEN}"))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(test.app(), request).await
}

pub fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    // Flat blocks keep the encoded files small.
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([((x / 64) * 16 % 256) as u8, ((y / 64) * 16 % 256) as u8, 90])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
    out.into_inner()
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}
