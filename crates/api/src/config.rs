use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Default multipart body cap: the largest category limit plus form overhead.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 210 * 1024 * 1024;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn parse_env<T: std::str::FromStr>(name: &str, default: &str) -> T {
    env_or(name, default)
        .parse()
        .unwrap_or_else(|_| panic!("{name} must be a valid {}", std::any::type_name::<T>()))
}

fn list_env(name: &str, default: &str) -> Vec<String> {
    env_or(name, default)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Body limit for the upload endpoint.
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_UPLOAD_BYTES`     | `220200960` (210 MiB)      |
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", "3000"),
            cors_origins: list_env("CORS_ORIGINS", "http://localhost:5173"),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", "30"),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string()),
            jwt: JwtConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}

/// Fixed-window request budgets per scope.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub read_max: u32,
    pub write_max: u32,
    pub media_max: u32,
}

impl RateLimitConfig {
    /// | Env Var                 | Default |
    /// |-------------------------|---------|
    /// | `RATE_LIMIT_WINDOW_SECS`| `60`    |
    /// | `RATE_LIMIT_READ`       | `300`   |
    /// | `RATE_LIMIT_WRITE`      | `60`    |
    /// | `RATE_LIMIT_MEDIA`      | `20`    |
    pub fn from_env() -> Self {
        Self {
            window_secs: parse_env("RATE_LIMIT_WINDOW_SECS", "60"),
            read_max: parse_env("RATE_LIMIT_READ", "300"),
            write_max: parse_env("RATE_LIMIT_WRITE", "60"),
            media_max: parse_env("RATE_LIMIT_MEDIA", "20"),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            read_max: 300,
            write_max: 60,
            media_max: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentBackendKind {
    File,
    Postgres,
}

/// Where content records live.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: ContentBackendKind,
    /// Directory holding the JSON collections (file backend).
    pub content_path: PathBuf,
    /// Required for the postgres backend.
    pub database_url: Option<String>,
}

impl StoreConfig {
    /// | Env Var           | Default          |
    /// |-------------------|------------------|
    /// | `CONTENT_BACKEND` | `file`           |
    /// | `CONTENT_PATH`    | `./data/content` |
    /// | `DATABASE_URL`    | --               |
    ///
    /// # Panics
    ///
    /// Panics on an unknown backend, or when `postgres` is selected without
    /// `DATABASE_URL`.
    pub fn from_env() -> Self {
        let backend = match env_or("CONTENT_BACKEND", "file").as_str() {
            "file" => ContentBackendKind::File,
            "postgres" => ContentBackendKind::Postgres,
            other => panic!("CONTENT_BACKEND must be 'file' or 'postgres', got '{other}'"),
        };
        let database_url = optional_env("DATABASE_URL");
        assert!(
            backend != ContentBackendKind::Postgres || database_url.is_some(),
            "DATABASE_URL must be set when CONTENT_BACKEND=postgres"
        );

        Self {
            backend,
            content_path: PathBuf::from(env_or("CONTENT_PATH", "./data/content")),
            database_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaBackendKind {
    Http,
    S3,
}

/// Remote media store and publishing settings.
#[derive(Debug, Clone)]
pub struct MediaStoreConfig {
    pub backend: MediaBackendKind,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub bucket: Option<String>,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub public_base_url: Option<String>,
    /// First segment of every object key.
    pub root_folder: String,
    /// URL prefixes a featured hero must come from.
    pub trusted_prefixes: Vec<String>,
    /// Where video uploads are spooled.
    pub spool_dir: PathBuf,
}

impl MediaStoreConfig {
    /// | Env Var                  | Default                          |
    /// |--------------------------|----------------------------------|
    /// | `MEDIA_BACKEND`          | `http`                           |
    /// | `MEDIA_API_URL`          | -- (http)                        |
    /// | `MEDIA_API_KEY`          | -- (http)                        |
    /// | `MEDIA_API_SECRET`       | -- (http)                        |
    /// | `MEDIA_BUCKET`           | -- (s3)                          |
    /// | `MEDIA_REGION`           | `us-east-1`                      |
    /// | `MEDIA_ENDPOINT_URL`     | --                               |
    /// | `MEDIA_FORCE_PATH_STYLE` | `false`                          |
    /// | `MEDIA_PUBLIC_BASE_URL`  | -- (s3)                          |
    /// | `MEDIA_ROOT_FOLDER`      | `showcase`                       |
    /// | `MEDIA_TRUSTED_PREFIXES` | public base URL, if set          |
    /// | `MEDIA_SPOOL_DIR`        | system temp dir                  |
    ///
    /// # Panics
    ///
    /// Panics on an unknown backend or when the selected backend is missing
    /// a required variable.
    pub fn from_env() -> Self {
        let backend = match env_or("MEDIA_BACKEND", "http").as_str() {
            "http" => MediaBackendKind::Http,
            "s3" => MediaBackendKind::S3,
            other => panic!("MEDIA_BACKEND must be 'http' or 's3', got '{other}'"),
        };

        let config = Self {
            backend,
            api_url: optional_env("MEDIA_API_URL"),
            api_key: optional_env("MEDIA_API_KEY"),
            api_secret: optional_env("MEDIA_API_SECRET"),
            bucket: optional_env("MEDIA_BUCKET"),
            region: env_or("MEDIA_REGION", "us-east-1"),
            endpoint_url: optional_env("MEDIA_ENDPOINT_URL"),
            force_path_style: parse_env("MEDIA_FORCE_PATH_STYLE", "false"),
            public_base_url: optional_env("MEDIA_PUBLIC_BASE_URL"),
            root_folder: env_or("MEDIA_ROOT_FOLDER", "showcase"),
            trusted_prefixes: {
                let fallback = optional_env("MEDIA_PUBLIC_BASE_URL").unwrap_or_default();
                list_env("MEDIA_TRUSTED_PREFIXES", &fallback)
            },
            spool_dir: optional_env("MEDIA_SPOOL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
        };

        match backend {
            MediaBackendKind::Http => {
                for (name, value) in [
                    ("MEDIA_API_URL", &config.api_url),
                    ("MEDIA_API_KEY", &config.api_key),
                    ("MEDIA_API_SECRET", &config.api_secret),
                ] {
                    assert!(value.is_some(), "{name} must be set when MEDIA_BACKEND=http");
                }
            }
            MediaBackendKind::S3 => {
                assert!(config.bucket.is_some(), "MEDIA_BUCKET must be set when MEDIA_BACKEND=s3");
                assert!(
                    config.public_base_url.is_some(),
                    "MEDIA_PUBLIC_BASE_URL must be set when MEDIA_BACKEND=s3"
                );
            }
        }
        if config.trusted_prefixes.is_empty() {
            tracing::warn!("MEDIA_TRUSTED_PREFIXES is empty; no project can be featured");
        }
        config
    }
}
