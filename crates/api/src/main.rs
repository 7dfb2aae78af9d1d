use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showcase_api::auth::csrf::DoubleSubmitCsrf;
use showcase_api::config::{
    ContentBackendKind, MediaBackendKind, MediaStoreConfig, ServerConfig, StoreConfig,
};
use showcase_api::rate_limit::InMemoryRateLimiter;
use showcase_api::router::build_app_router;
use showcase_api::state::AppState;
use showcase_core::featured::FeaturedGate;
use showcase_core::store::ContentBackend;
use showcase_db::{FileContentStore, PgContentStore};
use showcase_media::{
    HttpMediaStore, HttpMediaStoreConfig, MediaStore, Publisher, S3MediaStore, S3MediaStoreConfig,
};
use showcase_pipeline::UploadOrchestrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // LOG_FORMAT=json switches to one JSON object per line for log shipping.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showcase_api=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let store_config = StoreConfig::from_env();
    let media_config = MediaStoreConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Content store ---
    let content = build_content_store(&store_config).await;

    // --- Media store ---
    let media_store = build_media_store(&media_config).await;
    tracing::info!(store = media_store.name(), "Media store configured");

    // --- Upload pipeline ---
    let gate = FeaturedGate::new(media_config.trusted_prefixes.iter().cloned());
    let publisher = Arc::new(Publisher::new(media_store, media_config.root_folder.clone()));
    let orchestrator = Arc::new(UploadOrchestrator::new(
        Arc::clone(&content),
        publisher,
        gate.clone(),
        media_config.spool_dir.clone(),
    ));

    // --- App state ---
    let state = AppState {
        content,
        orchestrator,
        gate: Arc::new(gate),
        config: Arc::new(config.clone()),
        csrf: Arc::new(DoubleSubmitCsrf),
        rate_limiter: Arc::new(InMemoryRateLimiter::new()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

async fn build_content_store(config: &StoreConfig) -> Arc<dyn ContentBackend> {
    match config.backend {
        ContentBackendKind::File => {
            let store = FileContentStore::open(config.content_path.clone())
                .await
                .expect("Failed to open content directory");
            tracing::info!(path = %config.content_path.display(), "File content store opened");
            Arc::new(store)
        }
        ContentBackendKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set");

            let pool = showcase_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            showcase_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            showcase_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgContentStore::new(pool))
        }
    }
}

async fn build_media_store(config: &MediaStoreConfig) -> Arc<dyn MediaStore> {
    match config.backend {
        MediaBackendKind::Http => {
            let store = HttpMediaStore::new(HttpMediaStoreConfig {
                api_url: config.api_url.clone().expect("MEDIA_API_URL must be set"),
                api_key: config.api_key.clone().expect("MEDIA_API_KEY must be set"),
                api_secret: config
                    .api_secret
                    .clone()
                    .expect("MEDIA_API_SECRET must be set"),
            })
            .expect("Failed to build media API client");
            Arc::new(store)
        }
        MediaBackendKind::S3 => {
            let store = S3MediaStore::new(&S3MediaStoreConfig {
                bucket: config.bucket.clone().expect("MEDIA_BUCKET must be set"),
                region: config.region.clone(),
                endpoint_url: config.endpoint_url.clone(),
                force_path_style: config.force_path_style,
                public_base_url: config
                    .public_base_url
                    .clone()
                    .expect("MEDIA_PUBLIC_BASE_URL must be set"),
            })
            .await;
            Arc::new(store)
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix. In-flight uploads are allowed to
/// finish before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
