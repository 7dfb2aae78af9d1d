use std::sync::Arc;

use showcase_core::featured::FeaturedGate;
use showcase_core::rate_limit::RateLimiter;
use showcase_core::store::ContentBackend;
use showcase_pipeline::UploadOrchestrator;

use crate::auth::csrf::CsrfGuard;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Project, team and page header persistence.
    pub content: Arc<dyn ContentBackend>,
    /// Upload pipeline (validation, publishing, attachment).
    pub orchestrator: Arc<UploadOrchestrator>,
    /// Featured-item gate applied to every project write.
    pub gate: Arc<FeaturedGate>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    pub csrf: Arc<dyn CsrfGuard>,
    pub rate_limiter: Arc<dyn RateLimiter>,
}
