//! Route definitions for the `/media` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
///
/// ```text
/// GET    /requirements                      -> requirements
/// POST   /uploads                           -> upload
/// ```
///
/// The upload route lifts axum's default 2 MB body limit to
/// `MAX_UPLOAD_BYTES`; per-category caps are enforced while streaming.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/requirements", get(media::requirements))
        .route(
            "/uploads",
            post(media::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}
