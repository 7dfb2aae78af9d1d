//! Route definitions for the `/headers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::headers;
use crate::state::AppState;

/// Routes mounted at `/headers`.
///
/// ```text
/// GET    /                                  -> list
/// GET    /{page}                            -> get_by_page
/// PUT    /{page}                            -> upsert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(headers::list))
        .route("/{page}", get(headers::get_by_page).put(headers::upsert))
}
