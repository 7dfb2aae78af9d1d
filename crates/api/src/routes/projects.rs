//! Route definitions for the `/projects` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> replace
/// PATCH  /{id}                              -> merge
/// DELETE /{id}                              -> delete
/// POST   /{id}/restore                      -> restore
/// PUT    /{id}/order                        -> reorder
/// GET    /{id}/history                      -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::replace)
                .patch(projects::merge)
                .delete(projects::delete),
        )
        .route("/{id}/restore", post(projects::restore))
        .route("/{id}/order", put(projects::reorder))
        .route("/{id}/history", get(projects::history))
}
