//! Route definitions for the `/team` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::team;
use crate::state::AppState;

/// Routes mounted at `/team`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> replace
/// DELETE /{id}                              -> delete
/// POST   /{id}/restore                      -> restore
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(team::list).post(team::create))
        .route(
            "/{id}",
            get(team::get_by_id).put(team::replace).delete(team::delete),
        )
        .route("/{id}/restore", post(team::restore))
}
