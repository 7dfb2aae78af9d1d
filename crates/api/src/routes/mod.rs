pub mod headers;
pub mod health;
pub mod media;
pub mod projects;
pub mod team;

use axum::routing::get;
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /csrf                                     issue double-submit token (GET)
///
/// /media/requirements                       requirement table (GET)
/// /media/uploads                            multipart upload (POST)
///
/// /projects                                 list, create
/// /projects/{id}                            get, replace, merge, soft delete
/// /projects/{id}/restore                    restore (POST)
/// /projects/{id}/order                      reorder (PUT)
/// /projects/{id}/history                    history entries (GET)
///
/// /team                                     list, create
/// /team/{id}                                get, replace, soft delete
/// /team/{id}/restore                        restore (POST)
///
/// /headers                                  list
/// /headers/{page}                           get, upsert
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route("/csrf", get(handlers::csrf::issue))
        .nest("/media", media::router(config.max_upload_bytes))
        .nest("/projects", projects::router())
        .nest("/team", team::router())
        .nest("/headers", headers::router())
}
