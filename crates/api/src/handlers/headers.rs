//! Handlers for the `/headers` resource (per-page hero and title).

use axum::extract::{Path, State};
use axum::Json;

use showcase_core::site::{PageHeaderFields, PageHeaderRecord};

use crate::error::AppResult;
use crate::middleware::guard::{ReadAccess, WriteAccess};
use crate::response::DataResponse;
use crate::state::AppState;

fn public_view(mut record: PageHeaderRecord) -> PageHeaderRecord {
    record.history.clear();
    record
}

/// GET /api/v1/headers
pub async fn list(
    State(state): State<AppState>,
    access: ReadAccess,
) -> AppResult<Json<DataResponse<Vec<PageHeaderRecord>>>> {
    let mut headers = state.content.list_headers().await?;
    if access.is_public() {
        headers = headers.into_iter().map(public_view).collect();
    }
    Ok(Json(DataResponse { data: headers }))
}

/// GET /api/v1/headers/{page}
pub async fn get_by_page(
    State(state): State<AppState>,
    access: ReadAccess,
    Path(page): Path<String>,
) -> AppResult<Json<DataResponse<PageHeaderRecord>>> {
    let mut header = state.content.get_header(&page).await?;
    if access.is_public() {
        header = public_view(header);
    }
    Ok(Json(DataResponse { data: header }))
}

/// PUT /api/v1/headers/{page}
pub async fn upsert(
    State(state): State<AppState>,
    WriteAccess(user): WriteAccess,
    Path(page): Path<String>,
    Json(fields): Json<PageHeaderFields>,
) -> AppResult<Json<DataResponse<PageHeaderRecord>>> {
    let header = state.content.upsert_header(&page, fields, &user.actor).await?;
    tracing::info!(page = %page, actor = %user.actor, "Page header saved");
    Ok(Json(DataResponse { data: header }))
}
