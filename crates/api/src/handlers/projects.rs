//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use showcase_core::error::CoreError;
use showcase_core::history::HistoryEntry;
use showcase_core::project::{
    NewProject, Page, ProjectFields, ProjectPatch, ProjectRecord, ProjectStatus,
};

use crate::error::AppResult;
use crate::middleware::guard::{ReadAccess, StaffAccess, WriteAccess};
use crate::query::ProjectListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /projects/{id}/order`.
#[derive(Debug, Deserialize)]
pub struct OrderBody {
    pub order: i32,
}

/// Public view of a record: history stays internal.
fn public_view(mut record: ProjectRecord) -> ProjectRecord {
    record.history.clear();
    record
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    access: ReadAccess,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<DataResponse<Page<ProjectRecord>>>> {
    let public = access.is_public();
    let mut page = state.content.list(&params.into_query(public)).await?;
    if public {
        page.items = page.items.into_iter().map(public_view).collect();
    }
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    WriteAccess(user): WriteAccess,
    Json(input): Json<NewProject>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectRecord>>)> {
    let record = state.content.create(input, &user.actor, &state.gate).await?;
    tracing::info!(project_id = %record.id, actor = %user.actor, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/projects/{id}
///
/// Drafts and deleted projects are reported as missing to anonymous callers.
pub async fn get_by_id(
    State(state): State<AppState>,
    access: ReadAccess,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = state.content.get(&id).await?;
    if access.is_public() {
        if record.deleted || record.fields.status != ProjectStatus::Published {
            return Err(CoreError::not_found("Project", id).into());
        }
        return Ok(Json(DataResponse {
            data: public_view(record),
        }));
    }
    Ok(Json(DataResponse { data: record }))
}

/// PUT /api/v1/projects/{id}
pub async fn replace(
    State(state): State<AppState>,
    WriteAccess(user): WriteAccess,
    Path(id): Path<String>,
    Json(fields): Json<ProjectFields>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = state
        .content
        .replace(&id, fields, &user.actor, &state.gate)
        .await?;
    tracing::info!(project_id = %id, actor = %user.actor, "Project replaced");
    Ok(Json(DataResponse { data: record }))
}

/// PATCH /api/v1/projects/{id}
pub async fn merge(
    State(state): State<AppState>,
    WriteAccess(user): WriteAccess,
    Path(id): Path<String>,
    Json(patch): Json<ProjectPatch>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = state
        .content
        .merge(&id, patch, &user.actor, &state.gate)
        .await?;
    tracing::info!(project_id = %id, actor = %user.actor, "Project patched");
    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/projects/{id}
///
/// Soft delete; repeating it succeeds and records another entry.
pub async fn delete(
    State(state): State<AppState>,
    WriteAccess(user): WriteAccess,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = state.content.soft_delete(&id, &user.actor).await?;
    tracing::info!(project_id = %id, actor = %user.actor, "Project soft-deleted");
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/projects/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    WriteAccess(user): WriteAccess,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = state.content.restore(&id, &user.actor, &state.gate).await?;
    tracing::info!(project_id = %id, actor = %user.actor, "Project restored");
    Ok(Json(DataResponse { data: record }))
}

/// PUT /api/v1/projects/{id}/order
pub async fn reorder(
    State(state): State<AppState>,
    WriteAccess(user): WriteAccess,
    Path(id): Path<String>,
    Json(body): Json<OrderBody>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = state
        .content
        .reorder(&id, body.order, &user.actor, &state.gate)
        .await?;
    tracing::info!(project_id = %id, order = body.order, actor = %user.actor, "Project reordered");
    Ok(Json(DataResponse { data: record }))
}

/// GET /api/v1/projects/{id}/history
pub async fn history(
    State(state): State<AppState>,
    StaffAccess(_user): StaffAccess,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<HistoryEntry>>>> {
    let record = state.content.get(&id).await?;
    Ok(Json(DataResponse {
        data: record.history,
    }))
}
