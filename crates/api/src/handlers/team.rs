//! Handlers for the `/team` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use showcase_core::error::CoreError;
use showcase_core::site::{NewTeamMember, TeamMemberFields, TeamMemberRecord};

use crate::error::AppResult;
use crate::middleware::guard::{ReadAccess, WriteAccess};
use crate::query::IncludeDeletedParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn public_view(mut record: TeamMemberRecord) -> TeamMemberRecord {
    record.history.clear();
    record
}

/// GET /api/v1/team
pub async fn list(
    State(state): State<AppState>,
    access: ReadAccess,
    Query(params): Query<IncludeDeletedParams>,
) -> AppResult<Json<DataResponse<Vec<TeamMemberRecord>>>> {
    let public = access.is_public();
    let mut members = state
        .content
        .list_team(params.include_deleted && !public)
        .await?;
    if public {
        members = members.into_iter().map(public_view).collect();
    }
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/team
pub async fn create(
    State(state): State<AppState>,
    WriteAccess(user): WriteAccess,
    Json(input): Json<NewTeamMember>,
) -> AppResult<(StatusCode, Json<DataResponse<TeamMemberRecord>>)> {
    let record = state.content.create_team_member(input, &user.actor).await?;
    tracing::info!(member_id = %record.id, actor = %user.actor, "Team member created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/team/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    access: ReadAccess,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<TeamMemberRecord>>> {
    let record = state.content.get_team_member(&id).await?;
    if access.is_public() {
        if record.deleted {
            return Err(CoreError::not_found("TeamMember", id).into());
        }
        return Ok(Json(DataResponse {
            data: public_view(record),
        }));
    }
    Ok(Json(DataResponse { data: record }))
}

/// PUT /api/v1/team/{id}
pub async fn replace(
    State(state): State<AppState>,
    WriteAccess(user): WriteAccess,
    Path(id): Path<String>,
    Json(fields): Json<TeamMemberFields>,
) -> AppResult<Json<DataResponse<TeamMemberRecord>>> {
    let record = state
        .content
        .replace_team_member(&id, fields, &user.actor)
        .await?;
    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/team/{id}
pub async fn delete(
    State(state): State<AppState>,
    WriteAccess(user): WriteAccess,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<TeamMemberRecord>>> {
    let record = state.content.soft_delete_team_member(&id, &user.actor).await?;
    tracing::info!(member_id = %id, actor = %user.actor, "Team member soft-deleted");
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/team/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    WriteAccess(user): WriteAccess,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<TeamMemberRecord>>> {
    let record = state.content.restore_team_member(&id, &user.actor).await?;
    Ok(Json(DataResponse { data: record }))
}
