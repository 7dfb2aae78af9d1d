//! Handlers for the `/media` resource: the requirement table and uploads.

use std::convert::Infallible;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use futures::stream::Empty;

use showcase_core::media::{requirement_table, RequirementEntry};
use showcase_pipeline::{UploadFields, UploadFile, UploadOutcome};

use crate::error::AppResult;
use crate::middleware::guard::{MediaAccess, ReadAccess};
use crate::response::DataResponse;
use crate::state::AppState;

/// Form field carrying the file. Text fields must come before it.
const FILE_FIELD: &str = "file";
/// Alt text fields are `alt_<locale>`, e.g. `alt_en`.
const ALT_PREFIX: &str = "alt_";

/// Stand-in body type for a form that never sent a file.
type NoFile = Empty<Result<Vec<u8>, Infallible>>;

/// GET /api/v1/media/requirements
pub async fn requirements(_access: ReadAccess) -> Json<DataResponse<Vec<RequirementEntry>>> {
    Json(DataResponse {
        data: requirement_table(),
    })
}

/// POST /api/v1/media/uploads
///
/// Multipart form with `category`, `target`, `target_id`, optional `slot`,
/// `format` and `alt_<locale>` fields, followed by `file`. The file part is
/// streamed straight into the pipeline; fields after it are ignored.
pub async fn upload(
    State(state): State<AppState>,
    MediaAccess(user): MediaAccess,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadOutcome>>)> {
    let mut fields = UploadFields::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == FILE_FIELD {
            let file = UploadFile {
                content_type: field.content_type().map(str::to_string),
                body: field,
            };
            let outcome = state.orchestrator.run(fields, Some(file), &user.actor).await?;
            return Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })));
        }

        let value = field.text().await?;
        let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        match name.as_str() {
            "category" => fields.category = value,
            "target" => fields.target = value,
            "target_id" => fields.target_id = value,
            "slot" => fields.slot = value,
            "format" => fields.format = value,
            other => match (other.strip_prefix(ALT_PREFIX), value) {
                (Some(locale), Some(text)) if !locale.is_empty() => {
                    fields.alt_text.insert(locale.to_string(), text);
                }
                _ => tracing::debug!(field = %other, "Ignoring upload form field"),
            },
        }
    }

    // No file part: the pipeline reports the malformed form.
    let outcome = state
        .orchestrator
        .run(fields, None::<UploadFile<NoFile>>, &user.actor)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}
