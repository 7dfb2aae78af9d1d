use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use showcase_core::error::CoreError;
use showcase_core::upload_validation::UploadRejection;
use showcase_media::PublishError;
use showcase_pipeline::{UploadError, UploadFailure};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`UploadError`] for failed
/// uploads, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `showcase_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A terminal upload failure from the pipeline.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The multipart body could not be read.
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Upload(err) => return upload_response(err),
            AppError::Multipart(err) => {
                let status = err.status();
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "BAD_REQUEST"
                };
                (status, code, err.body_text())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a [`CoreError`] into an HTTP status, error code, and message.
///
/// Persistence and internal failures are logged and answered with a
/// sanitized message; upstream failures likewise, as 502.
fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::GateViolation(rejection) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "GATE_VIOLATION",
            rejection.to_string(),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", msg.clone()),
        CoreError::Upstream(msg) => {
            tracing::error!(error = %msg, "Upstream error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "An upstream service failed".to_string(),
            )
        }
        CoreError::Persistence(msg) => {
            tracing::error!(error = %msg, "Persistence error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

/// Status and code for a rejected upload.
fn classify_rejection(rejection: &UploadRejection) -> (StatusCode, &'static str) {
    match rejection {
        UploadRejection::UnknownCategory(_) | UploadRejection::TargetMismatch { .. } => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        }
        UploadRejection::UnsupportedType { .. } | UploadRejection::ContentMismatch { .. } => {
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE")
        }
        UploadRejection::TooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        UploadRejection::DimensionMismatch { .. } | UploadRejection::MissingDimensions { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "DIMENSION_MISMATCH")
        }
    }
}

/// Upload failures carry the terminal state, the failing stage and a
/// stable reason code on top of the usual envelope.
fn upload_response(err: &UploadError) -> Response {
    let (status, code, message) = match &err.failure {
        UploadFailure::Malformed(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        UploadFailure::Rejected(rejection) => {
            let (status, code) = classify_rejection(rejection);
            (status, code, rejection.to_string())
        }
        UploadFailure::Publish(publish) if publish.is_upstream() => {
            tracing::error!(error = %publish, "Media store failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "The media store failed to accept the asset".to_string(),
            )
        }
        UploadFailure::Publish(
            publish @ (PublishError::Decode(_) | PublishError::UnsupportedFormat { .. }),
        ) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", publish.to_string()),
        UploadFailure::Publish(publish) => {
            tracing::error!(error = %publish, "Publishing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
        UploadFailure::Attach(core) => classify_core_error(core),
        UploadFailure::Spool(io) => {
            tracing::error!(error = %io, "Spooling upload failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    };

    let body = json!({
        "error": message,
        "code": code,
        "state": err.state,
        "stage": err.stage,
        "reason": err.failure.code(),
    });

    (status, axum::Json(body)).into_response()
}
