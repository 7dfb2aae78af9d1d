use showcase_core::error::CoreError;
use showcase_core::upload_validation::UploadRejection;
use showcase_media::PublishError;

use crate::state::{StateTrail, UploadState};

/// What went wrong in a failed upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadFailure {
    /// Required form fields missing or unreadable body.
    #[error("Malformed upload: {0}")]
    Malformed(String),

    #[error(transparent)]
    Rejected(#[from] UploadRejection),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Attach(#[from] CoreError),

    /// Local failure writing the spool file.
    #[error("Failed to spool upload: {0}")]
    Spool(std::io::Error),
}

impl UploadFailure {
    /// Stable reason code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed_upload",
            Self::Rejected(rejection) => rejection.code(),
            Self::Publish(err) => err.code(),
            Self::Attach(CoreError::GateViolation(rejection)) => rejection.code(),
            Self::Attach(CoreError::NotFound { .. }) => "target_not_found",
            Self::Attach(CoreError::Conflict(_)) => "target_conflict",
            Self::Attach(_) => "attach_failed",
            Self::Spool(_) => "spool_failed",
        }
    }
}

/// A failed upload: the terminal state, the stage that failed, why, and
/// every state visited on the way.
#[derive(Debug, thiserror::Error)]
#[error("Upload {state} while {stage}: {failure}")]
pub struct UploadError {
    pub state: UploadState,
    pub stage: UploadState,
    #[source]
    pub failure: UploadFailure,
    pub trail: StateTrail,
}
