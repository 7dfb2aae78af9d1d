//! Upload orchestration.
//!
//! Ties the upload validator, the asset publisher and the content store
//! together for one request, tracking the request through [`UploadState`].

pub mod error;
pub mod orchestrator;
pub mod spool;
pub mod state;

pub use error::{UploadError, UploadFailure};
pub use orchestrator::{
    AttachedRecord, UploadFields, UploadFile, UploadOrchestrator, UploadOutcome,
};
pub use state::{StateTrail, UploadState};
