//! Portfolio project records: model, structural validation, mutation rules
//! and listing.

pub mod listing;
pub mod model;
pub mod mutation;
pub mod validation;

pub use listing::{Page, Pagination, ProjectFilter, ProjectQuery, ProjectSort};
pub use model::{
    MediaPatch, MediaSlot, NewProject, ProjectCategory, ProjectFields, ProjectMedia, ProjectPatch,
    ProjectRecord, ProjectStatus, ProjectText,
};
