//! Domain core for the showcase content backend.
//!
//! Everything in this crate is free of I/O: the requirement table, the
//! upload validator, the featured-item gate and the record mutation rules
//! are shared by every storage backend and by the upload pipeline.

pub mod error;
pub mod featured;
pub mod hashing;
pub mod history;
pub mod i18n;
pub mod image_probe;
pub mod media;
pub mod project;
pub mod rate_limit;
pub mod serde_helpers;
pub mod site;
pub mod store;
pub mod types;
pub mod upload_validation;
