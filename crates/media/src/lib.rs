//! Asset transcoding and publishing to remote media stores.
//!
//! [`Publisher`] turns an accepted upload into a stored, immutable
//! [`MediaAsset`](showcase_core::media::MediaAsset). The store itself sits
//! behind the [`MediaStore`] trait with a signed-upload HTTP client and an
//! S3-compatible bucket implementation.

pub mod error;
pub mod format;
pub mod http_store;
pub mod memory_store;
pub mod path;
pub mod publisher;
pub mod s3_store;
pub mod signing;
pub mod store;
pub mod transcode;

pub use error::PublishError;
pub use http_store::{HttpMediaStore, HttpMediaStoreConfig};
pub use memory_store::MemoryMediaStore;
pub use publisher::{PublishRequest, PublishSource, Publisher};
pub use s3_store::{S3MediaStore, S3MediaStoreConfig};
pub use store::{MediaStore, StoreUpload, StoredObject, UploadBody};
