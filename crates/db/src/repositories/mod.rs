//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads
//! take `&PgPool`; writes take `&mut PgConnection` so they can run inside
//! the transaction that holds the row lock.

pub mod page_header_repo;
pub mod project_repo;
pub mod team_member_repo;

pub use page_header_repo::PageHeaderRepo;
pub use project_repo::ProjectRepo;
pub use team_member_repo::TeamMemberRepo;
