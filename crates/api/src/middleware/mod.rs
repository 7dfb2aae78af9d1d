//! Authentication and access-control extractors.
//!
//! - [`auth::AuthActor`] -- Extracts the authenticated actor from a JWT Bearer token.
//! - [`auth::OptionalActor`] -- Same, but anonymous callers are allowed.
//! - [`guard::ReadAccess`] -- Public read with the `read` rate budget.
//! - [`guard::StaffAccess`] -- Authenticated read with the `read` rate budget.
//! - [`guard::WriteAccess`] -- Authenticated, CSRF-checked mutation (`write` budget).
//! - [`guard::MediaAccess`] -- Authenticated, CSRF-checked upload (`media` budget).

pub mod auth;
pub mod guard;
