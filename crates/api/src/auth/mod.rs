//! Authentication and request-forgery primitives.
//!
//! - [`jwt`] -- validation of access tokens issued by the session provider.
//! - [`csrf`] -- the [`csrf::CsrfGuard`] seam and its double-submit default.

pub mod csrf;
pub mod jwt;
