//! Cross-site request forgery protection.
//!
//! Mutations must carry a token in the `x-csrf-token` header that equals the
//! `csrf_token` cookie (double submit). A cross-site page can make the
//! browser send the cookie but cannot read it to fill the header.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use rand::RngCore;

use showcase_core::error::CoreError;
use showcase_core::hashing::constant_time_eq;

pub const CSRF_HEADER: &str = "x-csrf-token";
pub const CSRF_COOKIE: &str = "csrf_token";

/// Random bytes per issued token.
const TOKEN_BYTES: usize = 32;

/// Checks a mutating request before it reaches the content store.
pub trait CsrfGuard: Send + Sync {
    fn verify(&self, headers: &HeaderMap) -> Result<(), CoreError>;
}

/// Double-submit cookie check.
#[derive(Debug, Default, Clone)]
pub struct DoubleSubmitCsrf;

impl CsrfGuard for DoubleSubmitCsrf {
    fn verify(&self, headers: &HeaderMap) -> Result<(), CoreError> {
        let header = headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| CoreError::Forbidden("Missing CSRF token header".into()))?;
        let cookie = cookie_value(headers, CSRF_COOKIE)
            .ok_or_else(|| CoreError::Forbidden("Missing CSRF cookie".into()))?;

        if constant_time_eq(header.as_bytes(), cookie.as_bytes()) {
            Ok(())
        } else {
            Err(CoreError::Forbidden("CSRF token mismatch".into()))
        }
    }
}

/// Find `name` across all `Cookie` headers.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Fresh random token, hex-encoded.
pub fn issue_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// `Set-Cookie` value for an issued token. Readable by page scripts (no
/// `HttpOnly`) so they can echo it in the header.
pub fn set_cookie_value(token: &str) -> String {
    format!("{CSRF_COOKIE}={token}; Path=/; SameSite=Strict; Secure")
}
