//! Issues double-submit CSRF tokens.

use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use serde::Serialize;

use crate::auth::csrf::{issue_token, set_cookie_value};
use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct CsrfToken {
    pub token: String,
}

/// GET /api/v1/csrf
///
/// Sets the `csrf_token` cookie and returns the same value, which the client
/// echoes in `x-csrf-token` on every mutation.
pub async fn issue() -> impl IntoResponse {
    let token = issue_token();
    (
        AppendHeaders([(SET_COOKIE, set_cookie_value(&token))]),
        Json(DataResponse {
            data: CsrfToken { token },
        }),
    )
}
