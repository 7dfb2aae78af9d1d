//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use showcase_core::error::CoreError;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated actor extracted from a JWT Bearer token in the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthActor) -> AppResult<Json<()>> {
///     tracing::info!(actor = %user.actor, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthActor {
    /// Actor id recorded in history entries (from `claims.sub`).
    pub actor: String,
    /// Role name (e.g. `"admin"`, `"editor"`).
    pub role: String,
}

impl AuthActor {
    fn from_header(value: &str, state: &AppState) -> Result<Self, AppError> {
        let token = value.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = verify_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthActor {
            actor: claims.sub,
            role: claims.role,
        })
    }
}

impl FromRequestParts<AppState> for AuthActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        AuthActor::from_header(auth_header, state)
    }
}

/// The actor if the request carries credentials, `None` otherwise.
///
/// A present but invalid token is still rejected with 401, so a stale
/// session is reported instead of silently downgraded to public access.
#[derive(Debug, Clone)]
pub struct OptionalActor(pub Option<AuthActor>);

impl FromRequestParts<AppState> for OptionalActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            Some(value) => AuthActor::from_header(value, state).map(|a| OptionalActor(Some(a))),
            None => Ok(OptionalActor(None)),
        }
    }
}
