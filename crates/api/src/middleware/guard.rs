//! Access guards combining authentication, CSRF and rate limiting.
//!
//! Checks run in a fixed order: authentication (401), then CSRF (403), then
//! the rate budget (429). A request rejected early never spends budget.

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use showcase_core::error::CoreError;
use showcase_core::rate_limit::RateScope;

use super::auth::{AuthActor, OptionalActor};
use crate::error::AppError;
use crate::state::AppState;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Rate-limit identity: the actor when known, else the first forwarded
/// client address, else a shared anonymous bucket.
fn caller_key(parts: &Parts, actor: Option<&AuthActor>) -> String {
    if let Some(actor) = actor {
        return format!("actor:{}", actor.actor);
    }
    parts
        .headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(|ip| format!("ip:{ip}"))
        .unwrap_or_else(|| "anonymous".to_string())
}

async fn spend(state: &AppState, scope: RateScope, caller: &str) -> Result<(), AppError> {
    let limits = &state.config.rate_limit;
    let max = match scope {
        RateScope::Read => limits.read_max,
        RateScope::Write => limits.write_max,
        RateScope::Media => limits.media_max,
    };
    let window = Duration::from_secs(limits.window_secs);

    if state.rate_limiter.allow(&scope.key(caller), max, window).await {
        Ok(())
    } else {
        tracing::warn!(scope = scope.name(), caller, "Rate limit exceeded");
        Err(AppError::Core(CoreError::RateLimited(format!(
            "Too many {} requests, retry later",
            scope.name()
        ))))
    }
}

/// Authenticated, CSRF-checked access charged to `scope`.
async fn mutation(
    parts: &mut Parts,
    state: &AppState,
    scope: RateScope,
) -> Result<AuthActor, AppError> {
    let user = AuthActor::from_request_parts(parts, state).await?;
    state.csrf.verify(&parts.headers)?;
    spend(state, scope, &caller_key(parts, Some(&user))).await?;
    Ok(user)
}

/// Public read. Carries the actor when the caller is signed in.
pub struct ReadAccess(pub Option<AuthActor>);

impl ReadAccess {
    /// Anonymous callers only see published, non-deleted content.
    pub fn is_public(&self) -> bool {
        self.0.is_none()
    }
}

impl FromRequestParts<AppState> for ReadAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OptionalActor(user) = OptionalActor::from_request_parts(parts, state).await?;
        spend(state, RateScope::Read, &caller_key(parts, user.as_ref())).await?;
        Ok(ReadAccess(user))
    }
}

/// Read that requires a signed-in actor (history, deleted records).
pub struct StaffAccess(pub AuthActor);

impl FromRequestParts<AppState> for StaffAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthActor::from_request_parts(parts, state).await?;
        spend(state, RateScope::Read, &caller_key(parts, Some(&user))).await?;
        Ok(StaffAccess(user))
    }
}

/// Content mutation.
pub struct WriteAccess(pub AuthActor);

impl FromRequestParts<AppState> for WriteAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        mutation(parts, state, RateScope::Write).await.map(WriteAccess)
    }
}

/// Media upload.
pub struct MediaAccess(pub AuthActor);

impl FromRequestParts<AppState> for MediaAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        mutation(parts, state, RateScope::Media).await.map(MediaAccess)
    }
}
