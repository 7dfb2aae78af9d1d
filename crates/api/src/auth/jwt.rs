//! Session token verification.
//!
//! Staff sessions are HS256 JWTs issued by the external session provider.
//! This service never issues tokens in production; it only verifies the
//! signature, expiry and (when configured) the issuer, and reads the actor
//! id and role out of the claims. [`mint_token`] exists for tooling and
//! tests.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims this service reads from a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Actor id, recorded as `by` / `updated_by` on every mutation.
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Verification settings for session tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret shared with the session provider.
    pub secret: String,
    /// Expected `iss` claim. `None` accepts any issuer.
    pub issuer: Option<String>,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,
    /// Lifetime of tokens produced by [`mint_token`], in minutes.
    pub mint_ttl_mins: i64,
}

const DEFAULT_LEEWAY_SECS: &str = "30";
const DEFAULT_MINT_TTL_MINS: &str = "15";

impl JwtConfig {
    /// Load from the environment.
    ///
    /// | Env Var              | Required | Default |
    /// |----------------------|----------|---------|
    /// | `JWT_SECRET`         | **yes**  | --      |
    /// | `JWT_ISSUER`         | no       | (any)   |
    /// | `JWT_LEEWAY_SECS`    | no       | `30`    |
    /// | `JWT_MINT_TTL_MINS`  | no       | `15`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or a number fails to parse.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        let number = |name: &str, default: &str| -> String {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").ok().filter(|v| !v.is_empty()),
            leeway_secs: number("JWT_LEEWAY_SECS", DEFAULT_LEEWAY_SECS)
                .parse()
                .unwrap_or_else(|e| panic!("JWT_LEEWAY_SECS: {e}")),
            mint_ttl_mins: number("JWT_MINT_TTL_MINS", DEFAULT_MINT_TTL_MINS)
                .parse()
                .unwrap_or_else(|e| panic!("JWT_MINT_TTL_MINS: {e}")),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

/// Check the signature, expiry and issuer of `token` and return its claims.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )
    .map(|data| data.claims)
}

/// Sign a session token for `actor` the way the session provider would.
pub fn mint_token(
    actor: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: actor.to_string(),
        role: role.to_string(),
        exp: now + config.mint_ttl_mins * 60,
        iat: now,
        iss: config.issuer.clone(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
