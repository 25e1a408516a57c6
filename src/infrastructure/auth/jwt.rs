//! HS256 access tokens.
//!
//! Tokens carry a [`TokenClaims`] payload: the user id, username and role,
//! issue and expiry times, and a random `jti`.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::json;
use uuid::Uuid;

use crate::domain::auth::{AccessToken, TokenClaims, TokenIssuer};
use crate::domain::entities::User;
use crate::error::AppError;

/// Default access token lifetime: one day.
pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 24 * 60;

/// Longest accepted access token lifetime: one year.
pub const MAX_ACCESS_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Signing configuration for access tokens.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes.
    pub access_ttl_minutes: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .finish()
    }
}

/// [`TokenIssuer`] backed by `jsonwebtoken`.
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_minutes: i64,
}

impl JwtTokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl_minutes: config.access_ttl_minutes,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User) -> Result<AccessToken, AppError> {
        let now = Utc::now().timestamp();
        let exp = self
            .access_ttl_minutes
            .checked_mul(60)
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                tracing::error!(
                    access_ttl_minutes = self.access_ttl_minutes,
                    "Access token expiry out of range"
                );
                AppError::internal("Failed to issue token", json!({}))
            })?;
        let claims = TokenClaims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, user_id = user.id, "Failed to sign access token");
            AppError::internal("Failed to issue token", json!({}))
        })?;

        Ok(AccessToken::new(token))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                AppError::unauthorized("Invalid or expired token", json!({}))
            })
    }
}
