//! Authentication capabilities consumed by the token flow.
//!
//! The token flow never talks to storage or a signing library directly. It is
//! handed a [`UserLookup`] to resolve the caller, a [`TokenIssuer`] to mint and
//! check access tokens, and a [`ConfirmationSender`] to deliver keys out of band.
//! Infrastructure provides the production implementations; tests provide fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::entities::{Role, User};
use crate::error::AppError;

/// Which user attribute a token request identifies the account by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierField {
    #[default]
    Email,
    Username,
}

impl IdentifierField {
    /// JSON key carrying the identifier in a token request.
    pub fn key(&self) -> &'static str {
        match self {
            IdentifierField::Email => "email",
            IdentifierField::Username => "username",
        }
    }
}

impl FromStr for IdentifierField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(IdentifierField::Email),
            "username" => Ok(IdentifierField::Username),
            other => Err(format!("unknown identifier field '{other}'")),
        }
    }
}

/// How a token request proves the caller owns the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMode {
    /// Identifier plus an out-of-band confirmation key; no password.
    #[default]
    Passwordless,
    /// Identifier plus an account password.
    Password,
}

impl FromStr for LoginMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passwordless" => Ok(LoginMode::Passwordless),
            "password" => Ok(LoginMode::Password),
            other => Err(format!("unknown login mode '{other}'")),
        }
    }
}

/// Ambient information about the request being authenticated.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub client_addr: Option<String>,
    pub user_agent: Option<String>,
}

/// A signed bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id.
    pub sub: i64,
    pub username: String,
    pub role: Role,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Unique token id.
    pub jti: String,
}

/// Resolves the account a token request refers to.
///
/// Returns `Ok(None)` when no account matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn lookup(
        &self,
        field: IdentifierField,
        identifier: &str,
        context: &RequestContext,
    ) -> Result<Option<User>, AppError>;
}

/// Mints and verifies access tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Issues a signed access token for `user`.
    fn issue(&self, user: &User) -> Result<AccessToken, AppError>;

    /// Verifies signature and expiry, returning the embedded claims.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for any invalid or expired token.
    fn verify(&self, token: &str) -> Result<TokenClaims, AppError>;
}

/// Delivers a freshly generated confirmation key to its owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationSender: Send + Sync {
    async fn send(&self, user: &User, confirmation_key: &str) -> Result<(), AppError>;
}
