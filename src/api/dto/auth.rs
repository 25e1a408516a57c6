//! DTOs for signup and token endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::User;

/// Letters, digits and `@ . + - _`.
pub(crate) static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

/// Request to register or re-confirm an account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 150))]
    #[validate(regex(path = "*USERNAME_REGEX", message = "Enter a valid username."))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address."))]
    #[validate(length(max = 254))]
    pub email: String,
}

/// Echo of the account a confirmation key was sent to.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

impl From<User> for SignupResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
        }
    }
}

/// Successful token exchange.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Rejected token exchange.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenError {
    pub error: String,
}
