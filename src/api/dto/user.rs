//! DTOs for account endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::auth::USERNAME_REGEX;
use crate::application::services::UserDraft;
use crate::domain::entities::{Role, User, UserChanges};

/// Public profile of an account. The confirmation key is never exposed.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

/// Account created by an administrator.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 150))]
    #[validate(regex(path = "*USERNAME_REGEX", message = "Enter a valid username."))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address."))]
    #[validate(length(max = 254))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,

    #[serde(default)]
    pub bio: String,

    #[serde(default)]
    pub role: Role,
}

impl From<CreateUserRequest> for UserDraft {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
            role: req.role,
        }
    }
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 150))]
    #[validate(regex(path = "*USERNAME_REGEX", message = "Enter a valid username."))]
    pub username: Option<String>,

    #[validate(email(message = "Enter a valid email address."))]
    #[validate(length(max = 254))]
    pub email: Option<String>,

    #[validate(length(max = 150))]
    pub first_name: Option<String>,

    #[validate(length(max = 150))]
    pub last_name: Option<String>,

    pub bio: Option<String>,

    pub role: Option<Role>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
            role: req.role,
        }
    }
}

/// Query for the account list.
#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,

    #[serde(flatten)]
    pub pagination: super::pagination::PaginationParams,
}
