//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User, UserChanges};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username or email is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Finds a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Finds a user by email, ignoring ASCII case.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists users ordered by username, optionally filtered by a username
    /// substring. Returns the page and the total number of matches.
    async fn list(
        &self,
        search: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<User>, i64), AppError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Conflict`] if the new username or email is taken.
    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, AppError>;

    /// Replaces the stored confirmation key.
    async fn set_confirmation_key(&self, id: i64, confirmation_key: &str)
    -> Result<(), AppError>;

    /// Replaces the stored password hash.
    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<(), AppError>;

    /// Deletes a user together with their reviews and comments.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
